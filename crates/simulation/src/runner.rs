//! Scenario runner.
//!
//! Funds a trader the way the launch harness does (fresh token supply and
//! wrapped native, both approved to the router), then executes every case of
//! a schedule through the router and reads the oracle after each one.

use crate::environment::LaunchEnvironment;
use crate::report::{ScenarioReport, SwapRecord};
use crate::schedule::{SwapDirection, SwapSchedule};
use clmm_launch_domain::error::Result;
use clmm_launch_domain::token::{Address, TokenAmount};
use clmm_launch_protocols::clock::Clock;
use clmm_launch_protocols::router::ExactInputSingleParams;
use clmm_launch_protocols::tokens::ledger::FungibleToken;
use primitive_types::{H160, U256};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Configuration for a scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Account that trades.
    pub trader: Address,
    /// Launched tokens minted to the trader and approved to the router.
    pub token_budget: TokenAmount,
    /// Wrapped native deposited for the trader and approved to the router.
    pub native_budget: TokenAmount,
    /// Seconds between a swap's submission and its deadline.
    pub deadline_window: u64,
    pub amount_out_minimum: TokenAmount,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            trader: H160::from_low_u64_be(0xd2),
            // 10,000,000 tokens and 500 native at 18 decimals.
            token_budget: TokenAmount::new(U256::exp10(25)),
            native_budget: TokenAmount::new(U256::exp10(20) * U256::from(5u8)),
            deadline_window: 600,
            amount_out_minimum: TokenAmount::zero(),
        }
    }
}

impl ScenarioConfig {
    #[must_use]
    pub fn with_trader(mut self, trader: Address) -> Self {
        self.trader = trader;
        self
    }

    #[must_use]
    pub fn with_budgets(mut self, token_budget: TokenAmount, native_budget: TokenAmount) -> Self {
        self.token_budget = token_budget;
        self.native_budget = native_budget;
        self
    }

    #[must_use]
    pub fn with_deadline_window(mut self, seconds: u64) -> Self {
        self.deadline_window = seconds;
        self
    }

    #[must_use]
    pub fn with_amount_out_minimum(mut self, minimum: TokenAmount) -> Self {
        self.amount_out_minimum = minimum;
        self
    }
}

/// Executes swap schedules against a launched environment.
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    pub config: ScenarioConfig,
}

impl ScenarioRunner {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    /// Mints and wraps the trader's budgets and approves both to the router.
    pub async fn fund_trader(&self, env: &LaunchEnvironment) -> Result<()> {
        let trader = self.config.trader;
        let spender = env.router.account();

        env.token
            .mint(env.config.deployer, trader, self.config.token_budget)
            .await?;
        env.token
            .approve(trader, spender, self.config.token_budget)
            .await?;
        env.wrapped_native
            .deposit(trader, self.config.native_budget)
            .await?;
        env.wrapped_native
            .approve(trader, spender, self.config.native_budget)
            .await?;

        info!(
            ?trader,
            token_budget = %self.config.token_budget,
            native_budget = %self.config.native_budget,
            "Trader funded"
        );
        Ok(())
    }

    /// Funds the trader and runs every case of `schedule`.
    ///
    /// A failed swap is recorded with its error and the run continues; only
    /// a failure to fund the trader or to read the oracle aborts the run.
    pub async fn run(
        &self,
        env: &LaunchEnvironment,
        schedule: &mut dyn SwapSchedule,
    ) -> Result<ScenarioReport> {
        let cases = schedule.generate()?;
        let pool = env.manager.get_address_pool().await?;
        let fee = env.manager.config().fee_tier.pips();
        let token = env.token.address();
        let native = env.wrapped_native.address();

        self.fund_trader(env).await?;
        let initial = env.observe().await?;
        info!(
            %pool,
            cases = cases.len(),
            price = %initial.price,
            tick = %initial.tick,
            "Scenario started"
        );

        let mut records = Vec::with_capacity(cases.len());
        for (index, case) in cases.into_iter().enumerate() {
            let (token_in, token_out) = match case.direction {
                SwapDirection::Sell => (token, native),
                SwapDirection::Buy => (native, token),
            };
            let params = ExactInputSingleParams {
                token_in,
                token_out,
                fee,
                recipient: self.config.trader,
                deadline: env.clock.now().saturating_add(self.config.deadline_window),
                amount_in: case.amount,
                amount_out_minimum: self.config.amount_out_minimum,
                sqrt_price_limit_x96: U256::zero(),
            };

            let result = env.router.exact_input_single(self.config.trader, params).await;
            let observation = env.observe().await?;
            let record = match result {
                Ok(amount_out) => {
                    debug!(
                        index,
                        direction = %case.direction,
                        amount_in = %case.amount,
                        %amount_out,
                        price = %observation.price,
                        tick = %observation.tick,
                        "Scenario swap"
                    );
                    SwapRecord {
                        index,
                        direction: case.direction,
                        amount_in: case.amount,
                        amount_out: Some(amount_out),
                        observation,
                        error: None,
                    }
                }
                Err(err) => {
                    warn!(
                        index,
                        direction = %case.direction,
                        amount_in = %case.amount,
                        error = %err,
                        "Scenario swap failed"
                    );
                    SwapRecord {
                        index,
                        direction: case.direction,
                        amount_in: case.amount,
                        amount_out: None,
                        observation,
                        error: Some(err.to_string()),
                    }
                }
            };
            records.push(record);
        }

        let report = ScenarioReport::new(pool, initial, records);
        info!(
            %pool,
            succeeded = report.summary.succeeded,
            failed = report.summary.failed,
            net_tick_move = report.summary.net_tick_move,
            "Scenario completed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::EnvironmentConfig;
    use crate::schedule::{FixedSchedule, LadderSchedule, RandomSchedule, SwapCase};
    use clmm_launch_domain::error::LaunchError;
    use clmm_launch_protocols::clock::FixedClock;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    async fn launched(clock: Arc<FixedClock>) -> LaunchEnvironment {
        let env = LaunchEnvironment::bootstrap(EnvironmentConfig::default(), clock)
            .await
            .unwrap();
        env.launch(TokenAmount::from_units(100, 18).unwrap())
            .await
            .unwrap();
        env
    }

    fn tokens(whole: u64) -> TokenAmount {
        TokenAmount::from_units(whole, 18).unwrap()
    }

    fn native(value: rust_decimal::Decimal) -> TokenAmount {
        TokenAmount::from_decimal(value, 18).unwrap()
    }

    #[tokio::test]
    async fn test_ladder_runs_to_completion() {
        let env = launched(Arc::new(FixedClock::new(1_700_000_000))).await;
        let report = ScenarioRunner::default()
            .run(&env, &mut LadderSchedule::default())
            .await
            .unwrap();

        assert_eq!(report.records.len(), 48);
        assert_eq!(report.summary.succeeded, 48);
        assert_eq!(report.summary.sells, 24);
        assert_eq!(report.summary.buys, 24);

        // Every sell lowers the price and every buy raises it.
        let mut previous = report.initial.price;
        for record in &report.records {
            match record.direction {
                SwapDirection::Sell => assert!(record.observation.price < previous),
                SwapDirection::Buy => assert!(record.observation.price > previous),
            }
            previous = record.observation.price;
        }
        assert!(report.summary.min_price <= report.summary.first_price);
        assert!(report.summary.max_price >= report.summary.last_price);
    }

    #[tokio::test]
    async fn test_failed_swap_is_recorded_and_run_continues() {
        let env = launched(Arc::new(FixedClock::new(1_700_000_000))).await;
        let runner = ScenarioRunner::new(
            ScenarioConfig::default().with_budgets(tokens(100), native(dec!(1))),
        );
        let mut schedule = FixedSchedule::new(vec![
            SwapCase::sell(tokens(50)),
            SwapCase::sell(tokens(1_000)),
            SwapCase::buy(native(dec!(0.02))),
        ]);
        let report = runner.run(&env, &mut schedule).await.unwrap();

        assert_eq!(report.summary.succeeded, 2);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.sells, 1);
        assert_eq!(report.summary.buys, 1);

        let failed = &report.records[1];
        assert!(!failed.succeeded());
        assert!(failed.amount_out.is_none());
        assert!(failed.error.is_some());
        assert_eq!(failed.observation, report.records[0].observation);
        assert!(report.records[2].succeeded());
    }

    #[tokio::test]
    async fn test_custom_trader_is_funded_and_credited() {
        let env = launched(Arc::new(FixedClock::new(1_700_000_000))).await;
        let trader = H160::from_low_u64_be(0xe7);
        let runner = ScenarioRunner::new(
            ScenarioConfig::default()
                .with_trader(trader)
                .with_budgets(tokens(100), native(dec!(1))),
        );
        let mut schedule = FixedSchedule::new(vec![SwapCase::sell(tokens(40))]);
        let report = runner.run(&env, &mut schedule).await.unwrap();

        let amount_out = report.records[0].amount_out.unwrap();
        assert_eq!(env.token.balance_of(trader).await, tokens(60));
        assert_eq!(
            env.wrapped_native.balance_of(trader).await.as_u256(),
            native(dec!(1)).as_u256() + amount_out.as_u256()
        );
        let default_trader = ScenarioConfig::default().trader;
        assert!(env.token.balance_of(default_trader).await.is_zero());
    }

    #[tokio::test]
    async fn test_zero_deadline_window_still_executes() {
        let env = launched(Arc::new(FixedClock::new(1_700_000_000))).await;
        let runner = ScenarioRunner::new(ScenarioConfig::default().with_deadline_window(0));
        let mut schedule = FixedSchedule::new(vec![SwapCase::sell(tokens(10))]);
        let report = runner.run(&env, &mut schedule).await.unwrap();
        assert_eq!(report.summary.succeeded, 1);
    }

    #[tokio::test]
    async fn test_slippage_failures_leave_price_unchanged() {
        let env = launched(Arc::new(FixedClock::new(1_700_000_000))).await;
        let runner = ScenarioRunner::new(
            ScenarioConfig::default().with_amount_out_minimum(TokenAmount::new(U256::MAX)),
        );
        let mut schedule = FixedSchedule::new(vec![
            SwapCase::sell(tokens(10)),
            SwapCase::buy(native(dec!(0.1))),
        ]);
        let report = runner.run(&env, &mut schedule).await.unwrap();

        assert_eq!(report.summary.failed, 2);
        assert_eq!(report.summary.net_tick_move, 0);
        for record in &report.records {
            assert_eq!(record.observation, report.initial);
            let error = record.error.as_deref().unwrap();
            assert!(error.contains("below minimum"), "unexpected error {error}");
        }
    }

    #[tokio::test]
    async fn test_random_schedule_runs() {
        let env = launched(Arc::new(FixedClock::new(1_700_000_000))).await;
        let mut schedule = RandomSchedule::new(42, 20);
        let report = ScenarioRunner::default().run(&env, &mut schedule).await.unwrap();

        assert_eq!(report.records.len(), 20);
        assert_eq!(report.summary.total_swaps, 20);
        assert_eq!(
            report.summary.succeeded + report.summary.failed,
            report.summary.total_swaps
        );
        assert_eq!(report.summary.failed, 0);
    }

    #[tokio::test]
    async fn test_run_before_launch_fails() {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(1_700_000_000));
        let env = LaunchEnvironment::bootstrap(EnvironmentConfig::default(), clock)
            .await
            .unwrap();
        let result = ScenarioRunner::default()
            .run(&env, &mut LadderSchedule::default())
            .await;
        assert!(matches!(result, Err(LaunchError::NotDeployed)));
    }
}
