//! Swap schedules driving a scenario.
//!
//! A schedule produces the ordered list of swaps a scenario executes. A sell
//! spends the launched token for wrapped native; a buy spends wrapped native
//! for the launched token.

use clmm_launch_domain::error::{LaunchError, Result};
use clmm_launch_domain::token::TokenAmount;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole-token sell sizes of the ladder, in execution order.
const LADDER_SELL_UNITS: [u64; 24] = [
    50, 75, 100, 150, 200, 300, 400, 500, 600, 700, 800, 900, 1000, 1200, 1400, 1600, 1800, 2000,
    2200, 2400, 2600, 2800, 3000, 3200,
];

/// Native spent by each ladder buy per token sold in the preceding sell.
fn ladder_buy_ratio() -> Decimal {
    Decimal::new(4, 4)
}

/// Side of a swap, seen from the launched token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Launched token in, wrapped native out.
    Sell,
    /// Wrapped native in, launched token out.
    Buy,
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapDirection::Sell => write!(f, "sell"),
            SwapDirection::Buy => write!(f, "buy"),
        }
    }
}

/// One exact-input swap of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapCase {
    pub direction: SwapDirection,
    /// Raw input amount, in the input token's smallest unit.
    pub amount: TokenAmount,
}

impl SwapCase {
    pub fn sell(amount: TokenAmount) -> Self {
        Self {
            direction: SwapDirection::Sell,
            amount,
        }
    }

    pub fn buy(amount: TokenAmount) -> Self {
        Self {
            direction: SwapDirection::Buy,
            amount,
        }
    }
}

/// Source of swap cases.
pub trait SwapSchedule: Send {
    /// Produces the cases to execute, in order.
    fn generate(&mut self) -> Result<Vec<SwapCase>>;
}

/// The alternating sell/buy ladder of the launch harness.
///
/// Sells grow from 50 to 3200 tokens; each is followed by a buy of
/// `0.0004` native per token of that sell (0.02 up to 1.28 native).
#[derive(Debug, Clone, Copy)]
pub struct LadderSchedule {
    pub token_decimals: u8,
    pub native_decimals: u8,
}

impl LadderSchedule {
    pub fn new(token_decimals: u8, native_decimals: u8) -> Self {
        Self {
            token_decimals,
            native_decimals,
        }
    }

    /// Number of cases the ladder produces.
    pub fn len(&self) -> usize {
        LADDER_SELL_UNITS.len() * 2
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for LadderSchedule {
    fn default() -> Self {
        Self::new(18, 18)
    }
}

impl SwapSchedule for LadderSchedule {
    fn generate(&mut self) -> Result<Vec<SwapCase>> {
        let mut cases = Vec::with_capacity(self.len());
        for units in LADDER_SELL_UNITS {
            let sell = TokenAmount::from_units(units, self.token_decimals)?;
            let buy = TokenAmount::from_decimal(
                Decimal::from(units) * ladder_buy_ratio(),
                self.native_decimals,
            )?;
            cases.push(SwapCase::sell(sell));
            cases.push(SwapCase::buy(buy));
        }
        Ok(cases)
    }
}

/// Seeded random schedule.
///
/// Each case flips a fair coin for its direction and draws its size as the
/// direction's median scaled by a log-normal factor. The same seed always
/// yields the same cases.
#[derive(Debug, Clone)]
pub struct RandomSchedule {
    pub seed: u64,
    pub steps: usize,
    /// Median sell size in whole tokens.
    pub sell_median: Decimal,
    /// Median buy size in whole native units.
    pub buy_median: Decimal,
    /// Log-space standard deviation of the size factor.
    pub sigma: f64,
    pub token_decimals: u8,
    pub native_decimals: u8,
}

impl RandomSchedule {
    pub fn new(seed: u64, steps: usize) -> Self {
        Self {
            seed,
            steps,
            sell_median: Decimal::from(500),
            buy_median: Decimal::new(2, 1),
            sigma: 1.0,
            token_decimals: 18,
            native_decimals: 18,
        }
    }

    #[must_use]
    pub fn with_medians(mut self, sell_median: Decimal, buy_median: Decimal) -> Self {
        self.sell_median = sell_median;
        self.buy_median = buy_median;
        self
    }

    #[must_use]
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    #[must_use]
    pub fn with_decimals(mut self, token_decimals: u8, native_decimals: u8) -> Self {
        self.token_decimals = token_decimals;
        self.native_decimals = native_decimals;
        self
    }
}

impl SwapSchedule for RandomSchedule {
    fn generate(&mut self) -> Result<Vec<SwapCase>> {
        let factor = LogNormal::new(0.0, self.sigma)
            .map_err(|e| LaunchError::InvalidAmount(format!("size distribution: {e}")))?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut cases = Vec::with_capacity(self.steps);

        for _ in 0..self.steps {
            let direction = if rng.random_bool(0.5) {
                SwapDirection::Sell
            } else {
                SwapDirection::Buy
            };
            // Floor the factor so no draw truncates to a zero amount.
            let scale = Decimal::from_f64(factor.sample(&mut rng).max(1e-3))
                .unwrap_or(Decimal::ONE)
                .round_dp(6);
            let case = match direction {
                SwapDirection::Sell => SwapCase::sell(TokenAmount::from_decimal(
                    self.sell_median * scale,
                    self.token_decimals,
                )?),
                SwapDirection::Buy => SwapCase::buy(TokenAmount::from_decimal(
                    self.buy_median * scale,
                    self.native_decimals,
                )?),
            };
            cases.push(case);
        }

        Ok(cases)
    }
}

/// A schedule replaying a fixed list of cases.
#[derive(Debug, Clone, Default)]
pub struct FixedSchedule {
    pub cases: Vec<SwapCase>,
}

impl FixedSchedule {
    pub fn new(cases: Vec<SwapCase>) -> Self {
        Self { cases }
    }
}

impl SwapSchedule for FixedSchedule {
    fn generate(&mut self) -> Result<Vec<SwapCase>> {
        Ok(self.cases.clone())
    }
}
