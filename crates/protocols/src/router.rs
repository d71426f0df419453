//! Swap router with a single-pool exact-input entry point.

use crate::clock::Clock;
use crate::pools::registry::{PoolRegistry, SwapRequest};
use async_trait::async_trait;
use clmm_launch_domain::error::{LaunchError, Result};
use clmm_launch_domain::fees::FeeTier;
use clmm_launch_domain::token::{Address, TokenAmount};
use clmm_launch_domain::value_objects::sqrt_price::SqrtPriceX96;
use primitive_types::{H160, U256};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Default router account, the canonical router deployment address.
pub const DEFAULT_ROUTER_ACCOUNT: H160 = H160([
    0xe5, 0x92, 0x42, 0x7a, 0x0a, 0xec, 0xe9, 0x2d, 0xe3, 0xed, 0xee, 0x1f, 0x18, 0xe0, 0x15,
    0x7c, 0x05, 0x86, 0x15, 0x64,
]);

/// Parameters of `exact_input_single`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactInputSingleParams {
    pub token_in: Address,
    pub token_out: Address,
    /// Fee tier in pips.
    pub fee: u32,
    pub recipient: Address,
    /// Unix seconds; the swap fails once the clock is past it.
    pub deadline: u64,
    pub amount_in: TokenAmount,
    pub amount_out_minimum: TokenAmount,
    /// Zero means no limit.
    pub sqrt_price_limit_x96: U256,
}

/// Router interface used by traders and the scenario harness.
#[async_trait]
pub trait SwapRouter: Send + Sync {
    /// Account that traders approve as spender.
    fn account(&self) -> Address;

    /// Swaps exactly `amount_in` of `token_in` for as much `token_out` as
    /// the pool gives, paid by `payer`. Returns the output amount.
    async fn exact_input_single(
        &self,
        payer: Address,
        params: ExactInputSingleParams,
    ) -> Result<TokenAmount>;
}

/// Configuration for the router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Spender account the router acts as.
    pub account: Address,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            account: DEFAULT_ROUTER_ACCOUNT,
        }
    }
}

/// Router over a `PoolRegistry`.
pub struct Router {
    config: RouterConfig,
    registry: Arc<PoolRegistry>,
    clock: Arc<dyn Clock>,
}

impl Router {
    pub fn new(config: RouterConfig, registry: Arc<PoolRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            registry,
            clock,
        }
    }

    fn price_limit(raw: U256) -> Result<Option<SqrtPriceX96>> {
        if raw.is_zero() {
            return Ok(None);
        }
        SqrtPriceX96::new(raw)
            .map(Some)
            .map_err(|err| LaunchError::InvalidPriceLimit(err.to_string()))
    }
}

#[async_trait]
impl SwapRouter for Router {
    fn account(&self) -> Address {
        self.config.account
    }

    async fn exact_input_single(
        &self,
        payer: Address,
        params: ExactInputSingleParams,
    ) -> Result<TokenAmount> {
        let now = self.clock.now();
        if now > params.deadline {
            return Err(LaunchError::DeadlineExpired {
                deadline: params.deadline,
                now,
            });
        }
        let fee_tier = FeeTier::from_pips(params.fee)?;
        let sqrt_price_limit = Self::price_limit(params.sqrt_price_limit_x96)?;
        let handle = self
            .registry
            .get_pool(params.token_in, params.token_out, fee_tier)
            .await?;

        let outcome = self
            .registry
            .swap(
                handle,
                SwapRequest {
                    spender: self.config.account,
                    payer,
                    recipient: params.recipient,
                    token_in: params.token_in,
                    amount_in: params.amount_in,
                    amount_out_minimum: params.amount_out_minimum,
                    sqrt_price_limit,
                },
            )
            .await?;

        info!(
            pool = %handle,
            ?payer,
            amount_in = %outcome.amount_in,
            amount_out = %outcome.amount_out,
            tick = %outcome.tick_after,
            "exactInputSingle"
        );
        Ok(outcome.amount_out)
    }
}
