use crate::error::Result;
use crate::fees::FEE_DENOMINATOR;
use crate::math::full_math::{mul_div, mul_div_rounding_up};
use crate::math::sqrt_price_math::{amount0_delta, amount1_delta, next_sqrt_price_from_input};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Result of swapping within one liquidity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapStep {
    /// Sqrt-price after the step.
    pub sqrt_price_next: U256,
    /// Input consumed, excluding the fee.
    pub amount_in: U256,
    /// Output paid by the pool.
    pub amount_out: U256,
    /// Fee charged on the input.
    pub fee_amount: U256,
}

/// Computes an exact-input swap step from `sqrt_price_current` towards
/// `sqrt_price_target`, charging `fee_pips` on the input.
///
/// The direction is implied by the target: a lower target sells token0.
/// `amount_in + fee_amount` never exceeds `amount_remaining`.
pub fn compute_swap_step(
    sqrt_price_current: U256,
    sqrt_price_target: U256,
    liquidity: u128,
    amount_remaining: U256,
    fee_pips: u32,
) -> Result<SwapStep> {
    let zero_for_one = sqrt_price_current >= sqrt_price_target;
    let denominator = U256::from(FEE_DENOMINATOR);
    let fee = U256::from(fee_pips);

    let amount_remaining_less_fee = mul_div(amount_remaining, denominator - fee, denominator)?;
    let max_in = if zero_for_one {
        amount0_delta(sqrt_price_target, sqrt_price_current, liquidity, true)?
    } else {
        amount1_delta(sqrt_price_current, sqrt_price_target, liquidity, true)?
    };

    let sqrt_price_next = if amount_remaining_less_fee >= max_in {
        sqrt_price_target
    } else {
        next_sqrt_price_from_input(
            sqrt_price_current,
            liquidity,
            amount_remaining_less_fee,
            zero_for_one,
        )?
    };
    let reached_target = sqrt_price_next == sqrt_price_target;

    let (amount_in, amount_out) = if zero_for_one {
        let amount_in = if reached_target {
            max_in
        } else {
            amount0_delta(sqrt_price_next, sqrt_price_current, liquidity, true)?
        };
        (
            amount_in,
            amount1_delta(sqrt_price_next, sqrt_price_current, liquidity, false)?,
        )
    } else {
        let amount_in = if reached_target {
            max_in
        } else {
            amount1_delta(sqrt_price_current, sqrt_price_next, liquidity, true)?
        };
        (
            amount_in,
            amount0_delta(sqrt_price_current, sqrt_price_next, liquidity, false)?,
        )
    };

    // The remainder is the fee when the target was not reached.
    let fee_amount = if reached_target {
        mul_div_rounding_up(amount_in, fee, denominator - fee)?
    } else {
        amount_remaining - amount_in
    };

    Ok(SwapStep {
        sqrt_price_next,
        amount_in,
        amount_out,
        fee_amount,
    })
}
