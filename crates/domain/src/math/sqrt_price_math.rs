//! Token deltas and price movement inside a single liquidity band.

use crate::error::{LaunchError, Result};
use crate::math::full_math::{div_rounding_up, mul_div, mul_div_rounding_up, narrow, widen};
use crate::value_objects::sqrt_price::Q96;
use primitive_types::{U256, U512};

fn sorted(a: U256, b: U256) -> (U256, U256) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Amount of token0 between two sqrt-prices for `liquidity`:
/// `L * 2^96 * (sqrt_b - sqrt_a) / (sqrt_a * sqrt_b)`.
pub fn amount0_delta(
    sqrt_price_a: U256,
    sqrt_price_b: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256> {
    let (lower, upper) = sorted(sqrt_price_a, sqrt_price_b);
    if lower.is_zero() {
        return Err(LaunchError::InvalidAmount("zero sqrt price".to_string()));
    }
    let numerator1 = U256::from(liquidity) << 96usize;
    let numerator2 = upper - lower;

    if round_up {
        div_rounding_up(mul_div_rounding_up(numerator1, numerator2, upper)?, lower)
    } else {
        Ok(mul_div(numerator1, numerator2, upper)? / lower)
    }
}

/// Amount of token1 between two sqrt-prices for `liquidity`:
/// `L * (sqrt_b - sqrt_a) / 2^96`.
pub fn amount1_delta(
    sqrt_price_a: U256,
    sqrt_price_b: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256> {
    let (lower, upper) = sorted(sqrt_price_a, sqrt_price_b);
    let liquidity = U256::from(liquidity);
    if round_up {
        mul_div_rounding_up(liquidity, upper - lower, Q96)
    } else {
        mul_div(liquidity, upper - lower, Q96)
    }
}

/// Sqrt-price after adding `amount_in` of the input token to the band.
///
/// Rounds in the pool's favour: token0 input rounds the price up, token1
/// input rounds it down, so the price never moves further than the input pays for.
pub fn next_sqrt_price_from_input(
    sqrt_price: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256> {
    if sqrt_price.is_zero() {
        return Err(LaunchError::InvalidAmount("zero sqrt price".to_string()));
    }
    if liquidity == 0 {
        return Err(LaunchError::InsufficientFunds(
            "band has no liquidity".to_string(),
        ));
    }
    if zero_for_one {
        next_sqrt_price_from_amount0(sqrt_price, liquidity, amount_in)
    } else {
        next_sqrt_price_from_amount1(sqrt_price, liquidity, amount_in)
    }
}

// ceil(L * 2^96 * sqrtP / (L * 2^96 + amount * sqrtP))
fn next_sqrt_price_from_amount0(sqrt_price: U256, liquidity: u128, amount: U256) -> Result<U256> {
    if amount.is_zero() {
        return Ok(sqrt_price);
    }
    let numerator1 = widen(U256::from(liquidity)) << 96usize;
    let numerator = numerator1 * widen(sqrt_price);
    let denominator = numerator1 + widen(amount) * widen(sqrt_price);

    let mut quotient = numerator / denominator;
    if !(numerator % denominator).is_zero() {
        quotient += U512::one();
    }
    narrow(quotient)
}

// sqrtP + floor(amount * 2^96 / L)
fn next_sqrt_price_from_amount1(sqrt_price: U256, liquidity: u128, amount: U256) -> Result<U256> {
    let quotient = (widen(amount) << 96usize) / widen(U256::from(liquidity));
    narrow(widen(sqrt_price) + quotient)
}
