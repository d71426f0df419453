use crate::error::{LaunchError, Result};
use crate::math::full_math::mul_div;
use crate::math::sqrt_price_math::{amount0_delta, amount1_delta};
use crate::value_objects::sqrt_price::Q96;
use primitive_types::U256;

fn ordered_range(sqrt_price_a: U256, sqrt_price_b: U256) -> Result<(U256, U256)> {
    let (lower, upper) = if sqrt_price_a < sqrt_price_b {
        (sqrt_price_a, sqrt_price_b)
    } else {
        (sqrt_price_b, sqrt_price_a)
    };
    if lower == upper {
        return Err(LaunchError::InvalidAmount("empty price range".to_string()));
    }
    Ok((lower, upper))
}

fn to_liquidity(value: U256) -> Result<u128> {
    if value > U256::from(u128::MAX) {
        return Err(LaunchError::Overflow("liquidity"));
    }
    Ok(value.low_u128())
}

/// Liquidity provided by `amount0` of token0 over a range:
/// `L = amount0 * (sqrt_a * sqrt_b / 2^96) / (sqrt_b - sqrt_a)`.
pub fn liquidity_for_amount0(sqrt_price_a: U256, sqrt_price_b: U256, amount0: U256) -> Result<u128> {
    let (lower, upper) = ordered_range(sqrt_price_a, sqrt_price_b)?;
    let intermediate = mul_div(lower, upper, Q96)?;
    to_liquidity(mul_div(amount0, intermediate, upper - lower)?)
}

/// Liquidity provided by `amount1` of token1 over a range:
/// `L = amount1 * 2^96 / (sqrt_b - sqrt_a)`.
pub fn liquidity_for_amount1(sqrt_price_a: U256, sqrt_price_b: U256, amount1: U256) -> Result<u128> {
    let (lower, upper) = ordered_range(sqrt_price_a, sqrt_price_b)?;
    to_liquidity(mul_div(amount1, Q96, upper - lower)?)
}

/// Largest liquidity both amounts can fund at the current sqrt-price.
///
/// Below the range only token0 counts, above it only token1.
pub fn liquidity_for_amounts(
    sqrt_price: U256,
    sqrt_price_a: U256,
    sqrt_price_b: U256,
    amount0: U256,
    amount1: U256,
) -> Result<u128> {
    let (lower, upper) = ordered_range(sqrt_price_a, sqrt_price_b)?;

    if sqrt_price <= lower {
        liquidity_for_amount0(lower, upper, amount0)
    } else if sqrt_price < upper {
        let liquidity0 = liquidity_for_amount0(sqrt_price, upper, amount0)?;
        let liquidity1 = liquidity_for_amount1(lower, sqrt_price, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        liquidity_for_amount1(lower, upper, amount1)
    }
}

/// Token amounts backing `liquidity` at the current sqrt-price.
///
/// With `round_up` the amounts are what a depositor must pay.
pub fn amounts_for_liquidity(
    sqrt_price: U256,
    sqrt_price_a: U256,
    sqrt_price_b: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<(U256, U256)> {
    let (lower, upper) = ordered_range(sqrt_price_a, sqrt_price_b)?;

    if sqrt_price <= lower {
        Ok((amount0_delta(lower, upper, liquidity, round_up)?, U256::zero()))
    } else if sqrt_price < upper {
        Ok((
            amount0_delta(sqrt_price, upper, liquidity, round_up)?,
            amount1_delta(lower, sqrt_price, liquidity, round_up)?,
        ))
    } else {
        Ok((U256::zero(), amount1_delta(lower, upper, liquidity, round_up)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::FeeTier;

    const E18: u128 = 1_000_000_000_000_000_000;

    fn full_range() -> (U256, U256) {
        (
            FeeTier::Medium.min_usable_tick().sqrt_price().as_u256(),
            FeeTier::Medium.max_usable_tick().sqrt_price().as_u256(),
        )
    }

    #[test]
    fn test_liquidity_at_price_one() {
        let (lower, upper) = full_range();
        let amount = U256::from(E18);
        let liquidity = liquidity_for_amounts(Q96, lower, upper, amount, amount).unwrap();
        assert_eq!(liquidity, E18);

        let (amount0, amount1) = amounts_for_liquidity(Q96, lower, upper, liquidity, true).unwrap();
        assert_eq!(amount0, amount);
        assert_eq!(amount1, amount);
    }

    #[test]
    fn test_launch_liquidity_within_deposit() {
        let (lower, upper) = full_range();
        let sqrt_price = U256::from_dec_str("125270724187523965593206900").unwrap();
        let tokens = U256::from(40_000_000u64) * U256::from(E18);
        let native = U256::from(100u64) * U256::from(E18);

        let liquidity = liquidity_for_amounts(sqrt_price, lower, upper, tokens, native).unwrap();
        assert_eq!(liquidity, 63_245_553_203_367_586_639_983);

        let (amount0, amount1) =
            amounts_for_liquidity(sqrt_price, lower, upper, liquidity, true).unwrap();
        assert!(amount0 <= tokens);
        assert!(amount1 <= native);
    }

    #[test]
    fn test_single_sided_outside_range() {
        let (lower, upper) = full_range();
        let below = lower - U256::one();
        let liquidity =
            liquidity_for_amounts(below, lower, upper, U256::from(E18), U256::zero()).unwrap();
        assert!(liquidity > 0);
        let (_, amount1) = amounts_for_liquidity(below, lower, upper, liquidity, true).unwrap();
        assert!(amount1.is_zero());
    }

    #[test]
    fn test_empty_range_rejected() {
        assert!(matches!(
            liquidity_for_amount1(Q96, Q96, U256::from(E18)),
            Err(LaunchError::InvalidAmount(_))
        ));
    }
}
