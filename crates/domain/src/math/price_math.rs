use crate::entities::pool::Pool;
use crate::error::{LaunchError, Result};
use crate::math::full_math::{narrow, truncate, widen};
use crate::token::Address;
use crate::value_objects::price::{PRICE_SCALE, Price};
use crate::value_objects::sqrt_price::SqrtPriceX96;
use crate::value_objects::tick::Tick;
use primitive_types::U256;

/// `price = (sqrtP / 2^96)^2`, token1 per token0, floored to 38 decimals.
pub fn sqrt_price_to_price(sqrt_price: SqrtPriceX96) -> Price {
    let squared = widen(sqrt_price.as_u256()) * widen(sqrt_price.as_u256());
    // sqrtP < 2^160 and the scale < 2^127, so the shifted product fits in 256 bits.
    Price::from_raw(truncate((squared * widen(PRICE_SCALE)) >> 192usize))
}

/// Token0 per token1: `2^192 * 1e38 / sqrtP^2`, floored.
pub fn reciprocal_price(sqrt_price: SqrtPriceX96) -> Price {
    let squared = widen(sqrt_price.as_u256()) * widen(sqrt_price.as_u256());
    Price::from_raw(truncate((widen(PRICE_SCALE) << 192usize) / squared))
}

/// Encodes `amount1 / amount0` as a sqrt-price:
/// `floor(sqrt(amount1 * 2^192 / amount0))`.
pub fn encode_sqrt_ratio_x96(amount1: U256, amount0: U256) -> Result<SqrtPriceX96> {
    if amount0.is_zero() {
        return Err(LaunchError::InvalidAmount(
            "zero denominator amount".to_string(),
        ));
    }
    let ratio = (widen(amount1) << 192usize) / widen(amount0);
    SqrtPriceX96::new(narrow(ratio.integer_sqrt())?)
}

/// Tick of a linear token1/token0 price.
pub fn price_to_tick(price: Price) -> Result<Tick> {
    Ok(encode_sqrt_ratio_x96(price.raw(), PRICE_SCALE)?.tick())
}

/// Price of the pool's other token expressed in units of `quote`.
///
/// When `quote` is token1 this is the raw pool price; when it is token0 the
/// reciprocal is taken directly from the sqrt-price.
pub fn effective_price(pool: &Pool, quote: Address) -> Result<Price> {
    if quote == pool.token1 {
        Ok(sqrt_price_to_price(pool.sqrt_price))
    } else if quote == pool.token0 {
        Ok(reciprocal_price(pool.sqrt_price))
    } else {
        Err(LaunchError::QuoteAssetMissing(quote))
    }
}
