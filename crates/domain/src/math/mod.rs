//! Integer and fixed-point math for the concentrated-liquidity pool.
//!
//! - `full_math`: 512-bit multiply/divide helpers
//! - `price_tick`: tick grid <-> sqrt-price conversion
//! - `sqrt_price_math`: token deltas and next sqrt-price for a liquidity band
//! - `concentrated_liquidity`: liquidity <-> token amounts for a price range
//! - `swap_math`: a single exact-input swap step
//! - `price_math`: linear prices, sqrt-price encoding and effective price

pub mod concentrated_liquidity;
pub mod full_math;
pub mod price_math;
pub mod price_tick;
pub mod sqrt_price_math;
pub mod swap_math;
