//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use clmm_launch_domain::prelude::*;
//! ```

// Entities
pub use crate::entities::{LiquidityDelta, Pool, PoolHandle, PoolKey, SwapQuote, Token};

// Errors
pub use crate::error::{LaunchError, Result};

// Fees
pub use crate::fees::{FEE_DENOMINATOR, FeeAccumulation, FeeTier};

// Math
pub use crate::math::price_math::{
    effective_price, encode_sqrt_ratio_x96, price_to_tick, reciprocal_price, sqrt_price_to_price,
};
pub use crate::math::price_tick::{sqrt_price_at_tick, tick_at_sqrt_price};

// Tokens
pub use crate::token::{Address, TokenAmount};

// Value objects
pub use crate::value_objects::{
    MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, PRICE_DECIMALS, PRICE_SCALE, Price,
    SqrtPriceX96, Tick, WAD,
};
