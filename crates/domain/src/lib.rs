//! Domain model for the token launch pool.
//!
//! This crate contains the pure, synchronous core shared by every other crate:
//! - Fixed-point price math (tick grid, sqrt-price, liquidity and swap steps)
//! - Value objects (`TokenAmount`, `Price`, `SqrtPriceX96`, `Tick`, `FeeTier`)
//! - Entities (`Pool`, `Token`)
//! - The error taxonomy shared by the workspace

/// Pool and token entities.
pub mod entities;
/// Error types.
pub mod error;
/// Fee tiers and fee accounting.
pub mod fees;
/// Fixed-point math.
pub mod math;
/// Prelude module for convenient imports.
pub mod prelude;
/// Addresses and token amounts.
pub mod token;
/// Price, sqrt-price and tick value objects.
pub mod value_objects;

pub use error::{LaunchError, Result};
