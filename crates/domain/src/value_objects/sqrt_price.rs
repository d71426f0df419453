use crate::error::{LaunchError, Result};
use crate::math::{price_math, price_tick};
use crate::value_objects::price::Price;
use crate::value_objects::tick::Tick;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sqrt-price at `MIN_TICK`.
pub const MIN_SQRT_RATIO: U256 = U256([4_295_128_739, 0, 0, 0]);
/// Sqrt-price at `MAX_TICK`.
pub const MAX_SQRT_RATIO: U256 = U256([0x5d95_1d52_6398_8d26, 0xefd1_fc6a_5064_8849, 0xfffd_8963, 0]);
/// `2^96`, the Q64.96 unit.
pub const Q96: U256 = U256([0, 1 << 32, 0, 0]);

/// Square root of the token1/token0 price as a Q64.96 fixed-point number.
///
/// Always within `[MIN_SQRT_RATIO, MAX_SQRT_RATIO]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "U256", into = "U256")]
pub struct SqrtPriceX96(U256);

impl SqrtPriceX96 {
    pub const MIN: SqrtPriceX96 = SqrtPriceX96(MIN_SQRT_RATIO);
    pub const MAX: SqrtPriceX96 = SqrtPriceX96(MAX_SQRT_RATIO);
    /// Price 1.0.
    pub const ONE: SqrtPriceX96 = SqrtPriceX96(Q96);

    /// Validates a raw Q64.96 value against the sqrt-price domain.
    pub fn new(value: U256) -> Result<Self> {
        if value < MIN_SQRT_RATIO || value > MAX_SQRT_RATIO {
            return Err(LaunchError::Range(format!(
                "sqrt price {value} outside [{MIN_SQRT_RATIO}, {MAX_SQRT_RATIO}]"
            )));
        }
        Ok(Self(value))
    }

    pub(crate) const fn from_raw(value: U256) -> Self {
        Self(value)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    /// Greatest tick whose sqrt-price does not exceed this one.
    pub fn tick(&self) -> Tick {
        Tick::from_raw(price_tick::tick_at_ratio(self.0))
    }

    /// Linear token1/token0 price.
    pub fn to_price(&self) -> Price {
        price_math::sqrt_price_to_price(*self)
    }
}

impl TryFrom<U256> for SqrtPriceX96 {
    type Error = LaunchError;

    fn try_from(value: U256) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SqrtPriceX96> for U256 {
    fn from(value: SqrtPriceX96) -> Self {
        value.0
    }
}

impl fmt::Display for SqrtPriceX96 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
