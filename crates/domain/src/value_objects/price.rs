use crate::error::{LaunchError, Result};
use crate::math::full_math::mul_div;
use crate::token::scaled_decimal;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fractional decimal digits carried by `Price`.
pub const PRICE_DECIMALS: u32 = 38;

/// `10^38`, the fixed-point unit of `Price`.
///
/// `PRICE_SCALE^2` still fits in 256 bits, which `invert` relies on.
pub const PRICE_SCALE: U256 = U256([
    0x098a_2240_0000_0000,
    0x4b3b_4ca8_5a86_c47a,
    0,
    0,
]);

/// `10^18`, the unit of the 18-digit view of a price.
pub const WAD: U256 = U256([1_000_000_000_000_000_000, 0, 0, 0]);

/// Linear price with 38 fractional decimal digits.
///
/// Prices are integers scaled by `PRICE_SCALE`; all arithmetic floors. A
/// launch price around `1e-6` keeps more than 30 significant digits, so a
/// single-unit sqrt-price move still changes the price.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Price {
    value: U256,
}

impl Price {
    pub const ZERO: Price = Price { value: U256([0; 4]) };
    pub const ONE: Price = Price { value: PRICE_SCALE };

    /// Creates a price from its `PRICE_SCALE`-scaled integer.
    pub fn from_raw(value: U256) -> Self {
        Self { value }
    }

    /// Creates a price from an 18-digit (WAD-scaled) integer.
    pub fn from_wad(value: U256) -> Result<Self> {
        value
            .checked_mul(PRICE_SCALE / WAD)
            .map(Self::from_raw)
            .ok_or(LaunchError::Overflow("price from wad"))
    }

    /// `numerator / denominator`, floored to 38 decimals.
    pub fn from_ratio(numerator: U256, denominator: U256) -> Result<Self> {
        mul_div(numerator, PRICE_SCALE, denominator).map(Self::from_raw)
    }

    pub fn raw(&self) -> U256 {
        self.value
    }

    /// The price floored to 18 fractional digits, WAD-scaled.
    pub fn wad(&self) -> U256 {
        self.value / (PRICE_SCALE / WAD)
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Reciprocal price, floored. The reciprocal of zero is zero.
    pub fn invert(&self) -> Self {
        if self.value.is_zero() {
            return Self::ZERO;
        }
        Self {
            value: (PRICE_SCALE * PRICE_SCALE) / self.value,
        }
    }

    /// Decimal rendering for reports; precision beyond 28 fractional or
    /// significant digits is truncated.
    pub fn to_decimal(&self) -> Result<Decimal> {
        scaled_decimal(self.value, PRICE_DECIMALS)
    }

    /// Absolute difference between two prices in `PRICE_SCALE` units.
    pub fn abs_diff(&self, other: &Price) -> U256 {
        if self.value >= other.value {
            self.value - other.value
        } else {
            other.value - self.value
        }
    }
}

impl TryFrom<Decimal> for Price {
    type Error = LaunchError;

    fn try_from(value: Decimal) -> Result<Self> {
        if value < Decimal::ZERO {
            return Err(LaunchError::InvalidAmount(format!("negative price {value}")));
        }
        let mantissa = U256::from(value.mantissa().unsigned_abs());
        let scale = crate::token::pow10(value.scale())?;
        Self::from_ratio(mantissa, scale)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let integer = self.value / PRICE_SCALE;
        let fraction = (self.value % PRICE_SCALE).low_u128();
        write!(f, "{integer}.{fraction:038}")
    }
}
