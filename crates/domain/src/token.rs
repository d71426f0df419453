use crate::error::{LaunchError, Result};
use primitive_types::{H160, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 20-byte account or token address.
pub type Address = H160;

/// Returns `10^exponent`, failing when it does not fit in 256 bits.
pub fn pow10(exponent: u32) -> Result<U256> {
    U256::from(10u8)
        .checked_pow(U256::from(exponent))
        .ok_or(LaunchError::Overflow("pow10"))
}

/// Raw token amount in the token's smallest unit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TokenAmount(pub U256);

impl TokenAmount {
    pub fn new(amount: impl Into<U256>) -> Self {
        Self(amount.into())
    }

    pub fn zero() -> Self {
        Self(U256::zero())
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Amount of `whole` tokens at the given number of decimals.
    pub fn from_units(whole: u64, decimals: u8) -> Result<Self> {
        U256::from(whole)
            .checked_mul(pow10(u32::from(decimals))?)
            .map(Self)
            .ok_or(LaunchError::Overflow("token amount"))
    }

    /// Converts a human-readable decimal into raw units, truncating digits
    /// beyond the token's precision.
    pub fn from_decimal(value: Decimal, decimals: u8) -> Result<Self> {
        if value < Decimal::ZERO {
            return Err(LaunchError::InvalidAmount(format!(
                "negative amount {value}"
            )));
        }
        let mantissa = U256::from(value.mantissa().unsigned_abs());
        let scaled = mantissa
            .checked_mul(pow10(u32::from(decimals))?)
            .ok_or(LaunchError::Overflow("token amount"))?;
        Ok(Self(scaled / pow10(value.scale())?))
    }

    /// Renders the amount as a decimal number of whole tokens.
    pub fn to_decimal(&self, decimals: u8) -> Result<Decimal> {
        scaled_decimal(self.0, u32::from(decimals))
    }

    pub fn checked_add(self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(LaunchError::Overflow("token amount addition"))
    }

    pub fn checked_sub(self, other: Self) -> Result<Self> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(LaunchError::InsufficientBalance {
                required: other.0,
                available: self.0,
            })
    }
}

/// Largest mantissa a `Decimal` can carry (96 bits).
const DECIMAL_MAX_MANTISSA: u128 = (1u128 << 96) - 1;

/// Builds `value / 10^scale` as a `Decimal`, dropping trailing precision when
/// the integer is wider than a decimal mantissa.
pub(crate) fn scaled_decimal(value: U256, scale: u32) -> Result<Decimal> {
    let mut value = value;
    let mut scale = scale;
    while value > U256::from(DECIMAL_MAX_MANTISSA) || scale > 28 {
        if scale == 0 {
            return Err(LaunchError::Overflow("decimal conversion"));
        }
        value /= U256::from(10u8);
        scale -= 1;
    }
    let mantissa =
        i128::try_from(value.low_u128()).map_err(|_| LaunchError::Overflow("decimal conversion"))?;
    Decimal::try_from_i128_with_scale(mantissa, scale)
        .map_err(|_| LaunchError::Overflow("decimal conversion"))
}

impl From<u64> for TokenAmount {
    fn from(v: u64) -> Self {
        Self(U256::from(v))
    }
}

impl From<u128> for TokenAmount {
    fn from(v: u128) -> Self {
        Self(U256::from(v))
    }
}

impl From<U256> for TokenAmount {
    fn from(v: U256) -> Self {
        Self(v)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_units() {
        let amount = TokenAmount::from_units(100, 18).unwrap();
        assert_eq!(amount.to_string(), "100000000000000000000");
    }

    #[test]
    fn test_from_decimal_truncates_extra_precision() {
        let amount = TokenAmount::from_decimal(dec!(0.02), 18).unwrap();
        assert_eq!(amount, TokenAmount::from(20_000_000_000_000_000u64));

        let amount = TokenAmount::from_decimal(dec!(1.23456789), 6).unwrap();
        assert_eq!(amount, TokenAmount::from(1_234_567u64));

        assert!(TokenAmount::from_decimal(dec!(-1), 18).is_err());
    }

    #[test]
    fn test_to_decimal() {
        let amount = TokenAmount::from_units(3200, 18).unwrap();
        assert_eq!(amount.to_decimal(18).unwrap(), dec!(3200));

        let amount = TokenAmount::from(1_280_000_000_000_000_000u64);
        assert_eq!(amount.to_decimal(18).unwrap(), dec!(1.28));
    }

    #[test]
    fn test_checked_sub_reports_shortfall() {
        let a = TokenAmount::from(5u64);
        let b = TokenAmount::from(7u64);
        assert_eq!(
            a.checked_sub(b),
            Err(LaunchError::InsufficientBalance {
                required: U256::from(7),
                available: U256::from(5),
            })
        );
        assert_eq!(b.checked_sub(a).unwrap(), TokenAmount::from(2u64));
    }
}
