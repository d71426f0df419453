use crate::error::{LaunchError, Result};
use primitive_types::{U256, U512};

/// Zero-extends a 256-bit integer to 512 bits.
pub fn widen(value: U256) -> U512 {
    let U256(limbs) = value;
    U512([limbs[0], limbs[1], limbs[2], limbs[3], 0, 0, 0, 0])
}

/// Narrows a 512-bit integer back to 256 bits, failing when the high half is set.
pub fn narrow(value: U512) -> Result<U256> {
    let U512(limbs) = value;
    if limbs[4..].iter().any(|limb| *limb != 0) {
        return Err(LaunchError::Overflow("512-bit narrowing"));
    }
    Ok(U256([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

/// Low 256 bits of a value known to fit.
pub(crate) fn truncate(value: U512) -> U256 {
    let U512(limbs) = value;
    U256([limbs[0], limbs[1], limbs[2], limbs[3]])
}

fn check_denominator(denominator: U256) -> Result<()> {
    if denominator.is_zero() {
        return Err(LaunchError::InvalidAmount("zero denominator".to_string()));
    }
    Ok(())
}

/// `floor(a * b / denominator)` with a full 512-bit intermediate.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256> {
    check_denominator(denominator)?;
    narrow(widen(a) * widen(b) / widen(denominator))
}

/// `ceil(a * b / denominator)` with a full 512-bit intermediate.
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256> {
    check_denominator(denominator)?;
    let product = widen(a) * widen(b);
    let denominator = widen(denominator);
    let mut quotient = product / denominator;
    if !(product % denominator).is_zero() {
        quotient += U512::one();
    }
    narrow(quotient)
}

/// `ceil(a / b)`.
pub fn div_rounding_up(a: U256, b: U256) -> Result<U256> {
    check_denominator(b)?;
    let quotient = a / b;
    if (a % b).is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256::one())
    }
}
