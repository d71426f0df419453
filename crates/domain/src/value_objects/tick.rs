use crate::error::{LaunchError, Result};
use crate::math::price_tick;
use crate::value_objects::sqrt_price::SqrtPriceX96;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest tick of the price grid; `1.0001^MIN_TICK` is the smallest price.
pub const MIN_TICK: i32 = -887272;
/// Highest tick of the price grid.
pub const MAX_TICK: i32 = 887272;

/// A validated tick on the `1.0001` price grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Tick(i32);

impl Tick {
    pub const MIN: Tick = Tick(MIN_TICK);
    pub const MAX: Tick = Tick(MAX_TICK);
    pub const ZERO: Tick = Tick(0);

    /// Creates a tick, failing outside `[MIN_TICK, MAX_TICK]`.
    pub fn new(value: i32) -> Result<Self> {
        if !(MIN_TICK..=MAX_TICK).contains(&value) {
            return Err(LaunchError::Range(format!(
                "tick {value} outside [{MIN_TICK}, {MAX_TICK}]"
            )));
        }
        Ok(Self(value))
    }

    /// Caller guarantees `value` is inside the tick domain.
    pub(crate) const fn from_raw(value: i32) -> Self {
        Self(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }

    /// Sqrt-price at this tick.
    pub fn sqrt_price(self) -> SqrtPriceX96 {
        SqrtPriceX96::from_raw(price_tick::ratio_at_tick(self.0))
    }
}

impl TryFrom<i32> for Tick {
    type Error = LaunchError;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Tick> for i32 {
    fn from(tick: Tick) -> Self {
        tick.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_domain() {
        assert!(Tick::new(MIN_TICK).is_ok());
        assert!(Tick::new(MAX_TICK).is_ok());
        assert!(matches!(
            Tick::new(MAX_TICK + 1),
            Err(LaunchError::Range(_))
        ));
        assert!(matches!(
            Tick::new(MIN_TICK - 1),
            Err(LaunchError::Range(_))
        ));
    }

    #[test]
    fn test_tick_sqrt_price_round_trip() {
        for value in [MIN_TICK, -128999, -1, 0, 1, 128998, MAX_TICK] {
            let tick = Tick::new(value).unwrap();
            assert_eq!(tick.sqrt_price().tick(), tick);
        }
    }
}
