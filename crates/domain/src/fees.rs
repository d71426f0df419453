use crate::error::{LaunchError, Result};
use crate::token::TokenAmount;
use crate::value_objects::tick::{MAX_TICK, MIN_TICK, Tick};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fee denominator: fees are expressed in hundredths of a basis point (pips).
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// Supported pool fee tiers.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum FeeTier {
    /// 0.05 %, tick spacing 10.
    Low,
    /// 0.30 %, tick spacing 60.
    #[default]
    Medium,
    /// 1.00 %, tick spacing 200.
    High,
}

impl FeeTier {
    /// All supported tiers, lowest fee first.
    pub const ALL: [FeeTier; 3] = [FeeTier::Low, FeeTier::Medium, FeeTier::High];

    /// Resolves a fee expressed in pips.
    pub fn from_pips(pips: u32) -> Result<Self> {
        match pips {
            500 => Ok(Self::Low),
            3000 => Ok(Self::Medium),
            10_000 => Ok(Self::High),
            other => Err(LaunchError::InvalidFeeTier(other)),
        }
    }

    /// Fee in hundredths of a basis point.
    pub fn pips(self) -> u32 {
        match self {
            Self::Low => 500,
            Self::Medium => 3000,
            Self::High => 10_000,
        }
    }

    /// Fee in basis points.
    pub fn bps(self) -> u32 {
        self.pips() / 100
    }

    pub fn tick_spacing(self) -> i32 {
        match self {
            Self::Low => 10,
            Self::Medium => 60,
            Self::High => 200,
        }
    }

    /// Lowest initializable tick for this spacing; the lower full-range bound.
    pub fn min_usable_tick(self) -> Tick {
        let spacing = self.tick_spacing();
        Tick::from_raw((MIN_TICK / spacing) * spacing)
    }

    /// Highest initializable tick for this spacing; the upper full-range bound.
    pub fn max_usable_tick(self) -> Tick {
        let spacing = self.tick_spacing();
        Tick::from_raw((MAX_TICK / spacing) * spacing)
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = LaunchError;

    fn try_from(pips: u32) -> Result<Self> {
        Self::from_pips(pips)
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pips = self.pips();
        write!(f, "{}.{:02}%", pips / 10_000, (pips % 10_000) / 100)
    }
}

/// Fees collected by a pool, per token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeAccumulation {
    pub amount0: TokenAmount,
    pub amount1: TokenAmount,
}

impl FeeAccumulation {
    /// Adds a fee charged on the input side of a swap.
    pub fn record(&mut self, zero_for_one: bool, fee: TokenAmount) -> Result<()> {
        if zero_for_one {
            self.amount0 = self.amount0.checked_add(fee)?;
        } else {
            self.amount1 = self.amount1.checked_add(fee)?;
        }
        Ok(())
    }
}
