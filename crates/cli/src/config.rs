//! Launch configuration loaded from the environment.

use anyhow::{Context, Result};
use clmm_launch_domain::fees::FeeTier;
use clmm_launch_domain::token::TokenAmount;
use clmm_launch_simulation::environment::EnvironmentConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const FUNDING_VAR: &str = "CLMM_LAUNCH_FUNDING";
pub const SUPPLY_VAR: &str = "CLMM_LAUNCH_SUPPLY";
pub const FEE_TIER_VAR: &str = "CLMM_LAUNCH_FEE_TIER";
pub const DECIMALS_VAR: &str = "CLMM_LAUNCH_DECIMALS";
pub const SEED_VAR: &str = "CLMM_LAUNCH_SEED";

/// Parameters of a launch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Native funding in whole units.
    pub funding: Decimal,
    /// Token supply handed to the manager, in whole tokens.
    pub supply: u64,
    pub fee_tier: FeeTier,
    /// Decimals of the launched token.
    pub decimals: u8,
    /// Seed of the random schedule.
    pub seed: u64,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            funding: Decimal::from(100),
            supply: 40_000_000,
            fee_tier: FeeTier::Medium,
            decimals: 18,
            seed: 42,
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("invalid {key} value {raw:?}"))
        })
        .transpose()
}

impl LaunchConfig {
    /// Reads the process environment, falling back to defaults for unset
    /// variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(funding) = parse(&lookup, FUNDING_VAR)? {
            config.funding = funding;
        }
        if let Some(supply) = parse(&lookup, SUPPLY_VAR)? {
            config.supply = supply;
        }
        if let Some(pips) = parse::<u32>(&lookup, FEE_TIER_VAR)? {
            config.fee_tier = FeeTier::from_pips(pips)
                .with_context(|| format!("invalid {FEE_TIER_VAR} value {pips}"))?;
        }
        if let Some(decimals) = parse(&lookup, DECIMALS_VAR)? {
            config.decimals = decimals;
        }
        if let Some(seed) = parse(&lookup, SEED_VAR)? {
            config.seed = seed;
        }
        Ok(config)
    }

    /// Funding in raw wrapped native units.
    pub fn funding_amount(&self) -> Result<TokenAmount> {
        TokenAmount::from_decimal(self.funding, 18).context("converting funding amount")
    }

    pub fn environment(&self) -> EnvironmentConfig {
        EnvironmentConfig {
            token_decimals: self.decimals,
            supply: self.supply,
            fee_tier: self.fee_tier,
            ..EnvironmentConfig::default()
        }
    }
}
