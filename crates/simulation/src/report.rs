//! Scenario results.

use crate::schedule::SwapDirection;
use clmm_launch_domain::entities::pool::PoolHandle;
use clmm_launch_domain::token::TokenAmount;
use clmm_launch_domain::value_objects::price::Price;
use clmm_launch_domain::value_objects::sqrt_price::SqrtPriceX96;
use clmm_launch_domain::value_objects::tick::Tick;
use serde::{Deserialize, Serialize};

/// Pool reading taken through the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Effective price of the launched token in wrapped native.
    pub price: Price,
    pub sqrt_price: SqrtPriceX96,
    pub tick: Tick,
}

/// Outcome of one scheduled swap and the pool reading taken after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRecord {
    /// Position in the schedule.
    pub index: usize,
    pub direction: SwapDirection,
    pub amount_in: TokenAmount,
    /// Output amount, absent when the swap failed.
    pub amount_out: Option<TokenAmount>,
    pub observation: PriceObservation,
    /// Error text of a failed swap.
    pub error: Option<String>,
}

impl SwapRecord {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate view over a scenario's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub total_swaps: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Successful sells.
    pub sells: usize,
    /// Successful buys.
    pub buys: usize,
    pub first_price: Price,
    pub last_price: Price,
    pub min_price: Price,
    pub max_price: Price,
    /// Final tick minus initial tick.
    pub net_tick_move: i64,
}

impl ScenarioSummary {
    /// Summarises `records` relative to the reading taken before the first swap.
    pub fn from_records(initial: &PriceObservation, records: &[SwapRecord]) -> Self {
        let succeeded = records.iter().filter(|r| r.succeeded()).count();
        let count_side = |side: SwapDirection| {
            records
                .iter()
                .filter(|r| r.succeeded() && r.direction == side)
                .count()
        };

        let prices = || {
            std::iter::once(initial.price).chain(records.iter().map(|r| r.observation.price))
        };
        let last = records.last().map_or(*initial, |r| r.observation);

        Self {
            total_swaps: records.len(),
            succeeded,
            failed: records.len() - succeeded,
            sells: count_side(SwapDirection::Sell),
            buys: count_side(SwapDirection::Buy),
            first_price: initial.price,
            last_price: last.price,
            min_price: prices().min().unwrap_or(initial.price),
            max_price: prices().max().unwrap_or(initial.price),
            net_tick_move: i64::from(last.tick.value()) - i64::from(initial.tick.value()),
        }
    }
}

/// Full result of a scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub pool: PoolHandle,
    /// Reading before the first swap.
    pub initial: PriceObservation,
    pub records: Vec<SwapRecord>,
    pub summary: ScenarioSummary,
}

impl ScenarioReport {
    pub fn new(pool: PoolHandle, initial: PriceObservation, records: Vec<SwapRecord>) -> Self {
        let summary = ScenarioSummary::from_records(&initial, &records);
        Self {
            pool,
            initial,
            records,
            summary,
        }
    }

    /// Records of failed swaps.
    pub fn failures(&self) -> impl Iterator<Item = &SwapRecord> {
        self.records.iter().filter(|r| !r.succeeded())
    }
}
