//! External collaborators of the launch pool.
//!
//! In-memory stand-ins for the contracts the deployment and the oracle talk to:
//! - Fungible token ledgers (`Erc20Ledger`, `WrappedNative`) and a token directory
//! - The pool registry: authoritative pool store, liquidity seeding and swaps
//! - A swap router exposing `exact_input_single`
//! - An injectable clock for deadlines and timestamps

/// Clocks.
pub mod clock;
/// Pool registry.
pub mod pools;
/// Prelude module for convenient imports.
pub mod prelude;
/// Swap router.
pub mod router;
/// Token ledgers and directory.
pub mod tokens;

use async_trait::async_trait;
use clmm_launch_domain::entities::pool::{Pool, PoolHandle};
use clmm_launch_domain::error::Result;

/// Read-only access to pool state.
#[async_trait]
pub trait PoolFetcher: Send + Sync {
    /// Returns a snapshot of the pool behind `handle`.
    async fn fetch_pool(&self, handle: &PoolHandle) -> Result<Pool>;
}
