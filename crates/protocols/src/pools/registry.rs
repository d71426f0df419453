//! Authoritative pool store.
//!
//! The registry owns every pool and is the only component that mutates one:
//! - Pool creation keyed by the canonical `(token0, token1, fee)` triple
//! - Full-range liquidity seeding
//! - Exact-input swaps against the pool's liquidity band
//!
//! Each pool sits behind its own lock; a mutation holds the pool's write lock
//! for the whole computation and settlement.

use crate::PoolFetcher;
use crate::clock::Clock;
use crate::tokens::directory::TokenDirectory;
use crate::tokens::ledger::FungibleToken;
use async_trait::async_trait;
use clmm_launch_domain::entities::pool::{LiquidityDelta, Pool, PoolHandle, PoolKey};
use clmm_launch_domain::error::{LaunchError, Result};
use clmm_launch_domain::fees::FeeTier;
use clmm_launch_domain::token::{Address, TokenAmount};
use clmm_launch_domain::value_objects::sqrt_price::SqrtPriceX96;
use clmm_launch_domain::value_objects::tick::Tick;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Exact-input swap request as executed by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRequest {
    /// Account whose allowance is consumed.
    pub spender: Address,
    /// Account paying the input.
    pub payer: Address,
    /// Account receiving the output.
    pub recipient: Address,
    pub token_in: Address,
    pub amount_in: TokenAmount,
    pub amount_out_minimum: TokenAmount,
    /// `None` swaps up to the edge of the price domain.
    pub sqrt_price_limit: Option<SqrtPriceX96>,
}

/// Settled swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub handle: PoolHandle,
    pub zero_for_one: bool,
    /// Input taken from the payer, fee included.
    pub amount_in: TokenAmount,
    pub amount_out: TokenAmount,
    pub fee_amount: TokenAmount,
    pub sqrt_price_before: SqrtPriceX96,
    pub sqrt_price_after: SqrtPriceX96,
    pub tick_before: Tick,
    pub tick_after: Tick,
}

#[derive(Default)]
struct RegistryIndex {
    by_key: HashMap<PoolKey, PoolHandle>,
    pools: HashMap<PoolHandle, Arc<RwLock<Pool>>>,
}

/// Pool registry backed by a token directory.
pub struct PoolRegistry {
    directory: Arc<TokenDirectory>,
    clock: Arc<dyn Clock>,
    index: RwLock<RegistryIndex>,
}

impl PoolRegistry {
    /// Creates an empty registry.
    pub fn new(directory: Arc<TokenDirectory>, clock: Arc<dyn Clock>) -> Self {
        Self {
            directory,
            clock,
            index: RwLock::new(RegistryIndex::default()),
        }
    }

    /// Token directory the registry settles through.
    pub fn directory(&self) -> &Arc<TokenDirectory> {
        &self.directory
    }

    /// Creates an uninitialized-liquidity pool at `initial_sqrt_price`.
    ///
    /// The pair is ordered canonically; a second pool for the same pair and
    /// fee fails with `AlreadyExists` regardless of argument order.
    pub async fn create_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee_tier: FeeTier,
        initial_sqrt_price: SqrtPriceX96,
    ) -> Result<PoolHandle> {
        let key = PoolKey::new(token_a, token_b, fee_tier)?;
        for token in [key.token0, key.token1] {
            if !self.directory.contains(token).await {
                return Err(LaunchError::NotFound(format!("token {token:?}")));
            }
        }

        let mut index = self.index.write().await;
        if index.by_key.contains_key(&key) {
            return Err(LaunchError::AlreadyExists(format!("pool {key}")));
        }

        let handle = PoolHandle::new();
        let pool = Pool::new(handle, key, initial_sqrt_price, self.clock.now());
        info!(
            pool = %handle,
            token0 = ?pool.token0,
            token1 = ?pool.token1,
            fee = %fee_tier,
            sqrt_price = %pool.sqrt_price,
            tick = %pool.tick,
            "Pool created"
        );
        index.by_key.insert(key, handle);
        index.pools.insert(handle, Arc::new(RwLock::new(pool)));
        Ok(handle)
    }

    /// Looks up a pool by pair and fee, in either token order.
    ///
    /// A malformed pair (identical or zero addresses) names no pool and
    /// fails with `NotFound`.
    pub async fn get_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee_tier: FeeTier,
    ) -> Result<PoolHandle> {
        let key = PoolKey::new(token_a, token_b, fee_tier).map_err(|err| match err {
            LaunchError::InvalidTokenPair(reason) => {
                LaunchError::NotFound(format!("pool for malformed pair: {reason}"))
            }
            other => other,
        })?;
        self.index
            .read()
            .await
            .by_key
            .get(&key)
            .copied()
            .ok_or_else(|| LaunchError::NotFound(format!("pool {key}")))
    }

    /// Snapshot of a pool.
    pub async fn pool(&self, handle: PoolHandle) -> Result<Pool> {
        let cell = self.pool_cell(handle).await?;
        let pool = cell.read().await;
        Ok(pool.clone())
    }

    /// Snapshots of every registered pool.
    pub async fn pools(&self) -> Vec<Pool> {
        let cells: Vec<_> = self.index.read().await.pools.values().cloned().collect();
        let mut pools = Vec::with_capacity(cells.len());
        for cell in cells {
            pools.push(cell.read().await.clone());
        }
        pools.sort_by_key(|pool| pool.created_at);
        pools
    }

    async fn pool_cell(&self, handle: PoolHandle) -> Result<Arc<RwLock<Pool>>> {
        self.index
            .read()
            .await
            .pools
            .get(&handle)
            .cloned()
            .ok_or_else(|| LaunchError::NotFound(format!("pool {handle}")))
    }

    async fn ledgers(&self, pool: &Pool) -> Result<(Arc<dyn FungibleToken>, Arc<dyn FungibleToken>)> {
        Ok((
            self.directory.get(pool.token0).await?,
            self.directory.get(pool.token1).await?,
        ))
    }

    /// Deposits full-range liquidity from `payer`.
    ///
    /// Only the amounts the minted liquidity requires are pulled; the rest
    /// stays with the payer.
    pub async fn seed_liquidity(
        &self,
        handle: PoolHandle,
        payer: Address,
        amount0: TokenAmount,
        amount1: TokenAmount,
    ) -> Result<LiquidityDelta> {
        let cell = self.pool_cell(handle).await?;
        let mut pool = cell.write().await;

        let delta = pool.liquidity_for_deposit(amount0, amount1)?;
        let mut next = pool.clone();
        next.add_liquidity(&delta)?;

        let (token0, token1) = self.ledgers(&pool).await?;
        let account = pool.account();
        token0.transfer(payer, account, delta.amount0).await?;
        if let Err(err) = token1.transfer(payer, account, delta.amount1).await {
            warn!(pool = %handle, error = %err, "Seeding failed, refunding token0");
            if let Err(refund) = token0.transfer(account, payer, delta.amount0).await {
                warn!(pool = %handle, error = %refund, "Token0 refund failed");
            }
            return Err(err);
        }

        *pool = next;
        info!(
            pool = %handle,
            liquidity = delta.liquidity,
            amount0 = %delta.amount0,
            amount1 = %delta.amount1,
            "Liquidity seeded"
        );
        Ok(delta)
    }

    /// Executes an exact-input swap.
    ///
    /// The pool and both ledgers are left unchanged when any step fails.
    pub async fn swap(&self, handle: PoolHandle, request: SwapRequest) -> Result<SwapOutcome> {
        let cell = self.pool_cell(handle).await?;
        let mut pool = cell.write().await;

        let zero_for_one = pool.zero_for_one(request.token_in)?;
        let quote =
            pool.quote_exact_input(zero_for_one, request.amount_in, request.sqrt_price_limit)?;
        if quote.amount_out < request.amount_out_minimum {
            return Err(LaunchError::SlippageExceeded {
                amount_out: quote.amount_out.as_u256(),
                minimum: request.amount_out_minimum.as_u256(),
            });
        }
        let mut next = pool.clone();
        next.apply(&quote)?;

        let (token0, token1) = self.ledgers(&pool).await?;
        let (token_in, token_out) = if zero_for_one {
            (token0, token1)
        } else {
            (token1, token0)
        };
        let account = pool.account();

        let allowance = token_in.allowance(request.payer, request.spender).await;
        token_in
            .transfer_from(request.spender, request.payer, account, quote.amount_in)
            .await?;
        if let Err(err) = token_out
            .transfer(account, request.recipient, quote.amount_out)
            .await
        {
            warn!(pool = %handle, error = %err, "Swap payout failed, refunding input");
            if let Err(refund) = token_in
                .transfer(account, request.payer, quote.amount_in)
                .await
            {
                warn!(pool = %handle, error = %refund, "Input refund failed");
            } else if let Err(restore) = token_in
                .approve(request.payer, request.spender, allowance)
                .await
            {
                warn!(pool = %handle, error = %restore, "Allowance restore failed");
            }
            return Err(err);
        }

        let outcome = SwapOutcome {
            handle,
            zero_for_one,
            amount_in: quote.amount_in,
            amount_out: quote.amount_out,
            fee_amount: quote.fee_amount,
            sqrt_price_before: pool.sqrt_price,
            sqrt_price_after: quote.sqrt_price_after,
            tick_before: pool.tick,
            tick_after: quote.tick_after,
        };
        *pool = next;
        debug!(
            pool = %handle,
            zero_for_one,
            amount_in = %outcome.amount_in,
            amount_out = %outcome.amount_out,
            fee = %outcome.fee_amount,
            sqrt_price = %outcome.sqrt_price_after,
            tick = %outcome.tick_after,
            "Swap executed"
        );
        Ok(outcome)
    }

    /// Removes a pool that holds no liquidity.
    ///
    /// Used to roll back a pool created by an operation that failed later.
    pub async fn remove_empty_pool(&self, handle: PoolHandle) -> Result<()> {
        let mut index = self.index.write().await;
        let cell = index
            .pools
            .get(&handle)
            .cloned()
            .ok_or_else(|| LaunchError::NotFound(format!("pool {handle}")))?;
        let pool = cell.read().await;
        if pool.liquidity != 0 {
            return Err(LaunchError::InvalidAmount(format!(
                "pool {handle} still holds liquidity {}",
                pool.liquidity
            )));
        }
        index.by_key.remove(&pool.key());
        index.pools.remove(&handle);
        warn!(pool = %handle, "Pool removed");
        Ok(())
    }
}

#[async_trait]
impl PoolFetcher for PoolRegistry {
    async fn fetch_pool(&self, handle: &PoolHandle) -> Result<Pool> {
        self.pool(*handle).await
    }
}
