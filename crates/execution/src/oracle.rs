//! Read-only price oracle over a registered pool.

use clmm_launch_domain::entities::pool::{Pool, PoolHandle};
use clmm_launch_domain::error::{LaunchError, Result};
use clmm_launch_domain::math::price_math::effective_price;
use clmm_launch_domain::token::Address;
use clmm_launch_domain::value_objects::price::Price;
use clmm_launch_domain::value_objects::sqrt_price::SqrtPriceX96;
use clmm_launch_domain::value_objects::tick::Tick;
use clmm_launch_protocols::PoolFetcher;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Price oracle bound to at most one pool.
///
/// Prices are quoted in units of `quote_asset` per unit of the pool's other
/// token, whichever side of the canonical ordering the quote asset sits on.
pub struct PriceOracle {
    fetcher: Arc<dyn PoolFetcher>,
    quote_asset: Address,
    bound: RwLock<Option<PoolHandle>>,
}

impl PriceOracle {
    /// Creates an unbound oracle quoting in `quote_asset`.
    pub fn new(fetcher: Arc<dyn PoolFetcher>, quote_asset: Address) -> Self {
        Self {
            fetcher,
            quote_asset,
            bound: RwLock::new(None),
        }
    }

    pub fn quote_asset(&self) -> Address {
        self.quote_asset
    }

    pub async fn bound_pool(&self) -> Option<PoolHandle> {
        *self.bound.read().await
    }

    /// Binds the oracle to `handle`, replacing any previous binding.
    pub async fn set_pool(&self, handle: PoolHandle) -> Result<()> {
        let pool = self.fetcher.fetch_pool(&handle).await?;
        if !pool.contains(self.quote_asset) {
            return Err(LaunchError::QuoteAssetMissing(self.quote_asset));
        }
        let mut bound = self.bound.write().await;
        let previous = bound.replace(handle);
        info!(pool = %handle, previous = ?previous, "Oracle bound");
        Ok(())
    }

    async fn bound_snapshot(&self) -> Result<Pool> {
        let handle = self.bound_pool().await.ok_or(LaunchError::UnboundOracle)?;
        self.fetcher.fetch_pool(&handle).await
    }

    /// Orientation-corrected price of the pool's other token in quote units.
    pub async fn calc_effective_price(&self) -> Result<Price> {
        let pool = self.bound_snapshot().await?;
        effective_price(&pool, self.quote_asset)
    }

    /// Raw sqrt-price and tick of the bound pool.
    pub async fn get_pool_price(&self) -> Result<(SqrtPriceX96, Tick)> {
        let pool = self.bound_snapshot().await?;
        Ok((pool.sqrt_price, pool.tick))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clmm_launch_domain::entities::pool::PoolKey;
    use clmm_launch_domain::fees::FeeTier;
    use clmm_launch_domain::math::price_math::encode_sqrt_ratio_x96;
    use primitive_types::{H160, U256};
    use std::collections::HashMap;

    /// Fixed set of pools.
    struct StaticPools(HashMap<PoolHandle, Pool>);

    #[async_trait]
    impl PoolFetcher for StaticPools {
        async fn fetch_pool(&self, handle: &PoolHandle) -> Result<Pool> {
            self.0
                .get(handle)
                .cloned()
                .ok_or_else(|| LaunchError::NotFound(format!("pool {handle}")))
        }
    }

    fn addr(n: u64) -> Address {
        H160::from_low_u64_be(n)
    }

    fn pool(token_a: Address, token_b: Address, sqrt_price: SqrtPriceX96) -> Pool {
        let key = PoolKey::new(token_a, token_b, FeeTier::Medium).unwrap();
        Pool::new(PoolHandle::new(), key, sqrt_price, 0)
    }

    fn oracle_with(pools: Vec<Pool>, quote: Address) -> PriceOracle {
        let pools = pools.into_iter().map(|pool| (pool.handle, pool)).collect();
        PriceOracle::new(Arc::new(StaticPools(pools)), quote)
    }

    #[tokio::test]
    async fn test_unbound_oracle_fails() {
        let oracle = oracle_with(vec![], addr(1));
        assert_eq!(oracle.bound_pool().await, None);
        assert_eq!(
            oracle.calc_effective_price().await,
            Err(LaunchError::UnboundOracle)
        );
        assert_eq!(oracle.get_pool_price().await, Err(LaunchError::UnboundOracle));
    }

    #[tokio::test]
    async fn test_set_pool_validation() {
        let p = pool(addr(1), addr(2), SqrtPriceX96::ONE);
        let handle = p.handle;
        let oracle = oracle_with(vec![p], addr(3));

        assert_eq!(
            oracle.set_pool(handle).await,
            Err(LaunchError::QuoteAssetMissing(addr(3)))
        );
        assert!(matches!(
            oracle.set_pool(PoolHandle::new()).await,
            Err(LaunchError::NotFound(_))
        ));
        assert_eq!(oracle.bound_pool().await, None);
    }

    #[tokio::test]
    async fn test_rebinding_overwrites() {
        let cheap = pool(addr(1), addr(2), Tick::new(-1000).unwrap().sqrt_price());
        let dear = pool(addr(1), addr(3), Tick::new(1000).unwrap().sqrt_price());
        let (cheap_handle, dear_handle) = (cheap.handle, dear.handle);
        let oracle = oracle_with(vec![cheap, dear], addr(1));

        oracle.set_pool(cheap_handle).await.unwrap();
        oracle.set_pool(cheap_handle).await.unwrap();
        let first = oracle.calc_effective_price().await.unwrap();

        oracle.set_pool(dear_handle).await.unwrap();
        assert_eq!(oracle.bound_pool().await, Some(dear_handle));
        assert_eq!(oracle.get_pool_price().await.unwrap().1.value(), 1000);
        assert!(oracle.calc_effective_price().await.unwrap() < first);
    }

    #[tokio::test]
    async fn test_orientation() {
        let e18 = U256::from(1_000_000_000_000_000_000u64);
        let funding = U256::from(100u64) * e18;
        let balance = U256::from(40_000_000u64) * e18;
        let launch_price = U256::from(2_500_000_000_000u64);

        // Quote asset is token1: raw price.
        let weth_high = addr(0x9000);
        let token_low = addr(0x1000);
        let raw = pool(weth_high, token_low, encode_sqrt_ratio_x96(funding, balance).unwrap());
        let handle = raw.handle;
        let oracle = oracle_with(vec![raw], weth_high);
        oracle.set_pool(handle).await.unwrap();
        let price = oracle.calc_effective_price().await.unwrap();
        assert_eq!(price.wad(), launch_price - U256::one());

        // Quote asset is token0: reciprocal.
        let weth_low = addr(0x0100);
        let token_high = addr(0x1000);
        let flipped = pool(weth_low, token_high, encode_sqrt_ratio_x96(balance, funding).unwrap());
        let handle = flipped.handle;
        let oracle = oracle_with(vec![flipped], weth_low);
        oracle.set_pool(handle).await.unwrap();
        let price = oracle.calc_effective_price().await.unwrap();
        assert_eq!(price.wad(), launch_price);

        let (sqrt_price, tick) = oracle.get_pool_price().await.unwrap();
        assert_eq!(sqrt_price.tick(), tick);
        let inverted = sqrt_price.to_price().invert();
        assert!(price.abs_diff(&inverted) <= price.raw() / U256::exp10(20) + U256::one());
    }
}
