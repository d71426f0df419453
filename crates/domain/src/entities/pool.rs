use crate::error::{LaunchError, Result};
use crate::fees::{FeeAccumulation, FeeTier};
use crate::math::concentrated_liquidity::{amounts_for_liquidity, liquidity_for_amounts};
use crate::math::swap_math::compute_swap_step;
use crate::token::{Address, TokenAmount};
use crate::value_objects::sqrt_price::SqrtPriceX96;
use crate::value_objects::tick::Tick;
use primitive_types::{H160, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a registered pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolHandle(pub Uuid);

impl PoolHandle {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Ledger account that holds the pool's reserves.
    pub fn account(&self) -> Address {
        let mut bytes = [0u8; 20];
        bytes[4..].copy_from_slice(self.0.as_bytes());
        H160(bytes)
    }
}

impl Default for PoolHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PoolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical `(token0, token1, fee)` identity of a pool, with `token0 < token1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolKey {
    pub token0: Address,
    pub token1: Address,
    pub fee_tier: FeeTier,
}

impl PoolKey {
    /// Orders the pair by address bytes. Identical or zero addresses are rejected.
    pub fn new(token_a: Address, token_b: Address, fee_tier: FeeTier) -> Result<Self> {
        if token_a == token_b {
            return Err(LaunchError::InvalidTokenPair(format!(
                "identical tokens {token_a:?}"
            )));
        }
        if token_a.is_zero() || token_b.is_zero() {
            return Err(LaunchError::InvalidTokenPair("zero address".to_string()));
        }
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        Ok(Self {
            token0,
            token1,
            fee_tier,
        })
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?} {}", self.token0, self.token1, self.fee_tier)
    }
}

/// Liquidity minted by a deposit and the amounts it actually requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityDelta {
    pub liquidity: u128,
    pub amount0: TokenAmount,
    pub amount1: TokenAmount,
}

/// Priced but not yet applied exact-input swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub zero_for_one: bool,
    /// Input taken from the payer, fee included.
    pub amount_in: TokenAmount,
    pub amount_out: TokenAmount,
    pub fee_amount: TokenAmount,
    pub sqrt_price_after: SqrtPriceX96,
    pub tick_after: Tick,
}

/// Concentrated-liquidity pool with a single full-range liquidity band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub handle: PoolHandle,
    pub token0: Address,
    pub token1: Address,
    pub fee_tier: FeeTier,
    pub sqrt_price: SqrtPriceX96,
    /// Always `sqrt_price.tick()`.
    pub tick: Tick,
    pub liquidity: u128,
    pub fees: FeeAccumulation,
    /// Unix seconds.
    pub created_at: u64,
}

impl Pool {
    pub fn new(handle: PoolHandle, key: PoolKey, sqrt_price: SqrtPriceX96, created_at: u64) -> Self {
        Self {
            handle,
            token0: key.token0,
            token1: key.token1,
            fee_tier: key.fee_tier,
            sqrt_price,
            tick: sqrt_price.tick(),
            liquidity: 0,
            fees: FeeAccumulation::default(),
            created_at,
        }
    }

    pub fn key(&self) -> PoolKey {
        PoolKey {
            token0: self.token0,
            token1: self.token1,
            fee_tier: self.fee_tier,
        }
    }

    pub fn account(&self) -> Address {
        self.handle.account()
    }

    pub fn contains(&self, token: Address) -> bool {
        token == self.token0 || token == self.token1
    }

    /// The counterpart of `token` in this pool.
    pub fn other(&self, token: Address) -> Result<Address> {
        if token == self.token0 {
            Ok(self.token1)
        } else if token == self.token1 {
            Ok(self.token0)
        } else {
            Err(LaunchError::InvalidTokenPair(format!(
                "token {token:?} not in pool {}",
                self.handle
            )))
        }
    }

    /// Whether selling `token_in` moves the pool from token0 to token1.
    pub fn zero_for_one(&self, token_in: Address) -> Result<bool> {
        self.other(token_in).map(|_| token_in == self.token0)
    }

    pub fn min_usable_tick(&self) -> Tick {
        self.fee_tier.min_usable_tick()
    }

    pub fn max_usable_tick(&self) -> Tick {
        self.fee_tier.max_usable_tick()
    }

    /// Sqrt-prices of the full-range band.
    pub fn range_bounds(&self) -> (SqrtPriceX96, SqrtPriceX96) {
        (
            self.min_usable_tick().sqrt_price(),
            self.max_usable_tick().sqrt_price(),
        )
    }

    pub fn is_consistent(&self) -> bool {
        self.tick == self.sqrt_price.tick()
    }

    /// Full-range liquidity the amounts can fund, and what it costs.
    ///
    /// Fails with `InsufficientFunds` when the price is inside the band and
    /// either amount is zero, or when no liquidity results.
    pub fn liquidity_for_deposit(
        &self,
        amount0: TokenAmount,
        amount1: TokenAmount,
    ) -> Result<LiquidityDelta> {
        let (lower, upper) = self.range_bounds();
        let current = self.sqrt_price;
        if current > lower && current < upper && (amount0.is_zero() || amount1.is_zero()) {
            return Err(LaunchError::InsufficientFunds(
                "both tokens are required while the price is inside the range".to_string(),
            ));
        }

        let liquidity = liquidity_for_amounts(
            current.as_u256(),
            lower.as_u256(),
            upper.as_u256(),
            amount0.as_u256(),
            amount1.as_u256(),
        )?;
        if liquidity == 0 {
            return Err(LaunchError::InsufficientFunds(
                "deposit mints no liquidity".to_string(),
            ));
        }

        let (required0, required1) = amounts_for_liquidity(
            current.as_u256(),
            lower.as_u256(),
            upper.as_u256(),
            liquidity,
            true,
        )?;
        Ok(LiquidityDelta {
            liquidity,
            amount0: TokenAmount(required0),
            amount1: TokenAmount(required1),
        })
    }

    /// Adds minted liquidity to the band.
    pub fn add_liquidity(&mut self, delta: &LiquidityDelta) -> Result<()> {
        self.liquidity = self
            .liquidity
            .checked_add(delta.liquidity)
            .ok_or(LaunchError::Overflow("pool liquidity"))?;
        Ok(())
    }

    /// Prices an exact-input swap without mutating the pool.
    ///
    /// `sqrt_price_limit` defaults to the edge of the sqrt-price domain; the band
    /// edge caps the move either way.
    pub fn quote_exact_input(
        &self,
        zero_for_one: bool,
        amount_in: TokenAmount,
        sqrt_price_limit: Option<SqrtPriceX96>,
    ) -> Result<SwapQuote> {
        if amount_in.is_zero() {
            return Err(LaunchError::InvalidAmount("zero swap input".to_string()));
        }
        if self.liquidity == 0 {
            return Err(LaunchError::InsufficientFunds(
                "pool has no liquidity".to_string(),
            ));
        }

        let current = self.sqrt_price.as_u256();
        let limit = self.validate_limit(zero_for_one, sqrt_price_limit)?;
        let (lower, upper) = self.range_bounds();
        let target = if zero_for_one {
            limit.max(lower.as_u256())
        } else {
            limit.min(upper.as_u256())
        };
        if (zero_for_one && target >= current) || (!zero_for_one && target <= current) {
            return Err(LaunchError::InsufficientFunds(
                "no liquidity in swap direction".to_string(),
            ));
        }

        let step = compute_swap_step(
            current,
            target,
            self.liquidity,
            amount_in.as_u256(),
            self.fee_tier.pips(),
        )?;
        if step.amount_out.is_zero() {
            return Err(LaunchError::InvalidAmount(format!(
                "input {amount_in} yields no output"
            )));
        }

        let sqrt_price_after = SqrtPriceX96::new(step.sqrt_price_next)?;
        Ok(SwapQuote {
            zero_for_one,
            amount_in: TokenAmount(step.amount_in + step.fee_amount),
            amount_out: TokenAmount(step.amount_out),
            fee_amount: TokenAmount(step.fee_amount),
            sqrt_price_after,
            tick_after: sqrt_price_after.tick(),
        })
    }

    fn validate_limit(
        &self,
        zero_for_one: bool,
        sqrt_price_limit: Option<SqrtPriceX96>,
    ) -> Result<U256> {
        let current = self.sqrt_price.as_u256();
        match sqrt_price_limit {
            None if zero_for_one => Ok(SqrtPriceX96::MIN.as_u256() + U256::one()),
            None => Ok(SqrtPriceX96::MAX.as_u256() - U256::one()),
            Some(limit) => {
                let limit = limit.as_u256();
                let valid = if zero_for_one {
                    limit < current && limit > SqrtPriceX96::MIN.as_u256()
                } else {
                    limit > current && limit < SqrtPriceX96::MAX.as_u256()
                };
                if valid {
                    Ok(limit)
                } else {
                    Err(LaunchError::InvalidPriceLimit(format!(
                        "limit {limit} on wrong side of current price {current}"
                    )))
                }
            }
        }
    }

    /// Commits a quote produced by `quote_exact_input` on this pool state.
    pub fn apply(&mut self, quote: &SwapQuote) -> Result<()> {
        self.fees.record(quote.zero_for_one, quote.fee_amount)?;
        self.sqrt_price = quote.sqrt_price_after;
        self.tick = quote.tick_after;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E18: u64 = 1_000_000_000_000_000_000;

    fn addr(n: u64) -> Address {
        H160::from_low_u64_be(n)
    }

    fn seeded_pool_at_one() -> Pool {
        let key = PoolKey::new(addr(1), addr(2), FeeTier::Medium).unwrap();
        let mut pool = Pool::new(PoolHandle::new(), key, SqrtPriceX96::ONE, 0);
        let delta = pool
            .liquidity_for_deposit(TokenAmount::from(E18), TokenAmount::from(E18))
            .unwrap();
        pool.add_liquidity(&delta).unwrap();
        pool
    }

    #[test]
    fn test_pool_key_ordering() {
        let key = PoolKey::new(addr(9), addr(3), FeeTier::Low).unwrap();
        assert_eq!(key.token0, addr(3));
        assert_eq!(key.token1, addr(9));
        assert_eq!(key, PoolKey::new(addr(3), addr(9), FeeTier::Low).unwrap());

        assert!(matches!(
            PoolKey::new(addr(3), addr(3), FeeTier::Low),
            Err(LaunchError::InvalidTokenPair(_))
        ));
        assert!(PoolKey::new(Address::zero(), addr(3), FeeTier::Low).is_err());
    }

    #[test]
    fn test_handle_account_is_stable_and_distinct() {
        let a = PoolHandle::new();
        let b = PoolHandle::new();
        assert_eq!(a.account(), a.account());
        assert_ne!(a.account(), b.account());
        assert!(!a.account().is_zero());
    }

    #[test]
    fn test_new_pool_is_consistent() {
        let key = PoolKey::new(addr(1), addr(2), FeeTier::Medium).unwrap();
        let pool = Pool::new(PoolHandle::new(), key, SqrtPriceX96::ONE, 0);
        assert_eq!(pool.tick, Tick::ZERO);
        assert_eq!(pool.liquidity, 0);
        assert!(pool.is_consistent());
    }

    #[test]
    fn test_deposit_requires_both_tokens_inside_range() {
        let key = PoolKey::new(addr(1), addr(2), FeeTier::Medium).unwrap();
        let pool = Pool::new(PoolHandle::new(), key, SqrtPriceX96::ONE, 0);
        assert!(matches!(
            pool.liquidity_for_deposit(TokenAmount::from(E18), TokenAmount::zero()),
            Err(LaunchError::InsufficientFunds(_))
        ));
    }

    #[test]
    fn test_quote_and_apply() {
        let mut pool = seeded_pool_at_one();
        let quote = pool
            .quote_exact_input(true, TokenAmount::from(1_000_000_000_000_000u64), None)
            .unwrap();
        assert_eq!(quote.amount_in, TokenAmount::from(1_000_000_000_000_000u64));
        assert_eq!(quote.amount_out, TokenAmount::from(996_006_981_039_903u64));
        assert_eq!(quote.tick_after.value(), -20);

        pool.apply(&quote).unwrap();
        assert_eq!(pool.sqrt_price, quote.sqrt_price_after);
        assert_eq!(pool.fees.amount0, TokenAmount::from(3_000_000_000_000u64));
        assert!(pool.is_consistent());
    }

    #[test]
    fn test_quote_rejects_bad_limits() {
        let pool = seeded_pool_at_one();
        let above = Tick::new(10).unwrap().sqrt_price();
        assert!(matches!(
            pool.quote_exact_input(true, TokenAmount::from(E18), Some(above)),
            Err(LaunchError::InvalidPriceLimit(_))
        ));
        assert!(matches!(
            pool.quote_exact_input(false, TokenAmount::from(E18), Some(pool.sqrt_price)),
            Err(LaunchError::InvalidPriceLimit(_))
        ));
    }

    #[test]
    fn test_quote_stops_at_limit() {
        let pool = seeded_pool_at_one();
        let limit = Tick::new(-5).unwrap().sqrt_price();
        let quote = pool
            .quote_exact_input(true, TokenAmount::from(E18), Some(limit))
            .unwrap();
        assert_eq!(quote.sqrt_price_after, limit);
        assert_eq!(quote.tick_after.value(), -5);
        assert!(quote.amount_in < TokenAmount::from(E18));
    }

    #[test]
    fn test_quote_without_liquidity() {
        let key = PoolKey::new(addr(1), addr(2), FeeTier::Medium).unwrap();
        let pool = Pool::new(PoolHandle::new(), key, SqrtPriceX96::ONE, 0);
        assert!(matches!(
            pool.quote_exact_input(true, TokenAmount::from(E18), None),
            Err(LaunchError::InsufficientFunds(_))
        ));
    }
}
