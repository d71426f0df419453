//! Deploy-once pool deployment manager.
//!
//! The manager lists a token it holds against wrapped native funding:
//! it prices the pool from `funding / token balance`, creates the pool in the
//! registry and seeds it with its whole token balance. A deployment happens
//! at most once; every later call fails with `AlreadyDeployed`.

use chrono::{DateTime, Utc};
use clmm_launch_domain::entities::pool::{LiquidityDelta, Pool, PoolHandle, PoolKey};
use clmm_launch_domain::error::{LaunchError, Result};
use clmm_launch_domain::fees::FeeTier;
use clmm_launch_domain::math::price_math::encode_sqrt_ratio_x96;
use clmm_launch_domain::token::{Address, TokenAmount};
use clmm_launch_domain::value_objects::sqrt_price::SqrtPriceX96;
use clmm_launch_protocols::pools::registry::PoolRegistry;
use clmm_launch_protocols::tokens::ledger::FungibleToken;
use clmm_launch_protocols::tokens::wrapped::WrappedNative;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Configuration for deployments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Fee tier of the launch pool.
    pub fee_tier: FeeTier,
}

/// Deployment state machine phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentPhase {
    /// No pool yet; the only phase that accepts a deploy.
    #[default]
    Uninitialized,
    /// A deploy is in progress.
    Deploying,
    /// The pool exists and the deployment parameters are fixed.
    Deployed,
}

/// Snapshot of the manager's deployment record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerState {
    pub phase: DeploymentPhase,
    /// Pool handle, present only once deployed.
    pub pool: Option<PoolHandle>,
    /// The listed token.
    pub token: Option<Address>,
    /// Manager's token balance at deploy time.
    pub token_balance: TokenAmount,
    /// Native funding supplied at deploy time.
    pub native_funding: TokenAmount,
    /// Liquidity minted into the pool.
    pub liquidity: u128,
    pub deployed_at: Option<DateTime<Utc>>,
}

/// Everything a deploy needs, computed before the first mutation.
struct DeploymentPlan {
    token: Address,
    wrapped_native: Address,
    fee_tier: FeeTier,
    sqrt_price: SqrtPriceX96,
    amount0: TokenAmount,
    amount1: TokenAmount,
    funding: TokenAmount,
    balance: TokenAmount,
}

/// Creates and seeds the launch pool exactly once.
pub struct PoolDeploymentManager {
    /// Account that holds the listed token and pays for seeding.
    account: Address,
    config: DeploymentConfig,
    registry: Arc<PoolRegistry>,
    wrapped_native: Arc<WrappedNative>,
    state: RwLock<ManagerState>,
}

impl PoolDeploymentManager {
    /// Creates a manager acting as `account`.
    pub fn new(
        account: Address,
        config: DeploymentConfig,
        registry: Arc<PoolRegistry>,
        wrapped_native: Arc<WrappedNative>,
    ) -> Self {
        Self {
            account,
            config,
            registry,
            wrapped_native,
            state: RwLock::new(ManagerState::default()),
        }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    /// Snapshot of the deployment record.
    pub async fn state(&self) -> ManagerState {
        self.state.read().await.clone()
    }

    /// Handle of the deployed pool.
    pub async fn get_address_pool(&self) -> Result<PoolHandle> {
        let state = self.state.read().await;
        match (state.phase, state.pool) {
            (DeploymentPhase::Deployed, Some(handle)) => Ok(handle),
            _ => Err(LaunchError::NotDeployed),
        }
    }

    /// Creates the pool for `token`, priced at `native_funding / balance`,
    /// and seeds it with the funding and the manager's whole token balance.
    ///
    /// Holds the state lock for the whole deploy, so concurrent callers
    /// serialize and exactly one succeeds. On failure any partial effect is
    /// compensated and the phase returns to `Uninitialized`.
    pub async fn deploy_coin_and_pool(
        &self,
        native_funding: TokenAmount,
        token: Address,
    ) -> Result<PoolHandle> {
        let mut state = self.state.write().await;
        if state.phase != DeploymentPhase::Uninitialized {
            return Err(LaunchError::AlreadyDeployed);
        }

        let plan = self.plan(native_funding, token).await?;
        state.phase = DeploymentPhase::Deploying;

        match self.execute(&plan).await {
            Ok((handle, delta)) => {
                *state = ManagerState {
                    phase: DeploymentPhase::Deployed,
                    pool: Some(handle),
                    token: Some(plan.token),
                    token_balance: plan.balance,
                    native_funding: plan.funding,
                    liquidity: delta.liquidity,
                    deployed_at: Some(Utc::now()),
                };
                info!(
                    pool = %handle,
                    token = ?plan.token,
                    funding = %plan.funding,
                    balance = %plan.balance,
                    sqrt_price = %plan.sqrt_price,
                    tick = %plan.sqrt_price.tick(),
                    liquidity = delta.liquidity,
                    "Deployment completed"
                );
                Ok(handle)
            }
            Err(err) => {
                state.phase = DeploymentPhase::Uninitialized;
                warn!(token = ?plan.token, error = %err, "Deployment failed");
                Err(err)
            }
        }
    }

    /// Validates the preconditions and runs the pure math.
    async fn plan(&self, native_funding: TokenAmount, token: Address) -> Result<DeploymentPlan> {
        if native_funding.is_zero() {
            return Err(LaunchError::InvalidAmount("zero native funding".to_string()));
        }
        let wrapped_native = self.wrapped_native.address();
        let key = PoolKey::new(wrapped_native, token, self.config.fee_tier)?;

        let ledger = self.registry.directory().get(token).await?;
        let balance = ledger.balance_of(self.account).await;
        if balance.is_zero() {
            return Err(LaunchError::InsufficientTokenBalance(token));
        }

        let (amount0, amount1) = if key.token0 == wrapped_native {
            (native_funding, balance)
        } else {
            (balance, native_funding)
        };
        let sqrt_price = encode_sqrt_ratio_x96(amount1.as_u256(), amount0.as_u256())?;

        if self
            .registry
            .get_pool(key.token0, key.token1, key.fee_tier)
            .await
            .is_ok()
        {
            return Err(LaunchError::AlreadyExists(format!("pool {key}")));
        }
        // Dry-run the seeding math on a scratch pool.
        Pool::new(PoolHandle::new(), key, sqrt_price, 0).liquidity_for_deposit(amount0, amount1)?;

        Ok(DeploymentPlan {
            token,
            wrapped_native,
            fee_tier: key.fee_tier,
            sqrt_price,
            amount0,
            amount1,
            funding: native_funding,
            balance,
        })
    }

    async fn execute(&self, plan: &DeploymentPlan) -> Result<(PoolHandle, LiquidityDelta)> {
        let handle = self
            .registry
            .create_pool(plan.wrapped_native, plan.token, plan.fee_tier, plan.sqrt_price)
            .await?;

        if let Err(err) = self.wrapped_native.deposit(self.account, plan.funding).await {
            self.remove_pool(handle).await;
            return Err(err);
        }

        match self
            .registry
            .seed_liquidity(handle, self.account, plan.amount0, plan.amount1)
            .await
        {
            Ok(delta) => Ok((handle, delta)),
            Err(err) => {
                if let Err(unwind) = self.wrapped_native.withdraw(self.account, plan.funding).await
                {
                    warn!(pool = %handle, error = %unwind, "Could not withdraw wrapped funding");
                }
                self.remove_pool(handle).await;
                Err(err)
            }
        }
    }

    async fn remove_pool(&self, handle: PoolHandle) {
        if let Err(err) = self.registry.remove_empty_pool(handle).await {
            warn!(pool = %handle, error = %err, "Could not remove pool");
        }
    }
}
