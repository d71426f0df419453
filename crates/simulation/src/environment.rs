//! In-memory launch environment.
//!
//! Wires the token directory, the wrapped native token, the launched token,
//! the pool registry, the deployment manager, the router and the oracle the
//! same way a live deployment would, so scenarios run against the real
//! services.

use crate::report::PriceObservation;
use clmm_launch_domain::entities::pool::PoolHandle;
use clmm_launch_domain::entities::token::Token;
use clmm_launch_domain::error::Result;
use clmm_launch_domain::fees::FeeTier;
use clmm_launch_domain::token::{Address, TokenAmount};
use clmm_launch_execution::manager::{DeploymentConfig, PoolDeploymentManager};
use clmm_launch_execution::oracle::PriceOracle;
use clmm_launch_protocols::clock::Clock;
use clmm_launch_protocols::pools::registry::PoolRegistry;
use clmm_launch_protocols::router::{Router, RouterConfig, SwapRouter};
use clmm_launch_protocols::tokens::directory::TokenDirectory;
use clmm_launch_protocols::tokens::ledger::{Erc20Ledger, FungibleToken};
use clmm_launch_protocols::tokens::wrapped::{DEFAULT_WRAPPED_NATIVE_ADDRESS, WrappedNative};
use primitive_types::H160;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Parameters of the launched token and the accounts around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub token_address: Address,
    pub token_symbol: String,
    pub token_name: String,
    pub token_decimals: u8,
    /// Initial supply in whole tokens, handed to the manager.
    pub supply: u64,
    /// Token owner; mints the supply and any trader budget.
    pub deployer: Address,
    /// Account the deployment manager acts as.
    pub manager_account: Address,
    pub fee_tier: FeeTier,
    pub router: RouterConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            token_address: H160::from_low_u64_be(0x1000),
            token_symbol: "LCH".to_string(),
            token_name: "Launch Token".to_string(),
            token_decimals: 18,
            supply: 40_000_000,
            deployer: H160::from_low_u64_be(0xd0),
            manager_account: H160::from_low_u64_be(0xd1),
            fee_tier: FeeTier::default(),
            router: RouterConfig::default(),
        }
    }
}

/// Live set of launch services.
pub struct LaunchEnvironment {
    pub config: EnvironmentConfig,
    pub clock: Arc<dyn Clock>,
    pub directory: Arc<TokenDirectory>,
    pub wrapped_native: Arc<WrappedNative>,
    pub token: Arc<Erc20Ledger>,
    pub registry: Arc<PoolRegistry>,
    pub manager: Arc<PoolDeploymentManager>,
    pub router: Arc<dyn SwapRouter>,
    pub oracle: Arc<PriceOracle>,
}

impl LaunchEnvironment {
    /// Registers both tokens, mints the supply to the deployer and hands it
    /// to the manager.
    pub async fn bootstrap(config: EnvironmentConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let directory = Arc::new(TokenDirectory::new());
        let wrapped_native = Arc::new(WrappedNative::new(Token::new(
            DEFAULT_WRAPPED_NATIVE_ADDRESS,
            "WETH",
            18,
            "Wrapped Ether",
        )));
        let token = Arc::new(Erc20Ledger::new(
            Token::new(
                config.token_address,
                config.token_symbol.clone(),
                config.token_decimals,
                config.token_name.clone(),
            ),
            Some(config.deployer),
        ));
        directory.register(wrapped_native.clone()).await?;
        directory.register(token.clone()).await?;

        let supply = TokenAmount::from_units(config.supply, config.token_decimals)?;
        if !supply.is_zero() {
            token.mint(config.deployer, config.deployer, supply).await?;
            token
                .transfer(config.deployer, config.manager_account, supply)
                .await?;
        }

        let registry = Arc::new(PoolRegistry::new(directory.clone(), clock.clone()));
        let manager = Arc::new(PoolDeploymentManager::new(
            config.manager_account,
            DeploymentConfig {
                fee_tier: config.fee_tier,
            },
            registry.clone(),
            wrapped_native.clone(),
        ));
        let router = Arc::new(Router::new(
            config.router.clone(),
            registry.clone(),
            clock.clone(),
        ));
        let oracle = Arc::new(PriceOracle::new(
            registry.clone(),
            wrapped_native.address(),
        ));

        info!(
            token = %config.token_symbol,
            address = ?config.token_address,
            %supply,
            "Launch environment ready"
        );

        Ok(Self {
            config,
            clock,
            directory,
            wrapped_native,
            token,
            registry,
            manager,
            router,
            oracle,
        })
    }

    /// Deploys the launch pool with `funding` wrapped native and binds the
    /// oracle to it.
    pub async fn launch(&self, funding: TokenAmount) -> Result<PoolHandle> {
        let handle = self
            .manager
            .deploy_coin_and_pool(funding, self.token.address())
            .await?;
        self.oracle.set_pool(handle).await?;
        Ok(handle)
    }

    /// Current effective price and raw pool price.
    pub async fn observe(&self) -> Result<PriceObservation> {
        let price = self.oracle.calc_effective_price().await?;
        let (sqrt_price, tick) = self.oracle.get_pool_price().await?;
        Ok(PriceObservation {
            price,
            sqrt_price,
            tick,
        })
    }
}
