use crate::tokens::ledger::FungibleToken;
use clmm_launch_domain::error::{LaunchError, Result};
use clmm_launch_domain::token::Address;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Lookup of token ledgers by address.
#[derive(Default)]
pub struct TokenDirectory {
    tokens: RwLock<HashMap<Address, Arc<dyn FungibleToken>>>,
}

impl TokenDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token under its own address.
    pub async fn register(&self, token: Arc<dyn FungibleToken>) -> Result<()> {
        let address = token.address();
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&address) {
            return Err(LaunchError::AlreadyExists(format!("token {address:?}")));
        }
        info!(?address, symbol = token.symbol(), "Registered token");
        tokens.insert(address, token);
        Ok(())
    }

    pub async fn get(&self, address: Address) -> Result<Arc<dyn FungibleToken>> {
        self.tokens
            .read()
            .await
            .get(&address)
            .cloned()
            .ok_or_else(|| LaunchError::NotFound(format!("token {address:?}")))
    }

    pub async fn contains(&self, address: Address) -> bool {
        self.tokens.read().await.contains_key(&address)
    }
}
