use crate::tokens::ledger::{Erc20Ledger, FungibleToken};
use async_trait::async_trait;
use clmm_launch_domain::entities::token::Token;
use clmm_launch_domain::error::{LaunchError, Result};
use clmm_launch_domain::token::{Address, TokenAmount};
use primitive_types::H160;
use tracing::info;

/// Canonical wrapped-ether address, used as the default wrapped native token.
pub const DEFAULT_WRAPPED_NATIVE_ADDRESS: H160 = H160([
    0xc0, 0x2a, 0xaa, 0x39, 0xb2, 0x23, 0xfe, 0x8d, 0x0a, 0x0e, 0x5c, 0x4f, 0x27, 0xea, 0xd9,
    0x08, 0x3c, 0x75, 0x6c, 0xc2,
]);

/// Wrapped native asset: supply is created by `deposit` and destroyed by `withdraw`.
#[derive(Debug)]
pub struct WrappedNative {
    ledger: Erc20Ledger,
}

impl WrappedNative {
    #[must_use]
    pub fn new(metadata: Token) -> Self {
        Self {
            ledger: Erc20Ledger::new(metadata, None),
        }
    }

    /// Wraps `value` of native asset attached by `account`.
    pub async fn deposit(&self, account: Address, value: TokenAmount) -> Result<()> {
        if value.is_zero() {
            return Err(LaunchError::InvalidAmount("zero deposit".to_string()));
        }
        self.ledger.issue(account, value).await?;
        info!(?account, %value, "Wrapped native deposit");
        Ok(())
    }

    /// Unwraps `value` back to native asset.
    pub async fn withdraw(&self, account: Address, value: TokenAmount) -> Result<()> {
        self.ledger.retire(account, value).await?;
        info!(?account, %value, "Wrapped native withdrawal");
        Ok(())
    }

    pub async fn is_conserved(&self) -> bool {
        self.ledger.is_conserved().await
    }
}

#[async_trait]
impl FungibleToken for WrappedNative {
    fn metadata(&self) -> &Token {
        self.ledger.metadata()
    }

    async fn total_supply(&self) -> TokenAmount {
        self.ledger.total_supply().await
    }

    async fn balance_of(&self, owner: Address) -> TokenAmount {
        self.ledger.balance_of(owner).await
    }

    async fn allowance(&self, owner: Address, spender: Address) -> TokenAmount {
        self.ledger.allowance(owner, spender).await
    }

    async fn transfer(&self, from: Address, to: Address, amount: TokenAmount) -> Result<()> {
        self.ledger.transfer(from, to, amount).await
    }

    async fn approve(&self, owner: Address, spender: Address, amount: TokenAmount) -> Result<()> {
        self.ledger.approve(owner, spender, amount).await
    }

    async fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: TokenAmount,
    ) -> Result<()> {
        self.ledger.transfer_from(spender, from, to, amount).await
    }

    /// Wrapped supply only comes from deposits.
    async fn mint(&self, caller: Address, _to: Address, _amount: TokenAmount) -> Result<()> {
        Err(LaunchError::Unauthorized(caller))
    }

    async fn burn(&self, from: Address, amount: TokenAmount) -> Result<()> {
        self.ledger.burn(from, amount).await
    }
}
