use async_trait::async_trait;
use clmm_launch_domain::entities::token::Token;
use clmm_launch_domain::error::{LaunchError, Result};
use clmm_launch_domain::token::{Address, TokenAmount};
use primitive_types::U256;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// ERC-20 style token interface.
///
/// Callers are identified explicitly: `transfer` moves funds out of `from`
/// as if `from` signed the call.
#[async_trait]
pub trait FungibleToken: Send + Sync {
    /// Token metadata.
    fn metadata(&self) -> &Token;

    fn address(&self) -> Address {
        self.metadata().address
    }

    fn symbol(&self) -> &str {
        &self.metadata().symbol
    }

    fn decimals(&self) -> u8 {
        self.metadata().decimals
    }

    async fn total_supply(&self) -> TokenAmount;

    async fn balance_of(&self, owner: Address) -> TokenAmount;

    async fn allowance(&self, owner: Address, spender: Address) -> TokenAmount;

    async fn transfer(&self, from: Address, to: Address, amount: TokenAmount) -> Result<()>;

    /// Sets `spender`'s allowance over `owner`'s balance, replacing the previous one.
    async fn approve(&self, owner: Address, spender: Address, amount: TokenAmount) -> Result<()>;

    /// Moves `amount` from `from` to `to`, consuming `spender`'s allowance.
    async fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: TokenAmount,
    ) -> Result<()>;

    /// Creates new supply. Only the token owner may mint.
    async fn mint(&self, caller: Address, to: Address, amount: TokenAmount) -> Result<()>;

    /// Destroys supply held by `from`.
    async fn burn(&self, from: Address, amount: TokenAmount) -> Result<()>;
}

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    minted: U256,
    burned: U256,
}

impl LedgerState {
    fn balance(&self, owner: &Address) -> U256 {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    fn debit(&mut self, owner: Address, amount: U256) -> Result<()> {
        let available = self.balance(&owner);
        if available < amount {
            return Err(LaunchError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        self.balances.insert(owner, available - amount);
        Ok(())
    }

    fn credit(&mut self, owner: Address, amount: U256) -> Result<()> {
        let balance = self
            .balance(&owner)
            .checked_add(amount)
            .ok_or(LaunchError::Overflow("token balance"))?;
        self.balances.insert(owner, balance);
        Ok(())
    }

    fn move_funds(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        // Validate the credit side before debiting so a failure changes nothing.
        if from != to {
            self.balance(&to)
                .checked_add(amount)
                .ok_or(LaunchError::Overflow("token balance"))?;
        }
        self.debit(from, amount)?;
        self.credit(to, amount)
    }
}

/// In-memory ERC-20 ledger.
///
/// Invariant: the sum of all balances equals `minted - burned`.
#[derive(Debug)]
pub struct Erc20Ledger {
    metadata: Token,
    /// Account allowed to mint; `None` disables `mint`.
    owner: Option<Address>,
    state: RwLock<LedgerState>,
}

impl Erc20Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new(metadata: Token, owner: Option<Address>) -> Self {
        Self {
            metadata,
            owner,
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// Creates supply without the owner check.
    pub(crate) async fn issue(&self, to: Address, amount: TokenAmount) -> Result<()> {
        let mut state = self.state.write().await;
        let minted = state
            .minted
            .checked_add(amount.as_u256())
            .ok_or(LaunchError::Overflow("token supply"))?;
        state.credit(to, amount.as_u256())?;
        state.minted = minted;
        Ok(())
    }

    /// Destroys supply held by `from`.
    pub(crate) async fn retire(&self, from: Address, amount: TokenAmount) -> Result<()> {
        let mut state = self.state.write().await;
        state.debit(from, amount.as_u256())?;
        state.burned += amount.as_u256();
        Ok(())
    }

    /// Checks `sum(balances) == minted - burned`.
    pub async fn is_conserved(&self) -> bool {
        let state = self.state.read().await;
        let total = state
            .balances
            .values()
            .try_fold(U256::zero(), |acc, balance| acc.checked_add(*balance));
        match (total, state.minted.checked_sub(state.burned)) {
            (Some(total), Some(supply)) => total == supply,
            _ => false,
        }
    }
}

#[async_trait]
impl FungibleToken for Erc20Ledger {
    fn metadata(&self) -> &Token {
        &self.metadata
    }

    async fn total_supply(&self) -> TokenAmount {
        let state = self.state.read().await;
        TokenAmount(state.minted - state.burned)
    }

    async fn balance_of(&self, owner: Address) -> TokenAmount {
        TokenAmount(self.state.read().await.balance(&owner))
    }

    async fn allowance(&self, owner: Address, spender: Address) -> TokenAmount {
        let state = self.state.read().await;
        TokenAmount(
            state
                .allowances
                .get(&(owner, spender))
                .copied()
                .unwrap_or_default(),
        )
    }

    async fn transfer(&self, from: Address, to: Address, amount: TokenAmount) -> Result<()> {
        let mut state = self.state.write().await;
        state.move_funds(from, to, amount.as_u256())?;
        debug!(token = %self.metadata.symbol, ?from, ?to, %amount, "Transfer");
        Ok(())
    }

    async fn approve(&self, owner: Address, spender: Address, amount: TokenAmount) -> Result<()> {
        let mut state = self.state.write().await;
        state.allowances.insert((owner, spender), amount.as_u256());
        debug!(token = %self.metadata.symbol, ?owner, ?spender, %amount, "Approval");
        Ok(())
    }

    async fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: TokenAmount,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let key = (from, spender);
        let available = state.allowances.get(&key).copied().unwrap_or_default();
        if available < amount.as_u256() {
            return Err(LaunchError::InsufficientAllowance {
                required: amount.as_u256(),
                available,
            });
        }
        state.move_funds(from, to, amount.as_u256())?;
        state.allowances.insert(key, available - amount.as_u256());
        debug!(token = %self.metadata.symbol, ?spender, ?from, ?to, %amount, "Delegated transfer");
        Ok(())
    }

    async fn mint(&self, caller: Address, to: Address, amount: TokenAmount) -> Result<()> {
        if self.owner != Some(caller) {
            return Err(LaunchError::Unauthorized(caller));
        }
        self.issue(to, amount).await?;
        info!(token = %self.metadata.symbol, ?to, %amount, "Minted");
        Ok(())
    }

    async fn burn(&self, from: Address, amount: TokenAmount) -> Result<()> {
        self.retire(from, amount).await?;
        info!(token = %self.metadata.symbol, ?from, %amount, "Burned");
        Ok(())
    }
}
