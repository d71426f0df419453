//! Error taxonomy for pool deployment, pricing and swaps.

use crate::token::Address;
use primitive_types::U256;
use thiserror::Error;

/// Convenience result alias used across the workspace.
pub type Result<T> = std::result::Result<T, LaunchError>;

/// Errors raised by the launch pool components.
///
/// Every error is terminal for the operation that raised it; mutating
/// operations leave state unchanged when they fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    /// The deployment manager already created its pool.
    #[error("pool already deployed")]
    AlreadyDeployed,
    /// The deployment manager has not created its pool yet.
    #[error("pool not deployed")]
    NotDeployed,
    /// The deployment manager holds none of the token it was asked to list.
    #[error("manager holds no balance of token {0:?}")]
    InsufficientTokenBalance(Address),
    /// A pool for the same pair and fee tier already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),
    /// The requested pool or token is not registered.
    #[error("not found: {0}")]
    NotFound(String),
    /// A tick or sqrt-price fell outside its representable domain.
    #[error("out of range: {0}")]
    Range(String),
    /// The oracle was queried before a pool was bound.
    #[error("oracle is not bound to a pool")]
    UnboundOracle,
    /// The swap deadline passed before execution.
    #[error("deadline {deadline} expired (now {now})")]
    DeadlineExpired {
        /// Deadline requested by the caller, unix seconds.
        deadline: u64,
        /// Clock reading at execution, unix seconds.
        now: u64,
    },
    /// The swap output is below the caller's minimum.
    #[error("output {amount_out} below minimum {minimum}")]
    SlippageExceeded {
        /// Output the pool would pay.
        amount_out: U256,
        /// Minimum the caller accepts.
        minimum: U256,
    },
    /// A deposit or swap cannot be funded from the given amounts or liquidity.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    /// An account balance is too small for a debit.
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        /// Amount the operation needs.
        required: U256,
        /// Amount the account holds.
        available: U256,
    },
    /// A spender allowance is too small for a delegated debit.
    #[error("insufficient allowance: required {required}, available {available}")]
    InsufficientAllowance {
        /// Amount the operation needs.
        required: U256,
        /// Amount currently approved.
        available: U256,
    },
    /// The caller lacks the role the operation requires.
    #[error("caller {0:?} is not authorized")]
    Unauthorized(Address),
    /// The two tokens of a pair are identical or unusable.
    #[error("invalid token pair: {0}")]
    InvalidTokenPair(String),
    /// An amount is zero where a positive value is required, or rounds to nothing.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// The fee is not one of the supported tiers.
    #[error("invalid fee tier: {0}")]
    InvalidFeeTier(u32),
    /// The sqrt-price limit is on the wrong side of the current price.
    #[error("invalid sqrt price limit: {0}")]
    InvalidPriceLimit(String),
    /// The pool does not contain the oracle's quote asset.
    #[error("pool does not contain quote asset {0:?}")]
    QuoteAssetMissing(Address),
    /// A fixed-point computation exceeded its integer width.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
}
