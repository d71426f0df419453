//! Fungible token ledgers.

pub mod directory;
pub mod ledger;
pub mod wrapped;

pub use directory::TokenDirectory;
pub use ledger::{Erc20Ledger, FungibleToken};
pub use wrapped::{DEFAULT_WRAPPED_NATIVE_ADDRESS, WrappedNative};
