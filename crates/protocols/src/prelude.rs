//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use clmm_launch_protocols::prelude::*;
//! ```

pub use crate::PoolFetcher;

// Clocks
pub use crate::clock::{Clock, FixedClock, SystemClock};

// Pools
pub use crate::pools::{PoolRegistry, SwapOutcome, SwapRequest};

// Router
pub use crate::router::{
    DEFAULT_ROUTER_ACCOUNT, ExactInputSingleParams, Router, RouterConfig, SwapRouter,
};

// Tokens
pub use crate::tokens::{
    DEFAULT_WRAPPED_NATIVE_ADDRESS, Erc20Ledger, FungibleToken, TokenDirectory, WrappedNative,
};
