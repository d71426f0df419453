//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use clmm_launch_execution::prelude::*;
//! ```

// Manager
pub use crate::manager::{DeploymentConfig, DeploymentPhase, ManagerState, PoolDeploymentManager};

// Oracle
pub use crate::oracle::PriceOracle;
