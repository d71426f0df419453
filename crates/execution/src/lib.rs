//! Pool deployment and price reads.
//!
//! This crate provides the two stateful services of the launch:
//! - A deploy-once manager that lists a token against wrapped native funding
//! - A price oracle that reads the pool and reports an orientation-corrected price

/// Prelude module for convenient imports.
pub mod prelude;

/// Pool deployment manager.
pub mod manager;
/// Price oracle.
pub mod oracle;
