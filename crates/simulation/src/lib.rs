//! Swap scenarios against a launched pool.
//!
//! This crate provides:
//! - Swap schedules (the launch ladder, seeded random and fixed lists)
//! - An in-memory launch environment wiring every service together
//! - A scenario runner that trades through the router and reads the oracle
//! - Serializable per-swap records and a run summary

/// Prelude module for convenient imports.
pub mod prelude;

/// In-memory launch environment.
pub mod environment;
/// Scenario results.
pub mod report;
/// Scenario runner.
pub mod runner;
/// Swap schedules.
pub mod schedule;
