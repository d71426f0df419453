//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use clmm_launch_simulation::prelude::*;
//! ```

// Environment
pub use crate::environment::{EnvironmentConfig, LaunchEnvironment};

// Reports
pub use crate::report::{PriceObservation, ScenarioReport, ScenarioSummary, SwapRecord};

// Runner
pub use crate::runner::{ScenarioConfig, ScenarioRunner};

// Schedules
pub use crate::schedule::{
    FixedSchedule, LadderSchedule, RandomSchedule, SwapCase, SwapDirection, SwapSchedule,
};
