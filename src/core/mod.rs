//! Core module for common functionality across the workload parser and scheduler

pub mod config;
pub mod errors;
pub mod models;
pub mod planner;
pub mod report;
pub mod scheduler;

/// Returns the current version of the `campus-scheduler` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// The `logger` module lives in the standalone `logger` crate; use it directly.
