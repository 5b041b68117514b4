//! CLI command handlers for `campus-scheduler`.
//!
//! ## Command Handlers
//! - [`config`] - Configuration management
//! - [`schedule`] - Workload extraction + stage-1 scheduling

pub mod config;
pub mod schedule;
