//! Core library for `campus-scheduler`
//! Workload extraction and stage-1 lecture scheduling, used by the CLI and other components.

pub mod core;

pub use core::*;
// No logger re-exports: use the standalone `logger` crate directly.
