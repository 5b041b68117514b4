//! Explicit feature switches covering placement behavior that isn't fixed
//! by the base algorithm. All default to `false`, matching the engine's
//! behavior with every switch left unset.

use serde::{Deserialize, Serialize};

/// Scheduler behavior switches. All default to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerOptions {
    /// Allow a third-year group's whole day to shift from first to second
    /// shift when first-shift placement fails on that day.
    #[serde(default)]
    pub third_year_shift_exception: bool,

    /// Consult each instructor's `one_day_per_week` constraint during
    /// placement, locking every subsequent stream of theirs to the first
    /// day they're placed on.
    #[serde(default)]
    pub enforce_one_day_per_week: bool,

    /// Extend the first shift's last usable slot from 5 to 7.
    #[serde(default)]
    pub extend_shift_boundary_to_slot_seven: bool,

    /// Let dead groups (forced to zero student count) still occupy the
    /// group-conflict reservation indexes, rather than being skipped by C5.
    #[serde(default)]
    pub dead_groups_occupy_conflict_indexes: bool,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            third_year_shift_exception: false,
            enforce_one_day_per_week: false,
            extend_shift_boundary_to_slot_seven: false,
            dead_groups_occupy_conflict_indexes: false,
        }
    }
}
