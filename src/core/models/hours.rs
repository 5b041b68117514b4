//! Total-to-weekly hour decomposition over a 15-week semester.

use crate::core::errors::SchedulerError;
use serde::{Deserialize, Serialize};

/// A stream's hour load, expressed both as a semester total and as the two
/// possible weekly counts.
///
/// Invariant: `total == 8 * odd_week + 7 * even_week`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHours {
    /// Total contact hours across the 15-week semester.
    pub total: u32,
    /// Hours taught in odd-numbered weeks.
    pub odd_week: u32,
    /// Hours taught in even-numbered weeks.
    pub even_week: u32,
}

impl WeeklyHours {
    /// Decompose a semester total into odd/even weekly hours.
    ///
    /// `base = total / 15`, `r = total % 15`:
    /// - `r == 0` -> `(base, base)`
    /// - `r == 8` -> `(base + 1, base)`
    /// - `r == 7` -> `(base, base + 1)`
    /// - anything else is a hard error; zero is legal and yields `(0, 0)`.
    ///
    /// # Errors
    /// Returns [`SchedulerError::InvalidHours`] when `total % 15` is not in `{0, 7, 8}`.
    pub fn decompose(total: u32) -> Result<Self, SchedulerError> {
        let base = total / 15;
        let remainder = total % 15;
        let (odd_week, even_week) = match remainder {
            0 => (base, base),
            8 => (base + 1, base),
            7 => (base, base + 1),
            _ => return Err(SchedulerError::InvalidHours(total)),
        };
        Ok(Self {
            total,
            odd_week,
            even_week,
        })
    }

    /// The number of consecutive slots a single weekly placement must reserve:
    /// `max(odd_week, even_week)`.
    #[must_use]
    pub const fn consecutive_slots_needed(self) -> u32 {
        if self.odd_week >= self.even_week {
            self.odd_week
        } else {
            self.even_week
        }
    }
}
