//! Error kinds shared by the workload parser and the scheduler
//!
//! Per the error-handling policy: [`SchedulerError`] variants that are recoverable
//! are never used to abort a whole run. The parser downgrades them to
//! [`ParseWarning`]s attached to the sheet or row where they
//! occurred; the scheduler downgrades unplaceable streams into
//! [`crate::core::scheduler::UnscheduledStream`] records. Only malformed
//! reference configuration (negative room capacity, duplicate room names, a cyclic
//! `nearby` declaration) is a hard error that stops the run.

use thiserror::Error;

/// Errors produced while extracting streams from a workload sheet or while scheduling them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// A named sheet was not present among the supplied worksheets.
    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    /// No row in column 0 matched the data-start markers.
    #[error("could not find the start of the data region in sheet {0:?}")]
    DataStartNotFound(String),

    /// Neither the known-column table nor the right-to-left scan found an instructor column.
    #[error("could not find an instructor column in sheet {0:?}")]
    InstructorColumnNotFound(String),

    /// A total-hours value does not decompose into whole weekly hours.
    ///
    /// `total mod 15` must be one of `{0, 7, 8}`.
    #[error("{0} hours does not decompose over a 15-week semester (mod 15 must be 0, 7, or 8)")]
    InvalidHours(u32),

    /// A row's fields could not be interpreted (non-numeric hour cell, missing subject, etc).
    #[error("invalid data in sheet {sheet:?} row {row}: {reason}")]
    InvalidData {
        /// Sheet the offending row belongs to.
        sheet: String,
        /// Zero-based row index.
        row: usize,
        /// Human-readable explanation.
        reason: String,
    },

    /// A group code did not match the expected `[Cyrillic]+-[digit][digit][letter?] [О]?` shape.
    #[error("invalid group code {0:?}")]
    InvalidGroupCode(String),

    /// A room with negative capacity was declared in the reference configuration.
    #[error("room {0:?} has a negative capacity")]
    NegativeRoomCapacity(String),

    /// Two rooms were declared with the same name.
    #[error("duplicate room name: {0:?}")]
    DuplicateRoomName(String),

    /// The `nearby` building groups contain a cycle through transitivity, making the
    /// reflexive/symmetric/transitive closure ill-defined (should never happen for a
    /// partition-of-addresses representation, but is checked at construction time).
    #[error("cyclic nearby-building declaration involving {0:?}")]
    CyclicNearbyGroup(String),
}

/// A non-fatal issue discovered while parsing a single sheet or row.
///
/// Warnings never stop the parse; they are collected and returned alongside
/// whatever streams were still successfully extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// Sheet the warning refers to.
    pub sheet: String,
    /// Row index within the sheet, when the warning is row-scoped.
    pub row: Option<usize>,
    /// The underlying error.
    pub error: SchedulerError,
}

impl ParseWarning {
    /// Create a sheet-scoped warning (no specific row).
    #[must_use]
    pub const fn sheet(sheet: String, error: SchedulerError) -> Self {
        Self {
            sheet,
            row: None,
            error,
        }
    }

    /// Create a row-scoped warning.
    #[must_use]
    pub const fn row(sheet: String, row: usize, error: SchedulerError) -> Self {
        Self {
            sheet,
            row: Some(row),
            error,
        }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.row {
            Some(row) => write!(f, "[{}:{row}] {}", self.sheet, self.error),
            None => write!(f, "[{}] {}", self.sheet, self.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_hours_message_includes_value() {
        let err = SchedulerError::InvalidHours(13);
        assert!(err.to_string().contains("13"));
    }

    #[test]
    fn warning_display_includes_row_when_present() {
        let w = ParseWarning::row(
            "Fall2024".to_string(),
            12,
            SchedulerError::InvalidGroupCode("???".to_string()),
        );
        let text = w.to_string();
        assert!(text.contains("Fall2024"));
        assert!(text.contains("12"));
    }

    #[test]
    fn sheet_warning_display_omits_row() {
        let w = ParseWarning::sheet(
            "Fall2024".to_string(),
            SchedulerError::SheetNotFound("Fall2024".to_string()),
        );
        assert_eq!(w.to_string(), "[Fall2024] sheet not found: Fall2024");
    }
}
