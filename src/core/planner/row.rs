//! A single parsed workload row, the unit C2/C3 operate over.

use crate::core::errors::SchedulerError;
use crate::core::models::Language;

/// One row from the data region of a workload sheet, already resolved
/// against a [`super::grid::ColumnLayout`] and an instructor column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadRow {
    /// Zero-based row index in the sheet, for provenance.
    pub row_index: usize,
    /// Subject name (forward-filled by the caller before this is built).
    pub subject: String,
    /// Raw group code string.
    pub group_raw: String,
    /// Instructor name as extracted from the discovered instructor column.
    pub instructor: String,
    /// Instruction language, read from the row's own language cell.
    pub language: Language,
    /// Student count for this row's group.
    pub student_count: u32,
    /// Total lecture hours declared for this row (0 if blank).
    pub lecture_hours: u32,
    /// Total practical hours declared for this row (0 if blank).
    pub practical_hours: u32,
    /// Total lab hours declared for this row (0 if blank).
    pub lab_hours: u32,
}

/// Parse a language marker cell. Any text containing `"рус"` or a bare
/// `"р"`/`"r"` (case-insensitive) is Russian; everything else, including a
/// blank cell, is Kazakh.
#[must_use]
pub fn parse_language_cell(text: Option<&str>) -> Language {
    match text {
        Some(t) => {
            let lower = t.to_lowercase();
            if lower.contains("рус") || lower == "р" || lower == "r" {
                Language::Rus
            } else {
                Language::Kaz
            }
        }
        None => Language::Kaz,
    }
}

/// Parse an hours cell: blank is `0`; otherwise the cell must be a
/// non-negative integer.
///
/// # Errors
/// Returns [`SchedulerError::InvalidData`] if the cell is present but not a
/// valid non-negative integer.
pub fn parse_hours_cell(
    sheet: &str,
    row_index: usize,
    field: &str,
    text: Option<&str>,
) -> Result<u32, SchedulerError> {
    match text {
        None => Ok(0),
        Some(t) => t.parse::<u32>().map_err(|_| SchedulerError::InvalidData {
            sheet: sheet.to_string(),
            row: row_index,
            reason: format!("{field} cell {t:?} is not a non-negative integer"),
        }),
    }
}
