//! Workload parser: orchestrates sheet scanning, forward-fill,
//! instructor-column discovery, and pattern classification/extraction.

use std::collections::HashSet;

use crate::core::errors::{ParseWarning, SchedulerError};
use crate::core::models::Stream;

use super::extractor::{extract_streams, StreamIdAllocator};
use super::grid::{ColumnLayout, KnownInstructorColumns, WorksheetGrid};
use super::pattern::classify;
use super::row::{parse_hours_cell, parse_language_cell, WorkloadRow};

/// Substrings (case-insensitive) that identify an instructor-name column
/// during the right-to-left fallback scan.
const INSTRUCTOR_MARKERS: [&str; 8] = [
    "проф", "а.о.", "с.п.", "асс", "доц", "д.", "prof.", "prof",
];

/// The row range (0-based) scanned for instructor markers within each
/// candidate column during the fallback scan.
const MARKER_SCAN_FIRST_ROW: usize = 11;
const MARKER_SCAN_MAX_ROW: usize = 50;

/// Find the first row whose column-0 cell marks the start of the data
/// region, returning the row index data actually starts at.
///
/// A bare `"1"` starts data at that row. A semester marker (`"2 семестр"` /
/// `"2семестр"`) additionally skips one header row below it.
///
/// # Errors
/// Returns [`SchedulerError::DataStartNotFound`] if no row matches.
pub fn find_data_start(grid: &WorksheetGrid) -> Result<usize, SchedulerError> {
    for row in 0..grid.row_count() {
        let Some(cell) = grid.cell(row, 0) else {
            continue;
        };
        if cell == "1" {
            return Ok(row);
        }
        let normalized = cell.to_lowercase().replace(' ', "");
        if normalized == "2семестр" {
            return Ok(row + 2);
        }
    }
    Err(SchedulerError::DataStartNotFound(grid.name.clone()))
}

fn column_count(grid: &WorksheetGrid) -> usize {
    grid.rows.iter().map(Vec::len).max().unwrap_or(0)
}

/// Discover the instructor column: the known-column table first, else a
/// right-to-left scan for instructor-marker substrings within rows
/// `11..min(50, last)`.
///
/// # Errors
/// Returns [`SchedulerError::InstructorColumnNotFound`] if neither source
/// yields a valid column.
pub fn find_instructor_column(
    grid: &WorksheetGrid,
    known_columns: &KnownInstructorColumns,
) -> Result<usize, SchedulerError> {
    let total_columns = column_count(grid);

    if let Some(&col) = known_columns.get(&grid.name) {
        if col < total_columns {
            return Ok(col);
        }
    }

    let last_row = grid.row_count().saturating_sub(1);
    let scan_last_row = last_row.min(MARKER_SCAN_MAX_ROW);

    if total_columns == 0 {
        return Err(SchedulerError::InstructorColumnNotFound(grid.name.clone()));
    }

    for col in (0..total_columns).rev() {
        if MARKER_SCAN_FIRST_ROW > scan_last_row {
            continue;
        }
        for row in MARKER_SCAN_FIRST_ROW..=scan_last_row {
            let Some(cell) = grid.cell(row, col) else {
                continue;
            };
            let lower = cell.to_lowercase();
            if INSTRUCTOR_MARKERS.iter().any(|m| lower.contains(m)) {
                return Ok(col);
            }
        }
    }

    Err(SchedulerError::InstructorColumnNotFound(grid.name.clone()))
}

/// Forward-fill the subject column over the data region: a blank subject
/// cell inherits the most recent non-blank subject above it.
fn forward_filled_subjects(
    grid: &WorksheetGrid,
    layout: &ColumnLayout,
    data_start: usize,
) -> Vec<String> {
    let mut subjects = Vec::with_capacity(grid.row_count().saturating_sub(data_start));
    let mut last = String::new();
    for row in data_start..grid.row_count() {
        if let Some(cell) = grid.cell(row, layout.subject) {
            last = cell.to_string();
        }
        subjects.push(last.clone());
    }
    subjects
}

/// Build one [`WorkloadRow`] from a grid row, applying the dead-groups
/// student-count override.
///
/// # Errors
/// Returns [`SchedulerError::InvalidData`] if the student-count or an hours
/// cell is present but not a valid non-negative integer.
fn build_row(
    grid: &WorksheetGrid,
    layout: &ColumnLayout,
    instructor_col: usize,
    row_index: usize,
    subject: String,
    dead_groups: &HashSet<String>,
) -> Result<Option<WorkloadRow>, SchedulerError> {
    let Some(group_raw) = grid.cell(row_index, layout.group) else {
        return Ok(None);
    };
    let Some(instructor) = grid.cell(row_index, instructor_col) else {
        return Ok(None);
    };

    let language = parse_language_cell(grid.cell(row_index, layout.language));
    let mut student_count =
        parse_hours_cell(&grid.name, row_index, "student_count", grid.cell(row_index, layout.student_count))?;
    if dead_groups.contains(group_raw) {
        student_count = 0;
    }

    let lecture_hours = parse_hours_cell(
        &grid.name,
        row_index,
        "lecture_hours",
        grid.cell(row_index, layout.lecture_hours),
    )?;
    let practical_hours = parse_hours_cell(
        &grid.name,
        row_index,
        "practical_hours",
        grid.cell(row_index, layout.practical_hours),
    )?;
    let lab_hours = parse_hours_cell(
        &grid.name,
        row_index,
        "lab_hours",
        grid.cell(row_index, layout.lab_hours),
    )?;

    Ok(Some(WorkloadRow {
        row_index,
        subject,
        group_raw: group_raw.to_string(),
        instructor: instructor.to_string(),
        language,
        student_count,
        lecture_hours,
        practical_hours,
        lab_hours,
    }))
}

/// Parse one worksheet into streams, collecting non-fatal warnings inline.
///
/// A sheet-level failure (no data-start row, no instructor column) is
/// returned as a single sheet-scoped warning with no streams; row-level
/// failures are individually warned and the offending row is skipped.
pub fn parse_sheet(
    grid: &WorksheetGrid,
    layout: &ColumnLayout,
    known_instructor_columns: &KnownInstructorColumns,
    dead_groups: &HashSet<String>,
    ids: &mut StreamIdAllocator,
) -> (Vec<Stream>, Vec<ParseWarning>) {
    let mut warnings = Vec::new();

    let data_start = match find_data_start(grid) {
        Ok(row) => row,
        Err(e) => {
            warnings.push(ParseWarning::sheet(grid.name.clone(), e));
            return (Vec::new(), warnings);
        }
    };

    let instructor_col = match find_instructor_column(grid, known_instructor_columns) {
        Ok(col) => col,
        Err(e) => {
            warnings.push(ParseWarning::sheet(grid.name.clone(), e));
            return (Vec::new(), warnings);
        }
    };

    let subjects = forward_filled_subjects(grid, layout, data_start);

    let mut rows: Vec<WorkloadRow> = Vec::new();
    for (offset, subject) in subjects.into_iter().enumerate() {
        let row_index = data_start + offset;
        match build_row(grid, layout, instructor_col, row_index, subject, dead_groups) {
            Ok(Some(row)) => rows.push(row),
            Ok(None) => {}
            Err(e) => warnings.push(ParseWarning::row(grid.name.clone(), row_index, e)),
        }
    }

    let mut streams = Vec::new();
    let mut block_start = 0;
    while block_start < rows.len() {
        let subject = &rows[block_start].subject;
        let mut block_end = block_start + 1;
        while block_end < rows.len() && &rows[block_end].subject == subject {
            block_end += 1;
        }
        let block = &rows[block_start..block_end];
        let pattern = classify(block);
        streams.extend(extract_streams(pattern, block, &grid.name, ids, &mut warnings));
        block_start = block_end;
    }

    (streams, warnings)
}

/// Parse every worksheet, isolating per-sheet failures: a failed sheet
/// contributes its warning and is skipped, the rest of the run continues.
pub fn parse_workload(
    sheets: &[WorksheetGrid],
    layout: &ColumnLayout,
    known_instructor_columns: &KnownInstructorColumns,
    dead_groups: &HashSet<String>,
) -> (Vec<Stream>, Vec<ParseWarning>) {
    let mut ids = StreamIdAllocator::default();
    let mut all_streams = Vec::new();
    let mut all_warnings = Vec::new();

    for grid in sheets {
        let (streams, warnings) = parse_sheet(grid, layout, known_instructor_columns, dead_groups, &mut ids);
        all_streams.extend(streams);
        all_warnings.extend(warnings);
    }

    (all_streams, all_warnings)
}
