//! Stream extractor: turns a classified subject block into streams.
//!
//! Lecture handling is identical across all four [`BlockPattern`]s, so it is
//! extracted once in [`extract_lectures`] and always run; the pattern tag
//! only selects which of the four practical/lab strategies runs alongside it.

use std::collections::HashSet;

use crate::core::errors::ParseWarning;
use crate::core::models::{GroupCode, Language, Provenance, Stream, StreamId, StreamType, WeeklyHours};

use super::pattern::BlockPattern;
use super::row::WorkloadRow;

/// Monotonic stream id allocator shared across an entire parse run so ids
/// stay unique across sheets.
#[derive(Debug, Default)]
pub struct StreamIdAllocator(u64);

impl StreamIdAllocator {
    /// Allocate the next id.
    pub fn next(&mut self) -> StreamId {
        let id = StreamId(self.0);
        self.0 += 1;
        id
    }
}

fn parse_group(
    raw: &str,
    sheet: &str,
    row_index: usize,
    warnings: &mut Vec<ParseWarning>,
) -> Option<GroupCode> {
    match GroupCode::parse(raw) {
        Ok(g) => Some(g),
        Err(e) => {
            warnings.push(ParseWarning::row(sheet.to_string(), row_index, e));
            None
        }
    }
}

fn hours_or_warn(
    total: u32,
    sheet: &str,
    row_index: usize,
    warnings: &mut Vec<ParseWarning>,
) -> Option<WeeklyHours> {
    match WeeklyHours::decompose(total) {
        Ok(h) => Some(h),
        Err(e) => {
            warnings.push(ParseWarning::row(sheet.to_string(), row_index, e));
            None
        }
    }
}

/// Extract the lecture streams for one subject block: group rows by
/// instructor (preserving file order), and for each instructor with a
/// positive lecture-hours cell somewhere in their rows, emit one lecture
/// stream spanning every row of theirs in the block.
fn extract_lectures(
    rows: &[WorkloadRow],
    sheet: &str,
    ids: &mut StreamIdAllocator,
    warnings: &mut Vec<ParseWarning>,
) -> Vec<Stream> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_instructor: std::collections::HashMap<&str, Vec<&WorkloadRow>> =
        std::collections::HashMap::new();
    for row in rows {
        by_instructor
            .entry(row.instructor.as_str())
            .or_insert_with(|| {
                order.push(row.instructor.as_str());
                Vec::new()
            })
            .push(row);
    }

    let mut streams = Vec::new();
    for instructor in order {
        let instructor_rows = &by_instructor[instructor];
        let total_hours = instructor_rows
            .iter()
            .find(|r| r.lecture_hours > 0)
            .map(|r| r.lecture_hours);
        let Some(total_hours) = total_hours else {
            continue;
        };
        let Some(hours) = hours_or_warn(total_hours, sheet, instructor_rows[0].row_index, warnings) else {
            continue;
        };

        let mut groups = Vec::new();
        let mut student_count = 0;
        let mut rows_used = Vec::new();
        let mut language = Language::Kaz;
        for row in instructor_rows {
            if let Some(g) = parse_group(&row.group_raw, sheet, row.row_index, warnings) {
                student_count += row.student_count;
                language = row.language;
                rows_used.push(row.row_index);
                groups.push(g);
            }
        }
        if groups.is_empty() {
            continue;
        }

        streams.push(Stream {
            id: ids.next(),
            subject: instructor_rows[0].subject.clone(),
            stream_type: StreamType::Lecture,
            instructor: instructor.to_string(),
            groups,
            student_count,
            language,
            hours,
            provenance: Provenance {
                sheet: sheet.to_string(),
                rows: rows_used,
            },
            is_subgroup: false,
            is_implicit_subgroup: false,
        });
    }
    streams
}

fn one_row_stream(
    row: &WorkloadRow,
    stream_type: StreamType,
    hours_total: u32,
    sheet: &str,
    ids: &mut StreamIdAllocator,
    is_subgroup: bool,
    is_implicit_subgroup: bool,
    warnings: &mut Vec<ParseWarning>,
) -> Option<Stream> {
    let group = parse_group(&row.group_raw, sheet, row.row_index, warnings)?;
    let hours = hours_or_warn(hours_total, sheet, row.row_index, warnings)?;
    Some(Stream {
        id: ids.next(),
        subject: row.subject.clone(),
        stream_type,
        instructor: row.instructor.clone(),
        groups: vec![group],
        student_count: row.student_count,
        language: row.language,
        hours,
        provenance: Provenance {
            sheet: sheet.to_string(),
            rows: vec![row.row_index],
        },
        is_subgroup,
        is_implicit_subgroup,
    })
}

/// Pattern 1a: every row with a positive hours cell is its own stream.
fn extract_1a(
    rows: &[WorkloadRow],
    sheet: &str,
    ids: &mut StreamIdAllocator,
    warnings: &mut Vec<ParseWarning>,
) -> Vec<Stream> {
    let mut streams = Vec::new();
    for row in rows {
        if row.practical_hours > 0 {
            if let Some(s) = one_row_stream(
                row,
                StreamType::Practical,
                row.practical_hours,
                sheet,
                ids,
                false,
                false,
                warnings,
            ) {
                streams.push(s);
            }
        }
        if row.lab_hours > 0 {
            if let Some(s) = one_row_stream(
                row, StreamType::Lab, row.lab_hours, sheet, ids, false, false, warnings,
            ) {
                streams.push(s);
            }
        }
    }
    streams
}

/// Pattern 1b: a non-blank row opens a stream, blank-column rows that
/// follow append their group to the currently open stream.
fn extract_1b_column(
    rows: &[WorkloadRow],
    sheet: &str,
    ids: &mut StreamIdAllocator,
    warnings: &mut Vec<ParseWarning>,
    stream_type: StreamType,
    hours_of: impl Fn(&WorkloadRow) -> u32,
) -> Vec<Stream> {
    let mut streams = Vec::new();
    let mut open: Option<(u32, Vec<&WorkloadRow>)> = None;

    let flush = |open: &mut Option<(u32, Vec<&WorkloadRow>)>,
                 streams: &mut Vec<Stream>,
                 ids: &mut StreamIdAllocator,
                 warnings: &mut Vec<ParseWarning>| {
        if let Some((hours_total, leader_rows)) = open.take() {
            let Some(hours) = hours_or_warn(hours_total, sheet, leader_rows[0].row_index, warnings) else {
                return;
            };
            let mut groups = Vec::new();
            let mut student_count = 0;
            let mut rows_used = Vec::new();
            let mut language = Language::Kaz;
            for row in &leader_rows {
                if let Some(g) = parse_group(&row.group_raw, sheet, row.row_index, warnings) {
                    groups.push(g);
                    student_count += row.student_count;
                    language = row.language;
                    rows_used.push(row.row_index);
                }
            }
            if groups.is_empty() {
                return;
            }
            streams.push(Stream {
                id: ids.next(),
                subject: leader_rows[0].subject.clone(),
                stream_type,
                instructor: leader_rows[0].instructor.clone(),
                groups,
                student_count,
                language,
                hours,
                provenance: Provenance {
                    sheet: sheet.to_string(),
                    rows: rows_used,
                },
                is_subgroup: false,
                is_implicit_subgroup: false,
            });
        }
    };

    for row in rows {
        let cell_hours = hours_of(row);
        if cell_hours > 0 {
            flush(&mut open, &mut streams, ids, warnings);
            open = Some((cell_hours, vec![row]));
        } else if let Some((_, leader_rows)) = open.as_mut() {
            leader_rows.push(row);
        }
    }
    flush(&mut open, &mut streams, ids, warnings);
    streams
}

fn extract_1b(
    rows: &[WorkloadRow],
    sheet: &str,
    ids: &mut StreamIdAllocator,
    warnings: &mut Vec<ParseWarning>,
) -> Vec<Stream> {
    let mut streams = extract_1b_column(
        rows,
        sheet,
        ids,
        warnings,
        StreamType::Practical,
        |r| r.practical_hours,
    );
    streams.extend(extract_1b_column(
        rows,
        sheet,
        ids,
        warnings,
        StreamType::Lab,
        |r| r.lab_hours,
    ));
    streams
}

/// Implicit-subgroup pattern: practicals take only the first occurrence of
/// each repeated group code; labs keep every row, even repeats.
fn extract_implicit_subgroup(
    rows: &[WorkloadRow],
    sheet: &str,
    ids: &mut StreamIdAllocator,
    warnings: &mut Vec<ParseWarning>,
) -> Vec<Stream> {
    let mut streams = Vec::new();
    let mut seen_for_practical: HashSet<&str> = HashSet::new();
    for row in rows {
        if row.practical_hours > 0 && seen_for_practical.insert(row.group_raw.as_str()) {
            if let Some(s) = one_row_stream(
                row,
                StreamType::Practical,
                row.practical_hours,
                sheet,
                ids,
                false,
                false,
                warnings,
            ) {
                streams.push(s);
            }
        }
    }
    for row in rows {
        if row.lab_hours > 0 {
            if let Some(s) = one_row_stream(
                row, StreamType::Lab, row.lab_hours, sheet, ids, false, true, warnings,
            ) {
                streams.push(s);
            }
        }
    }
    streams
}

/// Explicit-subgroup pattern: every row is its own stream for whichever of
/// {practical, lab} it carries positive hours for.
fn extract_explicit_subgroup(
    rows: &[WorkloadRow],
    sheet: &str,
    ids: &mut StreamIdAllocator,
    warnings: &mut Vec<ParseWarning>,
) -> Vec<Stream> {
    let mut streams = Vec::new();
    for row in rows {
        if row.practical_hours > 0 {
            if let Some(s) = one_row_stream(
                row,
                StreamType::Practical,
                row.practical_hours,
                sheet,
                ids,
                true,
                false,
                warnings,
            ) {
                streams.push(s);
            }
        }
        if row.lab_hours > 0 {
            if let Some(s) = one_row_stream(
                row, StreamType::Lab, row.lab_hours, sheet, ids, true, false, warnings,
            ) {
                streams.push(s);
            }
        }
    }
    streams
}

/// Extract every stream from one classified subject block: the common
/// lecture pass, followed by the pattern-specific practical/lab pass.
pub fn extract_streams(
    pattern: BlockPattern,
    rows: &[WorkloadRow],
    sheet: &str,
    ids: &mut StreamIdAllocator,
    warnings: &mut Vec<ParseWarning>,
) -> Vec<Stream> {
    let mut streams = extract_lectures(rows, sheet, ids, warnings);
    streams.extend(match pattern {
        BlockPattern::Pattern1a => extract_1a(rows, sheet, ids, warnings),
        BlockPattern::Pattern1b => extract_1b(rows, sheet, ids, warnings),
        BlockPattern::ImplicitSubgroup => extract_implicit_subgroup(rows, sheet, ids, warnings),
        BlockPattern::ExplicitSubgroup => extract_explicit_subgroup(rows, sheet, ids, warnings),
    });
    streams
}
