//! Priority sorter: order streams so hardest-to-place are tried first.

use std::collections::HashMap;

use crate::core::models::{Stream, StreamType, SLOTS_PER_DAY};

use super::inputs::InstructorAvailability;

/// Sums practical/lab hours per subject across the full parsed stream list
/// (lectures excluded), used as the priority sorter's "course footprint"
/// criterion — the lecture streams being ordered carry no practical/lab
/// hours of their own, so this must be computed from the sibling streams
/// that share the subject before they're filtered out of the placement run.
#[must_use]
pub fn subject_practical_lab_hours(streams: &[Stream]) -> HashMap<String, u32> {
    let mut totals: HashMap<String, u32> = HashMap::new();
    for stream in streams {
        if matches!(stream.stream_type, StreamType::Practical | StreamType::Lab) {
            *totals.entry(stream.subject.clone()).or_insert(0) += stream.hours.total;
        }
    }
    totals
}

/// Total weekly minutes (50 minutes/slot, 13 slots/day, 5 days) not in an
/// instructor's declared unavailable set.
#[must_use]
pub fn instructor_available_minutes(instructor: &str, availability: &InstructorAvailability) -> u32 {
    const MINUTES_PER_SLOT: u32 = 50;
    let total_slots = (SLOTS_PER_DAY * 5) as u32;

    let unavailable_slots: u32 = availability
        .get(instructor)
        .map(|by_day| by_day.values().map(|times| times.len() as u32).sum())
        .unwrap_or(0);

    total_slots.saturating_sub(unavailable_slots) * MINUTES_PER_SLOT
}

/// The lexicographic sort key, smallest-first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PriorityKey {
    flexible_last: bool,
    instructor_available_minutes_ascending: u32,
    practical_lab_hours_descending: std::cmp::Reverse<u32>,
    student_count_descending: std::cmp::Reverse<u32>,
    stream_id_tiebreak: u64,
}

fn priority_key(
    stream: &Stream,
    flexible_subjects: &std::collections::HashSet<String>,
    availability: &InstructorAvailability,
    subject_footprints: &HashMap<String, u32>,
) -> PriorityKey {
    PriorityKey {
        flexible_last: flexible_subjects.contains(&stream.subject),
        instructor_available_minutes_ascending: instructor_available_minutes(
            &stream.instructor,
            availability,
        ),
        practical_lab_hours_descending: std::cmp::Reverse(
            subject_footprints.get(&stream.subject).copied().unwrap_or(0),
        ),
        student_count_descending: std::cmp::Reverse(stream.student_count),
        stream_id_tiebreak: stream.id.0,
    }
}

/// Sort `streams` into placement order: non-flexible subjects first, then
/// tighter instructors, then heavier course footprints (each subject's total
/// practical/lab hours, from `subject_footprints`), then larger student
/// counts, with stream id as the final deterministic tiebreaker.
pub fn order_streams(
    streams: &mut [Stream],
    flexible_subjects: &std::collections::HashSet<String>,
    availability: &InstructorAvailability,
    subject_footprints: &HashMap<String, u32>,
) {
    streams.sort_by(|a, b| {
        priority_key(a, flexible_subjects, availability, subject_footprints)
            .cmp(&priority_key(b, flexible_subjects, availability, subject_footprints))
    });
}
