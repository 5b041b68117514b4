//! Result aggregation: assignments, unscheduled reasons, and statistics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::models::{Day, Slot, StreamId, WeekType};

/// Why a stream could not be placed.
///
/// Ordered from most to least specific; when a search fails for several
/// reasons across different (day, slot) attempts, the *first* (most
/// specific) reason encountered wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnscheduledReason {
    /// The instructor's declared unavailable-slot set excluded every attempt.
    InstructorUnavailable,
    /// The instructor was already reserved elsewhere at every attempted slot.
    InstructorConflict,
    /// One of the stream's groups was already reserved at every attempted slot.
    GroupConflict,
    /// Every otherwise-viable slot violated the building-travel-gap constraint.
    BuildingGapRequired,
    /// No run of consecutive slots long enough for the stream's hours existed.
    NoConsecutiveSlots,
    /// No room satisfied the four-tier room policy at any attempted slot.
    NoRoomAvailable,
    /// Every (day, slot) combination in the stream's shift was tried and failed.
    AllSlotsExhausted,
}

impl UnscheduledReason {
    /// Precedence used when folding reasons across a whole search: a lower
    /// value means *more specific*, and more specific reasons displace less
    /// specific ones recorded earlier in the same search.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        self as u8
    }

    /// Fold a newly observed reason into the best one recorded so far,
    /// keeping whichever is more specific.
    #[must_use]
    pub fn fold(current: Option<Self>, observed: Self) -> Self {
        match current {
            Some(existing) if existing.precedence() <= observed.precedence() => existing,
            _ => observed,
        }
    }
}

/// A single committed placement: one stream occupying one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// The stream this placement belongs to.
    pub stream_id: StreamId,
    /// Subject name, carried for display without re-joining against streams.
    pub subject: String,
    /// Instructor name.
    pub instructor: String,
    /// Group codes present in this stream.
    pub groups: Vec<String>,
    /// Student count used for room-fit checks.
    pub student_count: u32,
    /// Day of this placement.
    pub day: Day,
    /// Slot of this placement.
    pub slot: Slot,
    /// Room name.
    pub room: String,
    /// Room address.
    pub room_address: String,
    /// Week applicability of this reservation.
    pub week_type: WeekType,
}

/// A stream the placement engine could not seat anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnscheduledStream {
    /// The stream that failed to place.
    pub stream_id: StreamId,
    /// Subject name.
    pub subject: String,
    /// Instructor name.
    pub instructor: String,
    /// Group codes in the stream.
    pub groups: Vec<String>,
    /// The most specific reason recorded during the search.
    pub reason: UnscheduledReason,
    /// Free-form detail (e.g. which day/slot combinations were tried).
    pub detail: String,
}

/// Per-run statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Total streams successfully placed.
    pub total_assigned: usize,
    /// Total streams left unscheduled.
    pub total_unscheduled: usize,
    /// Placed-slot counts keyed by day.
    pub per_day_counts: HashMap<Day, usize>,
    /// Utilization percentage (reserved slots / 65) keyed by room name.
    pub per_room_utilization_percent: HashMap<String, f64>,
    /// Total placed hours keyed by instructor.
    pub per_instructor_hours: HashMap<String, u32>,
}

/// The outcome of a full scheduling run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Ordered list of committed placements.
    pub assignments: Vec<Assignment>,
    /// Ordered list of streams that could not be placed.
    pub unscheduled: Vec<UnscheduledStream>,
    /// Aggregate statistics over `assignments`.
    pub statistics: Statistics,
}

impl ScheduleResult {
    /// Total slots in the weekly grid, used as the utilization denominator (13 slots * 5 days).
    pub const TOTAL_WEEKLY_SLOTS: usize = 13 * 5;

    /// Recompute `statistics` from `assignments` and `unscheduled`.
    pub fn recompute_statistics(&mut self, stream_hours: &HashMap<StreamId, u32>) {
        let mut per_day_counts = HashMap::new();
        let mut per_room_slots: HashMap<String, usize> = HashMap::new();
        let mut per_instructor_hours: HashMap<String, u32> = HashMap::new();

        for assignment in &self.assignments {
            *per_day_counts.entry(assignment.day).or_insert(0) += 1;
            *per_room_slots.entry(assignment.room.clone()).or_insert(0) += 1;
        }

        // One stream can span several consecutive-slot assignments; its hours
        // must only be counted once per instructor, but streams differ, so
        // dedupe by (instructor, stream_id) before summing.
        let mut counted: std::collections::HashSet<(String, StreamId)> = std::collections::HashSet::new();
        for assignment in &self.assignments {
            let key = (assignment.instructor.clone(), assignment.stream_id);
            if !counted.insert(key) {
                continue;
            }
            let hours = stream_hours.get(&assignment.stream_id).copied().unwrap_or(0);
            *per_instructor_hours.entry(assignment.instructor.clone()).or_insert(0) += hours;
        }

        let per_room_utilization_percent = per_room_slots
            .into_iter()
            .map(|(room, slots)| {
                let pct = (slots as f64 / Self::TOTAL_WEEKLY_SLOTS as f64) * 100.0;
                (room, pct)
            })
            .collect();

        self.statistics = Statistics {
            total_assigned: self.assignments.len(),
            total_unscheduled: self.unscheduled.len(),
            per_day_counts,
            per_room_utilization_percent,
            per_instructor_hours,
        };
    }
}
