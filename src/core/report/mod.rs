//! Human-readable summary of a [`ScheduleResult`](crate::core::scheduler::ScheduleResult).
//!
//! Not the Excel/JSON rendering named out of scope by the crate's purpose —
//! this is a debug/CLI-friendly projection, in the same spirit as this
//! codebase's `DAG: Display` summary.

use std::fmt;

use crate::core::models::ALL_DAYS;
use crate::core::scheduler::{Assignment, ScheduleResult};

/// Wraps a [`ScheduleResult`] reference so callers can `println!("{}", ScheduleReport(&result))`
/// without the result type itself carrying formatting concerns.
pub struct ScheduleReport<'a>(pub &'a ScheduleResult);

impl fmt::Display for ScheduleReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(
            f,
            "Schedule ({} placed, {} unscheduled):",
            result.statistics.total_assigned, result.statistics.total_unscheduled
        )?;
        writeln!(f)?;

        for day in ALL_DAYS {
            let mut day_assignments: Vec<&Assignment> =
                result.assignments.iter().filter(|a| a.day == day).collect();
            if day_assignments.is_empty() {
                continue;
            }
            day_assignments.sort_by_key(|a| a.slot.number());

            writeln!(f, "{day}:")?;
            for assignment in day_assignments {
                writeln!(
                    f,
                    "  slot {:>2}  {:<24} {:<18} groups=[{}]  room={} ({})",
                    assignment.slot.number(),
                    assignment.subject,
                    assignment.instructor,
                    assignment.groups.join(", "),
                    assignment.room,
                    assignment.room_address,
                )?;
            }
            writeln!(f)?;
        }

        if !result.unscheduled.is_empty() {
            writeln!(f, "Unscheduled ({}):", result.unscheduled.len())?;
            for stream in &result.unscheduled {
                writeln!(
                    f,
                    "  {} ({}) groups=[{}] — {:?}: {}",
                    stream.subject,
                    stream.instructor,
                    stream.groups.join(", "),
                    stream.reason,
                    stream.detail,
                )?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Room utilization:")?;
        let mut rooms: Vec<(&String, &f64)> = result.statistics.per_room_utilization_percent.iter().collect();
        rooms.sort_by(|a, b| a.0.cmp(b.0));
        for (room, pct) in rooms {
            writeln!(f, "  {room}: {pct:.1}%")?;
        }

        Ok(())
    }
}
