//! Conflict tracker: reservation indexes and availability queries.

use std::collections::HashMap;

use crate::core::models::{Day, Slot, WeekType, ALL_DAYS, SLOTS_PER_DAY};

use super::inputs::InstructorAvailability;

/// A 5-day x 13-slot bitmask, dense per spec's "availability as bitsets" note.
type DayBitmask = [[bool; SLOTS_PER_DAY]; 5];

fn empty_bitmask() -> DayBitmask {
    [[false; SLOTS_PER_DAY]; 5]
}

/// Dense `[day][slot][week_type]` reservation grid for one resource key.
type ReservationGrid = [[[bool; 3]; SLOTS_PER_DAY]; 5];

fn empty_grid() -> ReservationGrid {
    [[[false; 3]; SLOTS_PER_DAY]; 5]
}

/// Owns the reservation indexes: instructor and group occupancy, the
/// per-group daily load counter, and the group-building-at-instant map used
/// for travel-gap checks. All queries are O(1).
#[derive(Debug, Clone, Default)]
pub struct ConflictTracker {
    instructor_unavailable: HashMap<String, DayBitmask>,
    instructor_reserved: HashMap<String, ReservationGrid>,
    group_reserved: HashMap<String, ReservationGrid>,
    group_day_load: HashMap<(String, Day), u32>,
    group_building: HashMap<(String, Day, Slot, WeekType), String>,
}

impl ConflictTracker {
    /// Build the tracker, precomputing each instructor's unavailability
    /// bitmask from the declared `HH:MM` unavailable-slot-start lists.
    #[must_use]
    pub fn new(instructor_availability: &InstructorAvailability) -> Self {
        let mut instructor_unavailable = HashMap::new();

        for (instructor, by_day) in instructor_availability {
            let mut mask = empty_bitmask();
            for day in ALL_DAYS {
                let Some(times) = by_day.get(&day) else {
                    continue;
                };
                for slot_num in 1..=SLOTS_PER_DAY as u8 {
                    let Some(slot) = Slot::new(slot_num) else {
                        continue;
                    };
                    if times.iter().any(|t| t == &slot.start_time()) {
                        mask[day.index()][slot.index()] = true;
                    }
                }
            }
            instructor_unavailable.insert(instructor.clone(), mask);
        }

        Self {
            instructor_unavailable,
            ..Self::default()
        }
    }

    /// False if the instructor is already reserved at `(day, slot, week_type)`,
    /// or if the instructor declared that slot-start time unavailable.
    #[must_use]
    pub fn is_instructor_available(
        &self,
        instructor: &str,
        day: Day,
        slot: Slot,
        week_type: WeekType,
    ) -> bool {
        if let Some(mask) = self.instructor_unavailable.get(instructor) {
            if mask[day.index()][slot.index()] {
                return false;
            }
        }
        if let Some(grid) = self.instructor_reserved.get(instructor) {
            if grid[day.index()][slot.index()][week_type.index()] {
                return false;
            }
        }
        true
    }

    /// Why an instructor is blocked at `(day, slot, week_type)`, distinguishing
    /// a declared-unavailable time from an existing reservation (the former is
    /// the more specific, higher-precedence reason). `None` if available.
    #[must_use]
    pub fn instructor_block_reason(
        &self,
        instructor: &str,
        day: Day,
        slot: Slot,
        week_type: WeekType,
    ) -> Option<super::result::UnscheduledReason> {
        if let Some(mask) = self.instructor_unavailable.get(instructor) {
            if mask[day.index()][slot.index()] {
                return Some(super::result::UnscheduledReason::InstructorUnavailable);
            }
        }
        if let Some(grid) = self.instructor_reserved.get(instructor) {
            if grid[day.index()][slot.index()][week_type.index()] {
                return Some(super::result::UnscheduledReason::InstructorConflict);
            }
        }
        None
    }

    /// False if any group in `groups` is already reserved at `(day, slot, week_type)`.
    #[must_use]
    pub fn are_groups_available(
        &self,
        groups: &[String],
        day: Day,
        slot: Slot,
        week_type: WeekType,
    ) -> bool {
        groups.iter().all(|group| {
            self.group_reserved
                .get(group)
                .is_none_or(|grid| !grid[day.index()][slot.index()][week_type.index()])
        })
    }

    /// For each group, inspect its reservations at the neighboring slots on
    /// the same day; fail if either neighbor's address differs from
    /// `target_address` and the two addresses aren't `nearby`.
    #[must_use]
    pub fn check_building_gap(
        &self,
        groups: &[String],
        day: Day,
        slot: Slot,
        week_type: WeekType,
        target_address: &str,
        nearby: impl Fn(&str, &str) -> bool,
    ) -> bool {
        for group in groups {
            for neighbor in [slot.prev(), slot.next()] {
                let Some(neighbor) = neighbor else { continue };
                if let Some(addr) = self
                    .group_building
                    .get(&(group.clone(), day, neighbor, week_type))
                {
                    if addr != target_address && !nearby(addr, target_address) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// The weekly load (count of reserved slots) recorded so far for a group on a day.
    #[must_use]
    pub fn group_day_load(&self, group: &str, day: Day) -> u32 {
        self.group_day_load
            .get(&(group.to_string(), day))
            .copied()
            .unwrap_or(0)
    }

    /// Atomically mark all reservation indexes for a successful placement.
    /// Callers must have already verified availability; this never checks.
    pub fn reserve(
        &mut self,
        instructor: &str,
        groups: &[String],
        day: Day,
        slot: Slot,
        week_type: WeekType,
        address: &str,
    ) {
        let instructor_grid = self
            .instructor_reserved
            .entry(instructor.to_string())
            .or_insert_with(empty_grid);
        instructor_grid[day.index()][slot.index()][week_type.index()] = true;

        for group in groups {
            let grid = self
                .group_reserved
                .entry(group.clone())
                .or_insert_with(empty_grid);
            grid[day.index()][slot.index()][week_type.index()] = true;

            *self
                .group_day_load
                .entry((group.clone(), day))
                .or_insert(0) += 1;

            self.group_building
                .insert((group.clone(), day, slot, week_type), address.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with_unavailable(instructor: &str, day: Day, times: &[&str]) -> ConflictTracker {
        let mut availability = InstructorAvailability::new();
        let mut by_day = HashMap::new();
        by_day.insert(day, times.iter().map(|t| t.to_string()).collect());
        availability.insert(instructor.to_string(), by_day);
        ConflictTracker::new(&availability)
    }

    #[test]
    fn instructor_unavailable_time_blocks_slot() {
        let tracker = tracker_with_unavailable("Dr. A", Day::Fri, &["09:00"]);
        let slot = Slot::new(1).unwrap();
        assert!(!tracker.is_instructor_available("Dr. A", Day::Fri, slot, WeekType::Both));
        assert!(tracker.is_instructor_available("Dr. A", Day::Mon, slot, WeekType::Both));
    }

    #[test]
    fn instructor_block_reason_prefers_declared_unavailability() {
        let tracker = tracker_with_unavailable("Dr. A", Day::Fri, &["09:00"]);
        let slot = Slot::new(1).unwrap();
        assert_eq!(
            tracker.instructor_block_reason("Dr. A", Day::Fri, slot, WeekType::Both),
            Some(super::super::result::UnscheduledReason::InstructorUnavailable)
        );
        assert_eq!(
            tracker.instructor_block_reason("Dr. A", Day::Mon, slot, WeekType::Both),
            None
        );
    }

    #[test]
    fn instructor_block_reason_reports_conflict_when_reserved() {
        let mut tracker = ConflictTracker::default();
        let slot = Slot::new(2).unwrap();
        tracker.reserve("Dr. A", &["ВЕТ-21".to_string()], Day::Mon, slot, WeekType::Both, "Main");
        assert_eq!(
            tracker.instructor_block_reason("Dr. A", Day::Mon, slot, WeekType::Both),
            Some(super::super::result::UnscheduledReason::InstructorConflict)
        );
    }

    #[test]
    fn reserve_blocks_future_availability_checks() {
        let mut tracker = ConflictTracker::default();
        let slot = Slot::new(3).unwrap();
        tracker.reserve(
            "Dr. A",
            &["ВЕТ-21".to_string()],
            Day::Mon,
            slot,
            WeekType::Both,
            "Main",
        );
        assert!(!tracker.is_instructor_available("Dr. A", Day::Mon, slot, WeekType::Both));
        assert!(!tracker.are_groups_available(&["ВЕТ-21".to_string()], Day::Mon, slot, WeekType::Both));
    }

    #[test]
    fn group_day_load_increments_per_reservation() {
        let mut tracker = ConflictTracker::default();
        let slot1 = Slot::new(1).unwrap();
        let slot2 = Slot::new(2).unwrap();
        tracker.reserve(
            "Dr. A",
            &["ВЕТ-21".to_string()],
            Day::Mon,
            slot1,
            WeekType::Both,
            "Main",
        );
        tracker.reserve(
            "Dr. A",
            &["ВЕТ-21".to_string()],
            Day::Mon,
            slot2,
            WeekType::Both,
            "Main",
        );
        assert_eq!(tracker.group_day_load("ВЕТ-21", Day::Mon), 2);
    }

    #[test]
    fn building_gap_allows_same_address() {
        let mut tracker = ConflictTracker::default();
        let slot1 = Slot::new(1).unwrap();
        let slot2 = Slot::new(2).unwrap();
        tracker.reserve(
            "Dr. A",
            &["ВЕТ-21".to_string()],
            Day::Mon,
            slot1,
            WeekType::Both,
            "Main",
        );
        assert!(tracker.check_building_gap(
            &["ВЕТ-21".to_string()],
            Day::Mon,
            slot2,
            WeekType::Both,
            "Main",
            |_, _| false,
        ));
    }

    #[test]
    fn building_gap_rejects_non_nearby_address() {
        let mut tracker = ConflictTracker::default();
        let slot1 = Slot::new(1).unwrap();
        let slot2 = Slot::new(2).unwrap();
        tracker.reserve(
            "Dr. A",
            &["ВЕТ-21".to_string()],
            Day::Mon,
            slot1,
            WeekType::Both,
            "Main",
        );
        assert!(!tracker.check_building_gap(
            &["ВЕТ-21".to_string()],
            Day::Mon,
            slot2,
            WeekType::Both,
            "Annex",
            |_, _| false,
        ));
    }

    #[test]
    fn building_gap_allows_nearby_address() {
        let mut tracker = ConflictTracker::default();
        let slot1 = Slot::new(1).unwrap();
        let slot2 = Slot::new(2).unwrap();
        tracker.reserve(
            "Dr. A",
            &["ВЕТ-21".to_string()],
            Day::Mon,
            slot1,
            WeekType::Both,
            "Main",
        );
        assert!(tracker.check_building_gap(
            &["ВЕТ-21".to_string()],
            Day::Mon,
            slot2,
            WeekType::Both,
            "Annex",
            |_, _| true,
        ));
    }
}
