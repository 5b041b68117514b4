//! Placement engine: searches (day, slot) positions and reserves resources.

use std::collections::{HashMap, HashSet};

use crate::core::models::{BuildingProximity, Day, Shift, Slot, Stream, StreamType, WeekType, ALL_DAYS};

use super::conflict::ConflictTracker;
use super::inputs::SchedulingInputs;
use super::priority::order_streams;
use super::result::{Assignment, ScheduleResult, UnscheduledReason, UnscheduledStream};
use super::rooms::RoomManager;

const NON_FLEXIBLE_FIRST_DAYS: [Day; 3] = [Day::Mon, Day::Tue, Day::Wed];
const NON_FLEXIBLE_SECOND_DAYS: [Day; 2] = [Day::Thu, Day::Fri];
const THIRD_YEAR: u8 = 3;

fn group_year(group_raw: &str) -> Option<u8> {
    crate::core::models::GroupCode::parse(group_raw).ok().map(|g| g.year)
}

fn determine_shift(stream: &Stream, inputs: &SchedulingInputs) -> Shift {
    let forced_second = stream
        .groups
        .iter()
        .any(|g| inputs.forced_second_shift_groups.contains(&g.raw));
    if forced_second {
        return Shift::Second;
    }

    let year = stream.groups.first().and_then(|g| group_year(&g.raw)).unwrap_or(1);
    match year {
        1 => Shift::First,
        2 => Shift::Second,
        3 => Shift::First,
        _ => Shift::Second,
    }
}

fn is_third_year_stream(stream: &Stream) -> bool {
    stream
        .groups
        .first()
        .and_then(|g| group_year(&g.raw))
        .is_some_and(|y| y == THIRD_YEAR)
}

fn candidate_days(stream: &Stream, inputs: &SchedulingInputs, tracker: &ConflictTracker) -> Vec<Day> {
    let group_raws: Vec<String> = stream.groups.iter().map(|g| g.raw.clone()).collect();
    let load_of = |day: Day| -> u32 {
        group_raws.iter().map(|g| tracker.group_day_load(g, day)).sum()
    };

    let days = if inputs.flexible_subjects.contains(&stream.subject) {
        let mut days: Vec<Day> = ALL_DAYS.to_vec();
        days.sort_by_key(|d| load_of(*d));
        days
    } else {
        let mut first_tier = NON_FLEXIBLE_FIRST_DAYS.to_vec();
        first_tier.sort_by_key(|d| load_of(*d));
        let mut second_tier = NON_FLEXIBLE_SECOND_DAYS.to_vec();
        second_tier.sort_by_key(|d| load_of(*d));
        first_tier.into_iter().chain(second_tier).collect()
    };

    match allowed_days_for(stream, inputs) {
        Some(allowed) => days.into_iter().filter(|d| allowed.contains(d)).collect(),
        None => days,
    }
}

/// Intersects the instructor's per-year `allowed_days_by_year` declarations
/// across every group in `stream`. Returns `None` when the instructor has no
/// constraint entry or none of the stream's group years are listed in it, in
/// which case every day stays a candidate.
fn allowed_days_for(stream: &Stream, inputs: &SchedulingInputs) -> Option<HashSet<Day>> {
    let constraint = inputs.instructor_day_constraints.get(&stream.instructor)?;
    if constraint.allowed_days_by_year.is_empty() {
        return None;
    }

    let mut allowed: Option<HashSet<Day>> = None;
    for group in &stream.groups {
        let Some(year) = group_year(&group.raw) else { continue };
        let Some(days) = constraint.allowed_days_by_year.get(&year) else { continue };
        let days: HashSet<Day> = days.iter().copied().collect();
        allowed = Some(match allowed {
            Some(acc) => acc.intersection(&days).copied().collect(),
            None => days,
        });
    }
    allowed
}

fn shift_last_slot(shift: Shift, extend_to_seven: bool) -> Slot {
    if extend_to_seven && matches!(shift, Shift::First) {
        Slot::new(7).unwrap_or_else(|| shift.last_slot())
    } else {
        shift.last_slot()
    }
}

/// Groups a stream's reservations actually touch: every group, unless the
/// group is dead and [`crate::core::scheduler::options::SchedulerOptions::dead_groups_occupy_conflict_indexes`]
/// is off, in which case dead groups are left out of the conflict indexes
/// entirely (they are still listed on the `Assignment` for display).
fn conflict_groups(stream: &Stream, inputs: &SchedulingInputs) -> Vec<String> {
    stream
        .groups
        .iter()
        .map(|g| g.raw.clone())
        .filter(|raw| {
            inputs.options.dead_groups_occupy_conflict_indexes || !inputs.dead_groups.contains(raw)
        })
        .collect()
}

/// The outcome of trying to seat a stream within one shift on one day.
enum SlotOutcome {
    Placed {
        start_slot: Slot,
        room: super::rooms::RoomChoice,
    },
    Failed(UnscheduledReason),
}

/// Placements a priority-ordered list of lecture streams into the weekly grid.
pub struct PlacementEngine {
    tracker: ConflictTracker,
    rooms: RoomManager,
    nearby: BuildingProximity,
    instructor_locked_day: HashMap<String, Day>,
}

impl PlacementEngine {
    /// Build the engine's resource trackers from the scheduling inputs.
    ///
    /// # Errors
    /// Propagates [`crate::core::errors::SchedulerError`] from room-list
    /// validation or a conflicting `nearby`-building declaration.
    pub fn new(inputs: &SchedulingInputs) -> Result<Self, crate::core::errors::SchedulerError> {
        let tracker = ConflictTracker::new(&inputs.instructor_availability);
        let rooms = RoomManager::new(inputs.rooms.clone(), &inputs.group_buildings)?;
        let nearby = BuildingProximity::new(inputs.nearby_buildings.clone())?;
        Ok(Self {
            tracker,
            rooms,
            nearby,
            instructor_locked_day: HashMap::new(),
        })
    }

    /// Run the greedy, non-backtracking placement search over every lecture
    /// stream in `inputs`, in priority order.
    ///
    /// # Errors
    /// Propagates [`crate::core::errors::SchedulerError`] from room-list validation.
    pub fn run(
        mut inputs: SchedulingInputs,
    ) -> Result<ScheduleResult, crate::core::errors::SchedulerError> {
        let mut engine = Self::new(&inputs)?;

        let subject_footprints = super::priority::subject_practical_lab_hours(&inputs.streams);
        let mut streams: Vec<Stream> = inputs
            .streams
            .drain(..)
            .filter(|s| s.stream_type == StreamType::Lecture)
            .collect();
        order_streams(
            &mut streams,
            &inputs.flexible_subjects,
            &inputs.instructor_availability,
            &subject_footprints,
        );

        let mut result = ScheduleResult::default();
        let mut stream_hours = std::collections::HashMap::new();

        for stream in &streams {
            stream_hours.insert(stream.id, stream.hours.total);
            engine.place_one(stream, &inputs, &mut result);
        }

        result.recompute_statistics(&stream_hours);
        Ok(result)
    }

    fn place_one(&mut self, stream: &Stream, inputs: &SchedulingInputs, result: &mut ScheduleResult) {
        let group_raws: Vec<String> = stream.groups.iter().map(|g| g.raw.clone()).collect();
        let conflict_groups = conflict_groups(stream, inputs);

        let primary_shift = determine_shift(stream, inputs);
        let needed = stream.hours.consecutive_slots_needed().max(1);

        let mut days = candidate_days(stream, inputs, &self.tracker);
        let wants_one_day_per_week = inputs.options.enforce_one_day_per_week
            && inputs
                .instructor_day_constraints
                .get(&stream.instructor)
                .is_some_and(|c| c.one_day_per_week);
        if wants_one_day_per_week {
            if let Some(&locked) = self.instructor_locked_day.get(&stream.instructor) {
                days.retain(|d| *d == locked);
            }
        }

        let allow_third_year_exception =
            inputs.options.third_year_shift_exception && is_third_year_stream(stream) && matches!(primary_shift, Shift::First);

        let mut best_reason: Option<UnscheduledReason> = None;
        let mut placed_at: Option<(Day, Shift, Slot, super::rooms::RoomChoice)> = None;

        'days: for day in days {
            for shift in std::iter::once(primary_shift)
                .chain(allow_third_year_exception.then_some(Shift::Second))
            {
                let last_slot = shift_last_slot(shift, inputs.options.extend_shift_boundary_to_slot_seven);
                match self.try_shift_on_day(stream, &conflict_groups, day, shift, last_slot, needed, inputs) {
                    SlotOutcome::Placed { start_slot, room } => {
                        placed_at = Some((day, shift, start_slot, room));
                        break 'days;
                    }
                    SlotOutcome::Failed(reason) => {
                        best_reason = Some(UnscheduledReason::fold(best_reason, reason));
                    }
                }
            }
        }

        if let Some((day, _shift, start_slot, room)) = placed_at {
            if wants_one_day_per_week {
                self.instructor_locked_day
                    .entry(stream.instructor.clone())
                    .or_insert(day);
            }

            let slots: Vec<Slot> = (0..needed)
                .filter_map(|offset| Slot::new(start_slot.number() + offset as u8))
                .collect();
            for &slot in &slots {
                self.tracker.reserve(
                    &stream.instructor,
                    &conflict_groups,
                    day,
                    slot,
                    WeekType::Both,
                    &room.address,
                );
                self.rooms.reserve(&room.name, day, slot, WeekType::Both);
                result.assignments.push(Assignment {
                    stream_id: stream.id,
                    subject: stream.subject.clone(),
                    instructor: stream.instructor.clone(),
                    groups: group_raws.clone(),
                    student_count: stream.student_count,
                    day,
                    slot,
                    room: room.name.clone(),
                    room_address: room.address.clone(),
                    week_type: WeekType::Both,
                });
            }
        } else {
            result.unscheduled.push(UnscheduledStream {
                stream_id: stream.id,
                subject: stream.subject.clone(),
                instructor: stream.instructor.clone(),
                groups: group_raws,
                reason: best_reason.unwrap_or(UnscheduledReason::AllSlotsExhausted),
                detail: format!("exhausted candidate (day, slot) positions in the {primary_shift:?} shift"),
            });
        }
    }

    /// Attempt every (start slot) position within one shift on one day.
    fn try_shift_on_day(
        &self,
        stream: &Stream,
        conflict_groups: &[String],
        day: Day,
        shift: Shift,
        last_slot: Slot,
        needed: u32,
        inputs: &SchedulingInputs,
    ) -> SlotOutcome {
        let specialty_prefixes: HashSet<String> =
            stream.groups.iter().map(|g| g.specialty_prefix.clone()).collect();

        let mut best_reason: Option<UnscheduledReason> = None;
        let mut slot_num = shift.first_slot().number();

        while slot_num <= last_slot.number() {
            let Some(start_slot) = Slot::new(slot_num) else {
                break;
            };
            slot_num += 1;

            if start_slot.number() + needed as u8 - 1 > last_slot.number() {
                best_reason = Some(UnscheduledReason::fold(best_reason, UnscheduledReason::NoConsecutiveSlots));
                continue;
            }

            let slots: Vec<Slot> = (0..needed)
                .filter_map(|offset| Slot::new(start_slot.number() + offset as u8))
                .collect();
            if slots.len() < needed as usize {
                best_reason = Some(UnscheduledReason::fold(best_reason, UnscheduledReason::NoConsecutiveSlots));
                continue;
            }

            if let Some(reason) = self.check_instructor_and_groups(stream, conflict_groups, day, &slots) {
                best_reason = Some(UnscheduledReason::fold(best_reason, reason));
                continue;
            }

            let Some(room) = self.rooms.choose(
                &stream.subject,
                &stream.instructor,
                &specialty_prefixes,
                stream.student_count,
                day,
                start_slot,
                WeekType::Both,
                &inputs.subject_room_requirements,
                &inputs.instructor_room_preferences,
                &inputs.group_buildings,
            ) else {
                best_reason = Some(UnscheduledReason::fold(best_reason, UnscheduledReason::NoRoomAvailable));
                continue;
            };

            if let Some(reason) = self.check_building_gap(conflict_groups, day, &slots, &room.address) {
                best_reason = Some(UnscheduledReason::fold(best_reason, reason));
                continue;
            }

            return SlotOutcome::Placed { start_slot, room };
        }

        SlotOutcome::Failed(best_reason.unwrap_or(UnscheduledReason::AllSlotsExhausted))
    }

    fn check_instructor_and_groups(
        &self,
        stream: &Stream,
        conflict_groups: &[String],
        day: Day,
        slots: &[Slot],
    ) -> Option<UnscheduledReason> {
        for &slot in slots {
            if let Some(reason) =
                self.tracker.instructor_block_reason(&stream.instructor, day, slot, WeekType::Both)
            {
                return Some(reason);
            }
            if !self.tracker.are_groups_available(conflict_groups, day, slot, WeekType::Both) {
                return Some(UnscheduledReason::GroupConflict);
            }
        }
        None
    }

    /// Checks the resolved tentative room address against every slot's
    /// neighbors for the building-travel-gap constraint.
    fn check_building_gap(
        &self,
        conflict_groups: &[String],
        day: Day,
        slots: &[Slot],
        target_address: &str,
    ) -> Option<UnscheduledReason> {
        for &slot in slots {
            let ok = self.tracker.check_building_gap(
                conflict_groups,
                day,
                slot,
                WeekType::Both,
                target_address,
                |a, b| self.nearby.nearby(a, b),
            );
            if !ok {
                return Some(UnscheduledReason::BuildingGapRequired);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{GroupCode, Language, Provenance, Room, StreamId, WeeklyHours};

    fn lecture_stream(id: u64, student_count: u32) -> Stream {
        Stream {
            id: StreamId(id),
            subject: "Anatomy".to_string(),
            stream_type: StreamType::Lecture,
            instructor: "Dr. A".to_string(),
            groups: vec![GroupCode::parse("ВЕТ-21").unwrap(), GroupCode::parse("ВЕТ-22").unwrap()],
            student_count,
            language: Language::Kaz,
            hours: WeeklyHours::decompose(15).unwrap(),
            provenance: Provenance {
                sheet: "Sheet".to_string(),
                rows: vec![0],
            },
            is_subgroup: false,
            is_implicit_subgroup: false,
        }
    }

    #[test]
    fn single_stream_plenty_of_rooms_places_on_monday_slot_one() {
        let mut inputs = SchedulingInputs {
            rooms: vec![Room::new("RoomA".to_string(), 50, "A".to_string(), false)],
            ..SchedulingInputs::default()
        };
        inputs.streams.push(lecture_stream(1, 40));

        let result = PlacementEngine::run(inputs).unwrap();
        assert_eq!(result.assignments.len(), 1);
        let a = &result.assignments[0];
        assert_eq!(a.day, Day::Mon);
        assert_eq!(a.slot.number(), 1);
        assert_eq!(a.room, "RoomA");
        assert!(result.unscheduled.is_empty());
    }

    #[test]
    fn instructor_friday_blackout_is_avoided_without_unscheduled_record() {
        let mut availability = super::super::inputs::InstructorAvailability::new();
        let mut by_day = std::collections::HashMap::new();
        let all_times: Vec<String> = (1..=13u8)
            .map(|n| Slot::new(n).unwrap().start_time())
            .collect();
        by_day.insert(Day::Fri, all_times);
        availability.insert("Dr. A".to_string(), by_day);

        let mut inputs = SchedulingInputs {
            rooms: vec![Room::new("RoomA".to_string(), 50, "A".to_string(), false)],
            instructor_availability: availability,
            ..SchedulingInputs::default()
        };
        inputs.streams.push(lecture_stream(1, 40));

        let result = PlacementEngine::run(inputs).unwrap();
        assert_eq!(result.assignments.len(), 1);
        assert!(result.unscheduled.is_empty());
        assert_ne!(result.assignments[0].day, Day::Fri);
    }

    #[test]
    fn no_room_available_is_reported_when_nothing_fits() {
        let mut inputs = SchedulingInputs {
            rooms: vec![Room::new("Tiny".to_string(), 5, "A".to_string(), false)],
            ..SchedulingInputs::default()
        };
        inputs.streams.push(lecture_stream(1, 200));

        let result = PlacementEngine::run(inputs).unwrap();
        assert!(result.assignments.is_empty());
        assert_eq!(result.unscheduled.len(), 1);
        assert_eq!(
            result.unscheduled[0].reason,
            UnscheduledReason::NoRoomAvailable
        );
    }

    #[test]
    fn specialty_exclusive_building_is_used_even_with_larger_rooms_elsewhere() {
        let mut group_buildings = super::super::inputs::GroupBuildings::new();
        group_buildings.insert(
            "ВЕТ".to_string(),
            vec![super::super::inputs::AddressRooms {
                address: "ул. Жангир хана, 51/4".to_string(),
                rooms: None,
            }],
        );

        let mut inputs = SchedulingInputs {
            rooms: vec![
                Room::new("BigElsewhere".to_string(), 500, "Downtown".to_string(), false),
                Room::new("VetHall".to_string(), 45, "ул. Жангир хана, 51/4".to_string(), false),
            ],
            group_buildings,
            ..SchedulingInputs::default()
        };
        inputs.streams.push(lecture_stream(1, 40));

        let result = PlacementEngine::run(inputs).unwrap();
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.assignments[0].room, "VetHall");
    }

    #[test]
    fn building_travel_gap_rejects_adjacent_slot_and_retries_later() {
        // Two streams sharing a group, each pinned to a different, non-nearby address.
        let mut inputs = SchedulingInputs {
            rooms: vec![
                Room::new("RoomA".to_string(), 50, "A".to_string(), false),
                Room::new("RoomB".to_string(), 50, "B".to_string(), false),
            ],
            ..SchedulingInputs::default()
        };

        let mut first = lecture_stream(1, 40);
        first.subject = "Anatomy".to_string();
        first.instructor = "Dr. A".to_string();
        let mut second = lecture_stream(2, 40);
        second.subject = "Biology".to_string();
        second.instructor = "Dr. B".to_string();

        let mut subject_requirements = super::super::inputs::SubjectRoomRequirements::new();
        subject_requirements.insert(
            "Anatomy".to_string(),
            super::super::inputs::RoomPreference::Locations(vec![super::super::inputs::RoomLocation {
                address: "A".to_string(),
                room: Some("RoomA".to_string()),
            }]),
        );
        subject_requirements.insert(
            "Biology".to_string(),
            super::super::inputs::RoomPreference::Locations(vec![super::super::inputs::RoomLocation {
                address: "B".to_string(),
                room: Some("RoomB".to_string()),
            }]),
        );
        inputs.subject_room_requirements = subject_requirements;
        inputs.streams.push(first);
        inputs.streams.push(second);

        let result = PlacementEngine::run(inputs).unwrap();
        assert_eq!(result.assignments.len(), 2);
        // First takes slot 1 in RoomA; the second shares a group and can't take the
        // adjacent slot 2 (address B isn't nearby A), so it skips ahead to slot 3.
        let by_room: std::collections::HashMap<&str, u8> = result
            .assignments
            .iter()
            .map(|a| (a.room.as_str(), a.slot.number()))
            .collect();
        assert_eq!(by_room["RoomA"], 1);
        assert_eq!(by_room["RoomB"], 3);
    }

    #[test]
    fn enforce_one_day_per_week_restricts_subsequent_streams_to_locked_day() {
        use super::super::inputs::InstructorDayConstraint;
        use super::super::options::SchedulerOptions;

        let mut day_constraints = super::super::inputs::InstructorDayConstraints::new();
        day_constraints.insert(
            "Dr. Lock".to_string(),
            InstructorDayConstraint {
                one_day_per_week: true,
                ..InstructorDayConstraint::default()
            },
        );

        let mut inputs = SchedulingInputs {
            rooms: vec![Room::new("RoomA".to_string(), 50, "A".to_string(), false)],
            options: SchedulerOptions {
                enforce_one_day_per_week: true,
                ..SchedulerOptions::default()
            },
            instructor_day_constraints: day_constraints,
            ..SchedulingInputs::default()
        };
        let mut first = lecture_stream(1, 40);
        first.instructor = "Dr. Lock".to_string();
        let mut second = lecture_stream(2, 40);
        second.instructor = "Dr. Lock".to_string();
        second.groups = vec![GroupCode::parse("СТР-21").unwrap()];
        inputs.streams.push(first);
        inputs.streams.push(second);

        let result = PlacementEngine::run(inputs).unwrap();
        assert_eq!(result.assignments.len(), 2);
        assert_eq!(result.assignments[0].day, result.assignments[1].day);
    }

    #[test]
    fn allowed_days_by_year_restricts_candidate_days_even_without_the_one_day_switch() {
        use super::super::inputs::InstructorDayConstraint;

        let mut allowed_days_by_year = HashMap::new();
        allowed_days_by_year.insert(1, vec![Day::Wed]);
        let mut day_constraints = super::super::inputs::InstructorDayConstraints::new();
        day_constraints.insert(
            "Dr. A".to_string(),
            InstructorDayConstraint {
                allowed_days_by_year,
                one_day_per_week: false,
            },
        );

        let inputs = SchedulingInputs {
            rooms: vec![Room::new("RoomA".to_string(), 50, "A".to_string(), false)],
            instructor_day_constraints: day_constraints,
            streams: vec![lecture_stream(1, 40)],
            ..SchedulingInputs::default()
        };

        let result = PlacementEngine::run(inputs).unwrap();
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.assignments[0].day, Day::Wed);
    }
}
