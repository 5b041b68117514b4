//! The nine external-collaborator inputs the scheduler consumes, bundled
//! into one aggregate so a single [`PlacementEngine::run`](super::placement::PlacementEngine::run)
//! call can take everything it needs.
//!
//! None of these are read from files here; loading them from disk/JSON is a
//! CLI concern.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::models::{Day, Room, Stream};

use super::options::SchedulerOptions;

/// Specialty prefixes whose declared buildings are exclusive: no other
/// specialty's stream may be placed there.
pub const SPECIALTY_EXCLUSIVE_PREFIXES: [&str; 5] = ["ВЕТ", "СТР", "АРХ", "ЗК", "ЮР"];

/// An address, optionally restricted to a specific room at that address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomLocation {
    /// Building address.
    pub address: String,
    /// Specific room name at that address, if the preference is room-level
    /// rather than address-level.
    #[serde(default)]
    pub room: Option<String>,
}

/// A room preference, either a flat list of locations or split by class type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomPreference {
    /// One location list usable for any class type.
    Locations(Vec<RoomLocation>),
    /// Distinct location lists per class type.
    ByClassType {
        /// Preferred locations for lectures.
        #[serde(default)]
        lecture: Vec<RoomLocation>,
        /// Preferred locations for practicals.
        #[serde(default)]
        practice: Vec<RoomLocation>,
        /// Preferred locations for labs.
        #[serde(default)]
        lab: Vec<RoomLocation>,
    },
}

impl RoomPreference {
    /// Locations applicable to lectures: the flat list, or the `lecture` arm
    /// of a by-class-type preference.
    #[must_use]
    pub fn lecture_locations(&self) -> &[RoomLocation] {
        match self {
            Self::Locations(locations) => locations,
            Self::ByClassType { lecture, .. } => lecture,
        }
    }
}

/// A declared address (and optionally a restricted room list) for a specialty
/// prefix's group-building preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRooms {
    /// Building address.
    pub address: String,
    /// Rooms at that address eligible for this specialty, if restricted.
    #[serde(default)]
    pub rooms: Option<Vec<String>>,
}

/// Per-instructor day constraints: which days each year's groups may meet
/// that instructor on (`allowed_days_by_year`, always enforced), and whether
/// the instructor wants a single teaching day per week (`one_day_per_week`,
/// only enforced while [`SchedulerOptions::enforce_one_day_per_week`] is set).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorDayConstraint {
    /// Allowed days keyed by group year.
    #[serde(default)]
    pub allowed_days_by_year: HashMap<u8, Vec<Day>>,
    /// Whether the instructor should only teach on one day per week.
    #[serde(default)]
    pub one_day_per_week: bool,
}

/// Map `instructor -> map<day, list of unavailable "HH:MM" slot-start times>`.
pub type InstructorAvailability = HashMap<String, HashMap<Day, Vec<String>>>;

/// Map `instructor -> room preference`.
pub type InstructorRoomPreferences = HashMap<String, RoomPreference>;

/// Map `instructor -> day constraint`.
pub type InstructorDayConstraints = HashMap<String, InstructorDayConstraint>;

/// Map `subject -> room requirement`.
pub type SubjectRoomRequirements = HashMap<String, RoomPreference>;

/// Map `specialty prefix -> declared addresses`.
pub type GroupBuildings = HashMap<String, Vec<AddressRooms>>;

/// The nine external-collaborator inputs bundled for a single scheduling run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulingInputs {
    /// The streams to place. The placement engine only schedules lecture
    /// streams; practicals and labs pass through untouched.
    pub streams: Vec<Stream>,
    /// 1. Declared rooms.
    pub rooms: Vec<Room>,
    /// 2. Group codes whose student count is forced to zero.
    #[serde(default)]
    pub dead_groups: HashSet<String>,
    /// 3. Group codes overriding the default year-based shift rule to second shift.
    #[serde(default)]
    pub forced_second_shift_groups: HashSet<String>,
    /// 4. Instructor unavailability.
    #[serde(default)]
    pub instructor_availability: InstructorAvailability,
    /// 5. Instructor room preferences.
    #[serde(default)]
    pub instructor_room_preferences: InstructorRoomPreferences,
    /// 6. Instructor day constraints.
    #[serde(default)]
    pub instructor_day_constraints: InstructorDayConstraints,
    /// 7. Subject room requirements.
    #[serde(default)]
    pub subject_room_requirements: SubjectRoomRequirements,
    /// 8. Group-building declarations, keyed by specialty prefix.
    #[serde(default)]
    pub group_buildings: GroupBuildings,
    /// 9. Declared nearby-building groups.
    #[serde(default)]
    pub nearby_buildings: Vec<Vec<String>>,
    /// Subjects exempt from the Mon-Wed-first placement order (e.g. physical education).
    #[serde(default)]
    pub flexible_subjects: HashSet<String>,
    /// Optional placement behavior switches, all off by default.
    #[serde(default)]
    pub options: SchedulerOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lecture_locations_flat_list() {
        let pref = RoomPreference::Locations(vec![RoomLocation {
            address: "Main".to_string(),
            room: None,
        }]);
        assert_eq!(pref.lecture_locations().len(), 1);
    }

    #[test]
    fn lecture_locations_by_class_type() {
        let pref = RoomPreference::ByClassType {
            lecture: vec![RoomLocation {
                address: "Main".to_string(),
                room: Some("A101".to_string()),
            }],
            practice: vec![],
            lab: vec![],
        };
        assert_eq!(pref.lecture_locations().len(), 1);
    }

    #[test]
    fn empty_inputs_deserialize_from_minimal_json() {
        let inputs: SchedulingInputs = serde_json::from_str(r#"{"streams":[],"rooms":[]}"#).unwrap();
        assert!(inputs.streams.is_empty());
        assert!(inputs.dead_groups.is_empty());
    }
}
