//! Room manager: four-tier room selection with capacity buffering.

use std::collections::{HashMap, HashSet};

use crate::core::errors::SchedulerError;
use crate::core::models::{Day, Room, Slot, WeekType};

use super::inputs::{
    AddressRooms, GroupBuildings, InstructorRoomPreferences, RoomLocation, RoomPreference,
    SubjectRoomRequirements, SPECIALTY_EXCLUSIVE_PREFIXES,
};

/// Whether `room` satisfies any one of `locations` on its own: a room-level
/// entry (`loc.room` set) matches only that named room, while an
/// address-level entry (`loc.room: None`) matches any room at that address.
/// Each entry is resolved independently so a room-specific entry in the list
/// cannot poison an unrelated address-only entry sharing the same list.
fn room_matches_locations(room: &Room, locations: &[RoomLocation]) -> bool {
    locations.iter().any(|loc| match loc.room.as_deref() {
        Some(name) => name == room.name,
        None => loc.address == room.address,
    })
}

/// Whether `room` satisfies any one of `declared` address-rooms entries: the
/// address must match, and if that entry restricts to specific room names,
/// `room.name` must be one of them.
fn room_matches_address_rooms(room: &Room, declared: &[AddressRooms]) -> bool {
    declared.iter().any(|d| {
        d.address == room.address
            && d.rooms
                .as_ref()
                .is_none_or(|names| names.iter().any(|n| n == &room.name))
    })
}

/// The piecewise-linear capacity buffer: 50% at ≤30 students, 20% at ≥100,
/// linearly interpolated in between.
#[must_use]
pub fn capacity_buffer_fraction(student_count: u32) -> f64 {
    let count = f64::from(student_count);
    if count <= 30.0 {
        0.50
    } else if count >= 100.0 {
        0.20
    } else {
        let t = (count - 30.0) / (100.0 - 30.0);
        0.50 + t * (0.20 - 0.50)
    }
}

/// A room chosen for a stream, identified by name and address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomChoice {
    /// Chosen room's name.
    pub name: String,
    /// Chosen room's address.
    pub address: String,
}

/// Owns the room list and its own occupancy map, written only by the
/// placement engine via [`RoomManager::reserve`].
#[derive(Debug, Clone)]
pub struct RoomManager {
    rooms: Vec<Room>,
    occupied: HashSet<(String, Day, Slot, WeekType)>,
    exclusive_addresses: HashMap<String, String>,
}

impl RoomManager {
    /// Build the manager from the declared room list and group-building
    /// declarations (used to derive which addresses are specialty-exclusive).
    ///
    /// # Errors
    /// Returns [`SchedulerError::DuplicateRoomName`] if two rooms share a name.
    pub fn new(rooms: Vec<Room>, group_buildings: &GroupBuildings) -> Result<Self, SchedulerError> {
        let mut seen = HashSet::new();
        for room in &rooms {
            room.validate()?;
            if !seen.insert(room.name.clone()) {
                return Err(SchedulerError::DuplicateRoomName(room.name.clone()));
            }
        }

        let mut exclusive_addresses = HashMap::new();
        for (prefix, addresses) in group_buildings {
            if SPECIALTY_EXCLUSIVE_PREFIXES.contains(&prefix.as_str()) {
                for declared in addresses {
                    exclusive_addresses.insert(declared.address.clone(), prefix.clone());
                }
            }
        }

        Ok(Self {
            rooms,
            occupied: HashSet::new(),
            exclusive_addresses,
        })
    }

    /// Whether `room` is free at `(day, slot, week_type)`.
    #[must_use]
    pub fn is_available(&self, room: &str, day: Day, slot: Slot, week_type: WeekType) -> bool {
        !self
            .occupied
            .contains(&(room.to_string(), day, slot, week_type))
    }

    /// Mark `room` occupied at `(day, slot, week_type)`. Caller guarantees availability was checked.
    pub fn reserve(&mut self, room: &str, day: Day, slot: Slot, week_type: WeekType) {
        self.occupied
            .insert((room.to_string(), day, slot, week_type));
    }

    /// Whether `address` may host a stream whose groups carry the given specialty prefixes.
    ///
    /// An address declared exclusive for one specialty forbids every other
    /// specialty's stream, but is open to streams with no specialty prefix at all.
    fn access_allowed(&self, address: &str, specialty_prefixes: &HashSet<String>) -> bool {
        match self.exclusive_addresses.get(address) {
            None => true,
            Some(owner) => specialty_prefixes.is_empty() || specialty_prefixes.iter().all(|p| p == owner),
        }
    }

    fn is_special_allowed(&self, room: &Room, subject: &str, subject_specific: bool) -> bool {
        !room.is_special || subject_specific
    }

    /// Restrict `rooms` to those available at `(day, slot, week_type)` and
    /// accessible to a stream with the given specialty prefixes, in
    /// lexicographic name order for deterministic downstream selection.
    fn available_candidates<'a>(
        &self,
        rooms: impl IntoIterator<Item = &'a Room>,
        day: Day,
        slot: Slot,
        week_type: WeekType,
        specialty_prefixes: &HashSet<String>,
    ) -> Vec<&'a Room> {
        let mut candidates: Vec<&Room> = rooms
            .into_iter()
            .filter(|room| self.is_available(&room.name, day, slot, week_type))
            .filter(|room| self.access_allowed(&room.address, specialty_prefixes))
            .collect();
        candidates.sort_by(|a, b| a.name.cmp(&b.name));
        candidates
    }

    /// Select from `candidates`: the smallest room whose capacity covers
    /// `student_count`, falling back to the largest room whose buffered
    /// capacity covers it. Ties are broken lexicographically by name.
    #[must_use]
    pub fn select_best(candidates: &[&Room], student_count: u32) -> Option<RoomChoice> {
        let needed = i64::from(student_count);
        let mut fitting: Vec<&&Room> = candidates
            .iter()
            .filter(|r| r.capacity >= needed)
            .collect();
        fitting.sort_by(|a, b| a.capacity.cmp(&b.capacity).then_with(|| a.name.cmp(&b.name)));
        if let Some(room) = fitting.first() {
            return Some(RoomChoice {
                name: room.name.clone(),
                address: room.address.clone(),
            });
        }

        let buffer = f64::from(student_count) * capacity_buffer_fraction(student_count);
        let mut buffered: Vec<&&Room> = candidates
            .iter()
            .filter(|r| r.capacity as f64 + buffer >= f64::from(student_count))
            .collect();
        buffered.sort_by(|a, b| b.capacity.cmp(&a.capacity).then_with(|| a.name.cmp(&b.name)));
        buffered.first().map(|room| RoomChoice {
            name: room.name.clone(),
            address: room.address.clone(),
        })
    }

    /// Run the four-tier policy for one (subject, instructor, groups) stream
    /// at a single tentative `(day, slot, week_type)`.
    ///
    /// Returns `Ok(Some(choice))` on success, `Ok(None)` when no tier
    /// produced a room (`NoRoomAvailable`), and propagates nothing else —
    /// callers treat `Ok(None)` as the room-selection failure for this slot.
    #[must_use]
    pub fn choose(
        &self,
        subject: &str,
        instructor: &str,
        specialty_prefixes: &HashSet<String>,
        student_count: u32,
        day: Day,
        slot: Slot,
        week_type: WeekType,
        subject_requirements: &SubjectRoomRequirements,
        instructor_preferences: &InstructorRoomPreferences,
        group_buildings: &GroupBuildings,
    ) -> Option<RoomChoice> {
        // Tier 1: subject-required rooms. Declared but empty-after-filter is a hard fail.
        if let Some(pref) = subject_requirements.get(subject) {
            let locations = pref.lecture_locations();
            let pool: Vec<&Room> = self
                .rooms
                .iter()
                .filter(|r| {
                    room_matches_locations(r, locations) && self.is_special_allowed(r, subject, true)
                })
                .collect();
            let candidates = self.available_candidates(pool, day, slot, week_type, specialty_prefixes);
            return Self::select_best(&candidates, student_count);
        }

        // Tier 2: instructor-preferred rooms. Falls through to tier 3 on empty.
        if let Some(pref) = instructor_preferences.get(instructor) {
            let locations = pref.lecture_locations();
            if !locations.is_empty() {
                let pool: Vec<&Room> = self
                    .rooms
                    .iter()
                    .filter(|r| !r.is_special && room_matches_locations(r, locations))
                    .collect();
                let candidates =
                    self.available_candidates(pool, day, slot, week_type, specialty_prefixes);
                if let Some(choice) = Self::select_best(&candidates, student_count) {
                    return Some(choice);
                }
            }
        }

        // Tier 3: group-building preference, when every group shares one specialty prefix.
        if specialty_prefixes.len() == 1 {
            let prefix = specialty_prefixes.iter().next().unwrap();
            if let Some(declared) = group_buildings.get(prefix) {
                let pool: Vec<&Room> = self
                    .rooms
                    .iter()
                    .filter(|r| !r.is_special && room_matches_address_rooms(r, declared))
                    .collect();
                let candidates =
                    self.available_candidates(pool, day, slot, week_type, specialty_prefixes);
                if let Some(choice) = Self::select_best(&candidates, student_count) {
                    return Some(choice);
                }
            }
        }

        // Tier 4: general pool of non-special rooms passing the access filter.
        let pool: Vec<&Room> = self.rooms.iter().filter(|r| !r.is_special).collect();
        let candidates = self.available_candidates(pool, day, slot, week_type, specialty_prefixes);
        Self::select_best(&candidates, student_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(name: &str, capacity: i64, address: &str) -> Room {
        Room::new(name.to_string(), capacity, address.to_string(), false)
    }

    #[test]
    fn buffer_fraction_bounds_and_interpolation() {
        assert!((capacity_buffer_fraction(10) - 0.50).abs() < 1e-9);
        assert!((capacity_buffer_fraction(30) - 0.50).abs() < 1e-9);
        assert!((capacity_buffer_fraction(100) - 0.20).abs() < 1e-9);
        assert!((capacity_buffer_fraction(200) - 0.20).abs() < 1e-9);
        let mid = capacity_buffer_fraction(65);
        assert!(mid > 0.20 && mid < 0.50);
    }

    #[test]
    fn select_best_prefers_smallest_fit() {
        let rooms = vec![room("A", 60, "Main"), room("B", 40, "Main"), room("C", 100, "Main")];
        let refs: Vec<&Room> = rooms.iter().collect();
        let choice = RoomManager::select_best(&refs, 35).unwrap();
        assert_eq!(choice.name, "B");
    }

    #[test]
    fn select_best_falls_back_to_buffer() {
        // student_count 30, rooms 18/16/14: buffer 0.50 => effective threshold capacity+15 >= 30
        let rooms = vec![room("R18", 18, "Main"), room("R16", 16, "Main"), room("R14", 14, "Main")];
        let refs: Vec<&Room> = rooms.iter().collect();
        let choice = RoomManager::select_best(&refs, 30).unwrap();
        assert_eq!(choice.name, "R18");
    }

    #[test]
    fn tie_break_is_lexicographic() {
        let rooms = vec![room("B", 50, "Main"), room("A", 50, "Main")];
        let refs: Vec<&Room> = rooms.iter().collect();
        let choice = RoomManager::select_best(&refs, 40).unwrap();
        assert_eq!(choice.name, "A");
    }

    #[test]
    fn general_pool_excludes_special_rooms() {
        let manager = RoomManager::new(
            vec![room("Lab1", 30, "Main")],
            &GroupBuildings::new(),
        )
        .unwrap();
        let mut special_room = room("Lab2", 30, "Main");
        special_room.is_special = true;
        let mut manager = manager;
        manager.rooms.push(special_room);

        let slot = Slot::new(1).unwrap();
        let choice = manager.choose(
            "Anatomy",
            "Dr. A",
            &HashSet::new(),
            20,
            Day::Mon,
            slot,
            WeekType::Both,
            &SubjectRoomRequirements::new(),
            &InstructorRoomPreferences::new(),
            &GroupBuildings::new(),
        );
        assert_eq!(choice.unwrap().name, "Lab1");
    }

    #[test]
    fn duplicate_room_name_is_rejected() {
        let result = RoomManager::new(
            vec![room("A", 10, "Main"), room("A", 20, "Main")],
            &GroupBuildings::new(),
        );
        assert!(matches!(result, Err(SchedulerError::DuplicateRoomName(_))));
    }

    #[test]
    fn tier1_mixed_room_and_address_locations_resolve_independently() {
        // One address-only entry ("any room at Main") and one room-specific
        // entry ("specifically B101 at Annex") in the same preference list;
        // a room at "Main" must still be a candidate even though the list
        // also names a specific room elsewhere.
        let mut requirements = SubjectRoomRequirements::new();
        requirements.insert(
            "Anatomy".to_string(),
            RoomPreference::Locations(vec![
                RoomLocation { address: "Main".to_string(), room: None },
                RoomLocation { address: "Annex".to_string(), room: Some("B101".to_string()) },
            ]),
        );
        let manager = RoomManager::new(
            vec![room("MainHall", 40, "Main"), room("B101", 30, "Annex"), room("B102", 30, "Annex")],
            &GroupBuildings::new(),
        )
        .unwrap();

        let slot = Slot::new(1).unwrap();
        let choice = manager.choose(
            "Anatomy",
            "Dr. A",
            &HashSet::new(),
            20,
            Day::Mon,
            slot,
            WeekType::Both,
            &requirements,
            &InstructorRoomPreferences::new(),
            &GroupBuildings::new(),
        );
        assert_eq!(choice.unwrap().name, "MainHall");
    }

    #[test]
    fn tier3_enforces_restricted_room_list_at_shared_address() {
        let mut group_buildings = GroupBuildings::new();
        group_buildings.insert(
            "ВЕТ".to_string(),
            vec![AddressRooms {
                address: "Shared".to_string(),
                rooms: Some(vec!["Good".to_string()]),
            }],
        );
        let manager = RoomManager::new(
            vec![room("Good", 30, "Shared"), room("Bad", 30, "Shared")],
            &group_buildings,
        )
        .unwrap();

        let slot = Slot::new(1).unwrap();
        let mut specialty = HashSet::new();
        specialty.insert("ВЕТ".to_string());

        let choice = manager.choose(
            "Anatomy",
            "Dr. A",
            &specialty,
            20,
            Day::Mon,
            slot,
            WeekType::Both,
            &SubjectRoomRequirements::new(),
            &InstructorRoomPreferences::new(),
            &group_buildings,
        );
        assert_eq!(choice.unwrap().name, "Good");
    }

    #[test]
    fn exclusive_address_blocks_other_specialty() {
        let mut group_buildings = GroupBuildings::new();
        group_buildings.insert(
            "ВЕТ".to_string(),
            vec![super::super::inputs::AddressRooms {
                address: "ул. Жангир хана, 51/4".to_string(),
                rooms: None,
            }],
        );
        let manager = RoomManager::new(
            vec![room("VetHall", 50, "ул. Жангир хана, 51/4")],
            &group_buildings,
        )
        .unwrap();

        let slot = Slot::new(1).unwrap();
        let mut other_specialty = HashSet::new();
        other_specialty.insert("СТР".to_string());

        let choice = manager.choose(
            "Construction Basics",
            "Dr. B",
            &other_specialty,
            20,
            Day::Mon,
            slot,
            WeekType::Both,
            &SubjectRoomRequirements::new(),
            &InstructorRoomPreferences::new(),
            &group_buildings,
        );
        assert!(choice.is_none());
    }
}
