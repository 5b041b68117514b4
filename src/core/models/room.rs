//! Rooms available for lecture placement.

use serde::{Deserialize, Serialize};

use crate::core::errors::SchedulerError;

/// A schedulable room.
///
/// `capacity` is stored signed because it is read directly from the
/// reference-configuration JSON: a negative value there is malformed input,
/// not a type-system impossibility, and [`Room::validate`] is what turns it
/// into the fatal [`SchedulerError::NegativeRoomCapacity`] the error design
/// calls out, rather than letting it collapse into a generic deserialize
/// failure or silently wrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room name/number, unique across the reference configuration.
    pub name: String,
    /// Seating capacity.
    pub capacity: i64,
    /// Building address, used for travel-distance and specialty-exclusivity checks.
    pub address: String,
    /// Whether this room is reserved for specialty-exclusive streams
    /// (a subset of the address's specialty-exclusive buildings, per group
    /// prefixes in `{ВЕТ, СТР, АРХ, ЗК, ЮР}`).
    pub is_special: bool,
}

impl Room {
    /// Construct a room. Does not itself validate; call [`Room::validate`]
    /// once all rooms are assembled (see [`crate::core::scheduler::rooms::RoomManager::new`]).
    #[must_use]
    pub const fn new(name: String, capacity: i64, address: String, is_special: bool) -> Self {
        Self {
            name,
            capacity,
            address,
            is_special,
        }
    }

    /// Reject a negative capacity.
    ///
    /// # Errors
    /// Returns [`SchedulerError::NegativeRoomCapacity`] if `capacity < 0`.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.capacity < 0 {
            return Err(SchedulerError::NegativeRoomCapacity(self.name.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructs_with_given_fields() {
        let r = Room::new("A101".to_string(), 60, "Main".to_string(), false);
        assert_eq!(r.name, "A101");
        assert_eq!(r.capacity, 60);
        assert!(!r.is_special);
    }

    #[test]
    fn negative_capacity_fails_validation() {
        let r = Room::new("A101".to_string(), -5, "Main".to_string(), false);
        assert!(matches!(
            r.validate(),
            Err(SchedulerError::NegativeRoomCapacity(name)) if name == "A101"
        ));
    }

    #[test]
    fn zero_capacity_is_valid() {
        let r = Room::new("A101".to_string(), 0, "Main".to_string(), false);
        assert!(r.validate().is_ok());
    }
}
