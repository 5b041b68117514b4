//! The weekly time grid: days, slots, shifts, and week types.

use serde::{Deserialize, Serialize};

/// A weekday the timetable schedules into. Saturday/Sunday are not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    /// Monday
    Mon,
    /// Tuesday
    Tue,
    /// Wednesday
    Wed,
    /// Thursday
    Thu,
    /// Friday
    Fri,
}

/// All weekdays in calendar order.
pub const ALL_DAYS: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

impl Day {
    /// Zero-based index into the dense `[Day]` reservation arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Mon => 0,
            Self::Tue => 1,
            Self::Wed => 2,
            Self::Thu => 3,
            Self::Fri => 4,
        }
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Mon => "Mon",
            Self::Tue => "Tue",
            Self::Wed => "Wed",
            Self::Thu => "Thu",
            Self::Fri => "Fri",
        };
        write!(f, "{s}")
    }
}

/// Total ordered slots in a day. Slot `k` runs from `(8+k):00` to `(8+k):50`.
pub const SLOTS_PER_DAY: usize = 13;

/// The last slot of the first shift (slots `1..=5`).
pub const FIRST_SHIFT_LAST_SLOT: u8 = 5;

/// The first slot of the second shift (slots `6..=13`).
pub const SECOND_SHIFT_FIRST_SLOT: u8 = 6;

/// A 1-indexed slot number in `1..=13`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot(u8);

impl Slot {
    /// Construct a slot, validating it falls in `1..=13`.
    #[must_use]
    pub const fn new(n: u8) -> Option<Self> {
        if n >= 1 && n as usize <= SLOTS_PER_DAY {
            Some(Self(n))
        } else {
            None
        }
    }

    /// The raw 1-indexed slot number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Zero-based index into dense `[Slot]` reservation arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// The clock hour at which this slot starts, e.g. slot 1 starts at 09:00.
    #[must_use]
    pub const fn start_hour(self) -> u8 {
        8 + self.0
    }

    /// `HH:MM` clock time this slot starts at (`MM` is always `00`).
    #[must_use]
    pub fn start_time(self) -> String {
        format!("{:02}:00", self.start_hour())
    }

    /// The shift this slot belongs to.
    #[must_use]
    pub const fn shift(self) -> Shift {
        if self.0 <= FIRST_SHIFT_LAST_SLOT {
            Shift::First
        } else {
            Shift::Second
        }
    }

    /// Slot immediately after this one, if it's still within the day.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    /// Slot immediately before this one, if one exists.
    #[must_use]
    pub fn prev(self) -> Option<Self> {
        if self.0 == 1 {
            None
        } else {
            Self::new(self.0 - 1)
        }
    }
}

/// A contiguous shift of the day: first shift is slots 1-5, second is slots 6-13.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shift {
    /// Slots 1 through 5.
    First,
    /// Slots 6 through 13.
    Second,
}

impl Shift {
    /// First slot of this shift.
    #[must_use]
    pub const fn first_slot(self) -> Slot {
        match self {
            Self::First => Slot(1),
            Self::Second => Slot(SECOND_SHIFT_FIRST_SLOT),
        }
    }

    /// Last slot of this shift.
    #[must_use]
    pub const fn last_slot(self) -> Slot {
        match self {
            Self::First => Slot(FIRST_SHIFT_LAST_SLOT),
            Self::Second => Slot(SLOTS_PER_DAY as u8),
        }
    }

    /// All slots belonging to this shift, in ascending order.
    #[must_use]
    pub fn slots(self) -> Vec<Slot> {
        let (start, end) = (self.first_slot().number(), self.last_slot().number());
        (start..=end).filter_map(Slot::new).collect()
    }
}

/// Which weeks of the 15-week semester a reservation applies to.
///
/// The current scheduler always assigns `Both` (the same placement every
/// week); the tag is carried through the data model for downstream
/// consumers that may one day alternate odd/even week placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekType {
    /// Odd-numbered weeks only.
    Odd,
    /// Even-numbered weeks only.
    Even,
    /// Every week of the semester.
    Both,
}

impl WeekType {
    /// Zero-based index into dense `[WeekType]` reservation arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Odd => 0,
            Self::Even => 1,
            Self::Both => 2,
        }
    }
}

/// Number of distinct week-type slots in the dense reservation arrays.
pub const WEEK_TYPE_COUNT: usize = 3;
