//! Data models for the workload extractor and the stage-1 scheduler.

pub mod building;
pub mod group;
pub mod hours;
pub mod room;
pub mod stream;
pub mod time;

pub use building::BuildingProximity;
pub use group::{GroupCode, Language};
pub use hours::WeeklyHours;
pub use room::Room;
pub use stream::{Provenance, Stream, StreamId, StreamType};
pub use time::{Day, Shift, Slot, WeekType, ALL_DAYS, SLOTS_PER_DAY, WEEK_TYPE_COUNT};
