//! Stage-1 greedy weekly lecture scheduler.
//!
//! Submodules follow the placement pipeline: inputs are bundled
//! (`inputs`), streams are ordered by difficulty-to-place (`priority`), a
//! dense reservation index tracks instructor/group occupancy (`conflict`), a
//! four-tier policy picks rooms (`rooms`), and `placement` drives the
//! non-backtracking search that ties them together into a `result`.

pub mod conflict;
pub mod inputs;
pub mod options;
pub mod placement;
pub mod priority;
pub mod result;
pub mod rooms;

pub use conflict::ConflictTracker;
pub use inputs::SchedulingInputs;
pub use options::SchedulerOptions;
pub use placement::PlacementEngine;
pub use priority::order_streams;
pub use result::{Assignment, ScheduleResult, UnscheduledReason, UnscheduledStream};
pub use rooms::{RoomChoice, RoomManager};
