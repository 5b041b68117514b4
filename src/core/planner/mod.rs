//! Workload extraction pipeline: turns an in-memory worksheet grid into a
//! normalized list of teaching [`Stream`](crate::core::models::Stream)s.
//!
//! [`grid`]/[`row`] hold the input shapes, [`pattern`] classifies a subject
//! block, [`extractor`] dispatches the block's rows to one of four
//! stream-building strategies, and [`workload`] orchestrates sheet
//! scanning end to end.

pub mod extractor;
pub mod grid;
pub mod pattern;
pub mod row;
pub mod workload;

pub use extractor::{extract_streams, StreamIdAllocator};
pub use grid::{ColumnLayout, KnownInstructorColumns, WorksheetGrid};
pub use pattern::{classify, BlockPattern};
pub use row::WorkloadRow;
pub use workload::{find_data_start, find_instructor_column, parse_sheet, parse_workload};
