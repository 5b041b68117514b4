//! Teaching streams: the indivisible unit extracted from a workload sheet
//! and later scheduled.

use serde::{Deserialize, Serialize};

use super::group::{GroupCode, Language};
use super::hours::WeeklyHours;

/// The kind of class a stream represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamType {
    /// A combined lecture, taught to all of a subject's groups at once.
    Lecture,
    /// A practical session, typically one group (or subgroup) at a time.
    Practical,
    /// A laboratory session.
    Lab,
}

/// Where a stream's data came from, for diagnostics and deterministic tiebreaking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Source worksheet name.
    pub sheet: String,
    /// Zero-based row indexes this stream was assembled from, in file order.
    pub rows: Vec<usize>,
}

/// A stable identifier assigned to a stream at extraction time, in the order
/// streams were emitted. Used as the final tiebreaker in priority ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StreamId(pub u64);

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stream#{}", self.0)
    }
}

/// A teaching unit identified by `(subject, stream_type, instructor)`.
///
/// Invariant: one instructor implies one stream; a row with a different
/// instructor always starts a new stream even when the subject row-block is
/// shared with the previous stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    /// Identity assigned at extraction time, in emission order.
    pub id: StreamId,
    /// Subject name as it appears on the sheet (forward-filled).
    pub subject: String,
    /// Lecture, practical, or lab.
    pub stream_type: StreamType,
    /// Instructor name as extracted from the instructor column.
    pub instructor: String,
    /// Non-empty ordered list of group codes, in file order.
    pub groups: Vec<GroupCode>,
    /// Sum of counted students across `groups`; dead groups contribute 0.
    pub student_count: u32,
    /// Instruction language, taken from the row's language cell.
    pub language: Language,
    /// Semester/weekly hour load.
    pub hours: WeeklyHours,
    /// Source sheet and rows.
    pub provenance: Provenance,
    /// Set when the block used explicit subgroup notation (`/1/`, `/2/`, …).
    pub is_subgroup: bool,
    /// Set when a repeated group code forced an implicit per-row split.
    pub is_implicit_subgroup: bool,
}

impl Stream {
    /// The comparison key used by stream-uniqueness checks: streams sharing
    /// this key within one parse are a data error.
    #[must_use]
    pub fn uniqueness_key(&self) -> (String, StreamType, String, Vec<String>, WeeklyHours) {
        (
            self.subject.clone(),
            self.stream_type,
            self.instructor.clone(),
            self.groups.iter().map(|g| g.raw.clone()).collect(),
            self.hours,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::group::GroupCode;

    fn sample_stream() -> Stream {
        Stream {
            id: StreamId(1),
            subject: "Anatomy".to_string(),
            stream_type: StreamType::Lecture,
            instructor: "Dr. Akhmetov".to_string(),
            groups: vec![
                GroupCode::parse("ВЕТ-21").unwrap(),
                GroupCode::parse("ВЕТ-22").unwrap(),
            ],
            student_count: 45,
            language: Language::Kaz,
            hours: WeeklyHours::decompose(30).unwrap(),
            provenance: Provenance {
                sheet: "Fall2024".to_string(),
                rows: vec![10, 11],
            },
            is_subgroup: false,
            is_implicit_subgroup: false,
        }
    }

    #[test]
    fn stream_id_displays_with_prefix() {
        assert_eq!(StreamId(7).to_string(), "stream#7");
    }

    #[test]
    fn uniqueness_key_distinguishes_instructor() {
        let a = sample_stream();
        let mut b = sample_stream();
        b.instructor = "Dr. Other".to_string();
        assert_ne!(a.uniqueness_key(), b.uniqueness_key());
    }

    #[test]
    fn uniqueness_key_matches_for_identical_streams() {
        let a = sample_stream();
        let b = sample_stream();
        assert_eq!(a.uniqueness_key(), b.uniqueness_key());
    }
}
