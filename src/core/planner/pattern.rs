//! Block pattern classifier: tags a subject block's rows with one of
//! four row-layout patterns.

use std::collections::HashSet;

use crate::core::models::GroupCode;

use super::row::WorkloadRow;

/// The four row-layout patterns a subject block can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockPattern {
    /// Every row carries explicit subgroup notation (`/1/`, `\2\`, ` -1`, …).
    ExplicitSubgroup,
    /// A group code repeats within the block without explicit notation.
    ImplicitSubgroup,
    /// More than half the rows carry a positive practical-hours cell.
    Pattern1a,
    /// At most half the rows carry a positive practical-hours cell.
    Pattern1b,
}

/// Classify a subject block. Pure function of its input rows.
///
/// Decision order: explicit subgroup notation, then a repeated group code,
/// then the practical-hours fill rate. An empty block defaults to
/// [`BlockPattern::Pattern1a`].
#[must_use]
pub fn classify(rows: &[WorkloadRow]) -> BlockPattern {
    if rows.is_empty() {
        return BlockPattern::Pattern1a;
    }

    if rows.iter().any(|r| GroupCode::is_subgroup_notation(&r.group_raw)) {
        return BlockPattern::ExplicitSubgroup;
    }

    let mut seen = HashSet::new();
    if rows.iter().any(|r| !seen.insert(r.group_raw.as_str())) {
        return BlockPattern::ImplicitSubgroup;
    }

    let positive_practical = rows.iter().filter(|r| r.practical_hours > 0).count();
    let fill_rate = positive_practical as f64 / rows.len() as f64;
    if fill_rate > 0.5 {
        BlockPattern::Pattern1a
    } else {
        BlockPattern::Pattern1b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Language;

    fn row(group_raw: &str, practical_hours: u32) -> WorkloadRow {
        WorkloadRow {
            row_index: 0,
            subject: "Anatomy".to_string(),
            group_raw: group_raw.to_string(),
            instructor: "Dr. A".to_string(),
            language: Language::Kaz,
            student_count: 20,
            lecture_hours: 0,
            practical_hours,
            lab_hours: 0,
        }
    }

    #[test]
    fn empty_block_is_1a() {
        assert!(matches!(classify(&[]), BlockPattern::Pattern1a));
    }

    #[test]
    fn explicit_subgroup_notation_wins_first() {
        let rows = vec![row("ВЕТ-21/1/", 5), row("ВЕТ-21/2/", 5)];
        assert!(matches!(classify(&rows), BlockPattern::ExplicitSubgroup));
    }

    #[test]
    fn repeated_group_without_notation_is_implicit() {
        let rows = vec![row("ВЕТ-21", 5), row("ВЕТ-21", 0)];
        assert!(matches!(classify(&rows), BlockPattern::ImplicitSubgroup));
    }

    #[test]
    fn high_fill_rate_is_1a() {
        let rows = vec![row("ВЕТ-21", 5), row("ВЕТ-22", 5), row("ВЕТ-23", 0)];
        assert!(matches!(classify(&rows), BlockPattern::Pattern1a));
    }

    #[test]
    fn low_fill_rate_is_1b() {
        let rows = vec![row("ВЕТ-21", 5), row("ВЕТ-22", 0), row("ВЕТ-23", 0)];
        assert!(matches!(classify(&rows), BlockPattern::Pattern1b));
    }
}
