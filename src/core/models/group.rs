//! Group codes: parsing, language/year inference, and subgroup notation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::core::errors::SchedulerError;

/// Cyrillic letters used in Kazakh and Russian group codes, including the
/// Kazakh-specific letters not present in the Russian alphabet.
const CYRILLIC_CLASS: &str = "А-Яа-яЁёІіҚқҒғҢңӨөҰұҮүҺһӘәҮүІі";

static CORE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^([{CYRILLIC_CLASS}]+)-(\d)(\d)([{CYRILLIC_CLASS}])?( О)?")).unwrap()
});

static SUBGROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(/1/|/2/|\\1\\|\\2\\| -1$| -2$)").unwrap());

/// Study-language, inferred from a `/г/` or `/р/` marker in the raw group string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    /// Instruction in Kazakh (the default when no Russian marker is present).
    Kaz,
    /// Instruction in Russian (raw string contains `/г/` or `/р/`).
    Rus,
}

/// A parsed student group code, e.g. `ВЕТ-21` or `СТР-32/г/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCode {
    /// The group string exactly as it appeared in the workload sheet.
    pub raw: String,
    /// Leading Cyrillic specialty prefix (e.g. `ВЕТ`, `СТР`, `АРХ`).
    pub specialty_prefix: String,
    /// Year of study (1-5), taken from the second digit of the code.
    pub year: u8,
    /// Instruction language inferred from the raw string.
    pub language: Language,
}

impl GroupCode {
    /// Parse a raw group string from a workload sheet.
    ///
    /// The core shape `[Cyrillic]+-[digit][digit][letter?][ О]?` is matched at the
    /// start of the string; trailing subgroup/study-form annotations (`/1/`, `/г/`, …)
    /// are permitted and do not affect parsing of the core fields.
    ///
    /// # Errors
    /// Returns [`SchedulerError::InvalidGroupCode`] if the core shape is not found.
    pub fn parse(raw: &str) -> Result<Self, SchedulerError> {
        let trimmed = raw.trim();
        let caps = CORE_CODE_RE
            .captures(trimmed)
            .ok_or_else(|| SchedulerError::InvalidGroupCode(raw.to_string()))?;

        let specialty_prefix = caps[1].to_string();
        let year_digit = &caps[3];
        let year: u8 = year_digit
            .parse()
            .map_err(|_| SchedulerError::InvalidGroupCode(raw.to_string()))?;

        let language = if trimmed.contains("/г/") || trimmed.contains("/р/") {
            Language::Rus
        } else {
            Language::Kaz
        };

        Ok(Self {
            raw: raw.to_string(),
            specialty_prefix,
            year,
            language,
        })
    }

    /// Whether this group's raw string carries explicit subgroup notation:
    /// `/1/`, `/2/`, `\1\`, `\2\`, or a trailing ` -1`/` -2`.
    ///
    /// Study-form suffixes `/у/` and `/г/` are never subgroup markers even
    /// though they share the slash-delimited shape.
    #[must_use]
    pub fn is_subgroup_notation(raw: &str) -> bool {
        SUBGROUP_RE.is_match(raw)
    }
}
