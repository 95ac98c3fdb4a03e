#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Canonical student result types shared across the markbook system.
//!
//! Every mark-sheet source (PDF text layer, OCR) normalizes its rows into
//! [`ResultRecord`]. The derived, never-persisted view types
//! ([`StudentAggregate`], [`TableModel`]) and the arrears business rules
//! live here too so the parsing, persistence, and presentation crates all
//! agree on one vocabulary.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Department code applied to records when no deployment override is
/// configured.
pub const DEFAULT_DEPARTMENT: &str = "CT";

/// Rule deciding whether a subject result counts as an arrear.
///
/// Two rule sets exist across deployments: university mark sheets flag a
/// failed subject with the literal `FAIL`, while college-side sheets use
/// the reattempt codes `RA` (reappear) and `AA` (absent). The predicate is
/// always passed explicitly; nothing in the system hardcodes one rule.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ArrearsPolicy {
    /// A subject is an arrear when its result is exactly `FAIL`.
    FailOnly,
    /// A subject is an arrear when its result is `RA` or `AA`.
    Reattempt,
}

impl ArrearsPolicy {
    /// Returns whether an (already uppercased) result string counts as an
    /// arrear under this policy.
    #[must_use]
    pub fn counts(self, result: &str) -> bool {
        match self {
            Self::FailOnly => result == "FAIL",
            Self::Reattempt => matches!(result, "RA" | "AA"),
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::FailOnly, Self::Reattempt]
    }
}

/// Key used when folding flat result rows into per-student aggregates.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Grouping {
    /// One aggregate per registration number. When a student's rows span
    /// multiple semesters the last row's semester wins, matching the
    /// historical single-semester-batch behavior.
    Student,
    /// One aggregate per (registration number, semester) pair. Safe when a
    /// row list mixes semesters.
    #[default]
    StudentSemester,
}

/// Derives the year of study from a semester number (two semesters per
/// year, rounding up): semester 1 → year 1, semester 4 → year 2,
/// semester 7 → year 4.
#[must_use]
pub const fn year_for_semester(semester: i32) -> i32 {
    (semester + 1) / 2
}

/// Derives a subject code from a subject title: the uppercased first six
/// characters, or the whole uppercased title when shorter. No padding.
#[must_use]
pub fn subject_code_for_title(title: &str) -> String {
    title.chars().take(6).collect::<String>().to_uppercase()
}

/// A single per-subject result for one student, normalized from one
/// mark-sheet line.
///
/// `(regno, semester, subject_code)` is the natural key: re-ingesting the
/// same key updates marks and result in place rather than duplicating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    /// Student registration number (e.g. `CT001`).
    pub regno: String,
    /// Student name as printed on the sheet.
    pub name: String,
    /// Department code. Injected configuration, not parsed from the sheet.
    pub department: String,
    /// Year of study, derived from the semester.
    pub year: i32,
    /// Semester number (1-based).
    pub semester: i32,
    /// Derived subject code (≤ 6 characters, uppercase).
    pub subject_code: String,
    /// Subject title verbatim from the sheet.
    pub subject_title: String,
    /// Internal assessment marks.
    pub ia: i32,
    /// External assessment marks.
    pub ea: i32,
    /// Total marks.
    pub total: i32,
    /// Result marker, uppercased (`PASS`, `FAIL`, `RA`, `AA`, ...). Not
    /// validated against an enum since sheets vary.
    pub result: String,
}

/// A per-student pivoted view built fresh on every read. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAggregate {
    /// Student registration number.
    pub regno: String,
    /// Student name from the first row seen for this student.
    pub name: String,
    /// Semester this aggregate covers (see [`Grouping`]).
    pub semester: i32,
    /// Subject title → display cell `"{total} ({result})"`, in
    /// first-appearance order.
    pub subjects: IndexMap<String, String>,
    /// Number of subjects matching the arrears predicate.
    pub arrears: usize,
}

/// Display model handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum TableModel {
    /// Nothing to show. Render an informational message, not an empty
    /// header and body.
    NoData,
    /// A pivoted table: `header` is `Reg No`, `Name`, `Semester`, one
    /// column per subject title, `Arrears`; each row is one aggregate.
    Table {
        /// Ordered column titles.
        header: Vec<String>,
        /// Ordered display rows, one cell per header column.
        rows: Vec<Vec<String>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_rounds_up_from_semester() {
        assert_eq!(year_for_semester(1), 1);
        assert_eq!(year_for_semester(2), 1);
        assert_eq!(year_for_semester(4), 2);
        assert_eq!(year_for_semester(7), 4);
    }

    #[test]
    fn subject_code_is_uppercased_prefix() {
        assert_eq!(subject_code_for_title("CS8491 Computer Arch"), "CS8491");
        assert_eq!(subject_code_for_title("dbms"), "DBMS");
        assert_eq!(subject_code_for_title(""), "");
    }

    #[test]
    fn subject_code_never_exceeds_six_chars() {
        let code = subject_code_for_title("Mathematics");
        assert_eq!(code.chars().count(), 6);
        assert!("MATHEMATICS".starts_with(&code));
    }

    #[test]
    fn fail_only_policy_matches_fail_marker() {
        assert!(ArrearsPolicy::FailOnly.counts("FAIL"));
        assert!(!ArrearsPolicy::FailOnly.counts("RA"));
        assert!(!ArrearsPolicy::FailOnly.counts("PASS"));
    }

    #[test]
    fn reattempt_policy_matches_ra_and_aa() {
        assert!(ArrearsPolicy::Reattempt.counts("RA"));
        assert!(ArrearsPolicy::Reattempt.counts("AA"));
        assert!(!ArrearsPolicy::Reattempt.counts("FAIL"));
        assert!(!ArrearsPolicy::Reattempt.counts("PASS"));
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!(
            "fail_only".parse::<ArrearsPolicy>().unwrap(),
            ArrearsPolicy::FailOnly
        );
        assert_eq!(
            "REATTEMPT".parse::<ArrearsPolicy>().unwrap(),
            ArrearsPolicy::Reattempt
        );
    }

    #[test]
    fn grouping_defaults_to_student_semester() {
        assert_eq!(Grouping::default(), Grouping::StudentSemester);
    }
}
