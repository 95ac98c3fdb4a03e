#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Database row types and query filter definitions.
//!
//! These represent data as stored in and read back from the results
//! table. They are distinct from the API response types in
//! `markbook_server_models` and the canonical domain types in
//! `markbook_results_models`.

use chrono::{DateTime, Utc};
use markbook_results_models::ResultRecord;
use serde::{Deserialize, Serialize};

/// A stored per-subject result row as retrieved from the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Primary key.
    pub id: i64,
    /// Student registration number.
    pub regno: String,
    /// Student name.
    pub name: String,
    /// Department code.
    pub department: String,
    /// Year of study (derived from semester at write time).
    pub year: i32,
    /// Semester number.
    pub semester: i32,
    /// Derived subject code (natural key component).
    pub subject_code: String,
    /// Subject title.
    pub subject_title: String,
    /// Internal assessment marks.
    pub ia: i32,
    /// External assessment marks.
    pub ea: i32,
    /// Total marks.
    pub total: i32,
    /// Result marker.
    pub result: String,
    /// When this row was last written by an upsert.
    pub updated_at: DateTime<Utc>,
}

impl From<ResultRow> for ResultRecord {
    fn from(row: ResultRow) -> Self {
        Self {
            regno: row.regno,
            name: row.name,
            department: row.department,
            year: row.year,
            semester: row.semester,
            subject_code: row.subject_code,
            subject_title: row.subject_title,
            ia: row.ia,
            ea: row.ea,
            total: row.total,
            result: row.result,
        }
    }
}

/// Optional equality filters for listing result rows.
///
/// All filters are conjunctive; an empty filter lists everything. Rows
/// always come back ordered by `(regno, semester)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultFilter {
    /// Filter by derived year of study.
    pub year: Option<i32>,
    /// Filter by semester number.
    pub semester: Option<i32>,
    /// Filter by subject code (stored uppercase).
    pub subject_code: Option<String>,
}

impl ResultFilter {
    /// A filter matching every row.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            year: None,
            semester: None,
            subject_code: None,
        }
    }
}
