//! Raw row validation and [`ResultRecord`] construction.
//!
//! The historical behavior coerced numeric fields loosely and let NaN
//! markers flow into storage. Here every numeric field is validated
//! explicitly: a field that fails to parse rejects that single line with a
//! typed [`LineSkip`] reason and the rest of the batch continues.

use markbook_results_models::{ResultRecord, subject_code_for_title, year_for_semester};

use crate::RawRow;

/// Reason a structurally valid line was rejected during normalization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineSkip {
    /// The semester field is not a positive integer.
    #[error("semester {0:?} is not a positive integer")]
    Semester(String),

    /// A marks field is not an integer.
    #[error("{field} marks {value:?} are not an integer")]
    Marks {
        /// Which field failed (`ia`, `ea`, or `total`).
        field: &'static str,
        /// The offending value.
        value: String,
    },
}

/// A line rejected by the normalizer, with its position in the parsed
/// row list and the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// Zero-based index into the parsed row list.
    pub index: usize,
    /// Why the line was rejected.
    pub reason: LineSkip,
}

/// Outcome of normalizing a batch of raw rows.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Records that validated, in source order.
    pub records: Vec<ResultRecord>,
    /// Lines rejected with their reasons.
    pub skipped: Vec<SkippedLine>,
}

/// Validates raw rows into [`ResultRecord`]s.
///
/// Pure: derived fields (year, subject code) are computed here and the
/// department comes from configuration, never from the sheet.
#[derive(Debug, Clone)]
pub struct Normalizer {
    department: String,
}

impl Normalizer {
    /// Creates a normalizer stamping `department` onto every record.
    #[must_use]
    pub fn new(department: impl Into<String>) -> Self {
        Self {
            department: department.into(),
        }
    }

    /// Normalizes one raw row.
    ///
    /// # Errors
    ///
    /// Returns [`LineSkip`] when the semester or a marks field fails
    /// integer validation. The caller skips the line and continues.
    pub fn normalize(&self, row: &RawRow) -> Result<ResultRecord, LineSkip> {
        let semester: i32 = row
            .semester
            .parse()
            .ok()
            .filter(|s| *s >= 1)
            .ok_or_else(|| LineSkip::Semester(row.semester.clone()))?;

        let ia = parse_marks("ia", &row.ia)?;
        let ea = parse_marks("ea", &row.ea)?;
        let total = parse_marks("total", &row.total)?;

        Ok(ResultRecord {
            regno: row.regno.clone(),
            name: row.name.clone(),
            department: self.department.clone(),
            year: year_for_semester(semester),
            semester,
            subject_code: subject_code_for_title(&row.subject_title),
            subject_title: row.subject_title.clone(),
            ia,
            ea,
            total,
            result: row.result.to_uppercase(),
        })
    }

    /// Normalizes a batch, collecting valid records and skip reasons.
    ///
    /// A rejected line never aborts the batch.
    #[must_use]
    pub fn normalize_all(&self, rows: &[RawRow]) -> NormalizedBatch {
        let mut batch = NormalizedBatch::default();

        for (index, row) in rows.iter().enumerate() {
            match self.normalize(row) {
                Ok(record) => batch.records.push(record),
                Err(reason) => {
                    log::warn!("Skipping line {index}: {reason}");
                    batch.skipped.push(SkippedLine { index, reason });
                }
            }
        }

        batch
    }
}

fn parse_marks(field: &'static str, value: &str) -> Result<i32, LineSkip> {
    value.parse().map_err(|_| LineSkip::Marks {
        field,
        value: value.to_owned(),
    })
}
