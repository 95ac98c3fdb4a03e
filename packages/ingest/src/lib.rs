#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! The upload pipeline: extract → parse → normalize → persist.
//!
//! Runs end-to-end within one request. Per-line validation failures are
//! skipped and counted, never fatal; extraction and persistence failures
//! abort the whole upload and surface to the caller with enough shape to
//! tell "could not read the file" from "read it but found nothing usable"
//! from "could not save".

use markbook_extract::ExtractError;
use markbook_parse::{RowFormat, normalize::Normalizer, parse_rows};
use rusqlite::Connection;

/// Configuration injected into one ingest run.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Department code stamped onto every record.
    pub department: String,
    /// How mark-sheet lines are split into fields.
    pub row_format: RowFormat,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            department: markbook_results_models::DEFAULT_DEPARTMENT.to_owned(),
            row_format: RowFormat::Positional,
        }
    }
}

/// Accounting for a successful ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Rows written through the upsert.
    pub records_stored: u64,
    /// Structurally valid lines rejected by field validation.
    pub lines_skipped: usize,
}

/// Errors that abort an upload.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The upload is neither a PDF nor a supported image.
    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    /// The extraction engine could not read the file.
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// Text was extracted but no valid result line was found. Distinct
    /// from [`IngestError::Extraction`] so a bad scan is distinguishable
    /// from a wrong file type.
    #[error("No valid result lines found in the extracted text")]
    EmptyResult,

    /// The configured row format is broken.
    #[error(transparent)]
    Parse(#[from] markbook_parse::ParseError),

    /// Writing the records failed.
    #[error(transparent)]
    Persistence(#[from] markbook_database::DbError),
}

impl From<ExtractError> for IngestError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::UnsupportedMedia(mime) => Self::UnsupportedMedia(mime),
            other => Self::Extraction(other.to_string()),
        }
    }
}

/// Ingests one uploaded mark sheet.
///
/// # Errors
///
/// Returns [`IngestError`] when extraction, parsing configuration, or
/// persistence fails, or when the sheet yields zero valid records.
pub fn ingest_marksheet(
    conn: &Connection,
    bytes: &[u8],
    declared_mime: Option<&str>,
    config: &IngestConfig,
) -> Result<IngestSummary, IngestError> {
    log::info!(
        "Ingesting {} byte upload (declared media type: {})",
        bytes.len(),
        declared_mime.unwrap_or("none"),
    );

    let text = markbook_extract::extract(bytes, declared_mime)?;

    ingest_text(conn, &text, config)
}

/// Parses, normalizes, and persists already-extracted text.
///
/// Split out from [`ingest_marksheet`] so the record pipeline is testable
/// without an extraction engine.
///
/// # Errors
///
/// Returns [`IngestError`] on a broken row format, zero valid records, or
/// a persistence failure.
pub fn ingest_text(
    conn: &Connection,
    text: &str,
    config: &IngestConfig,
) -> Result<IngestSummary, IngestError> {
    let rows = parse_rows(text, &config.row_format)?;
    let batch = Normalizer::new(config.department.clone()).normalize_all(&rows);

    if batch.records.is_empty() {
        log::warn!(
            "Upload produced no valid records ({} structurally valid lines, {} skipped)",
            rows.len(),
            batch.skipped.len(),
        );
        return Err(IngestError::EmptyResult);
    }

    let records_stored = markbook_database::queries::upsert_results(conn, &batch.records)?;

    log::info!(
        "Stored {records_stored} records, skipped {} lines",
        batch.skipped.len(),
    );

    Ok(IngestSummary {
        records_stored,
        lines_skipped: batch.skipped.len(),
    })
}

#[cfg(test)]
mod tests {
    use markbook_database::run_migrations;

    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn ingests_well_formed_text() {
        let conn = test_conn();
        let text = "CT001 Sriram 4 DBMS 25 55 80 PASS\nCT002 Priya 4 OS 20 40 60 RA\n";

        let summary = ingest_text(&conn, text, &IngestConfig::default()).unwrap();

        assert_eq!(summary.records_stored, 2);
        assert_eq!(summary.lines_skipped, 0);
    }

    #[test]
    fn invalid_marks_skip_the_line_but_not_the_batch() {
        let conn = test_conn();
        let text = "CT001 Sriram 4 DBMS 25 55 80 PASS\nCT002 Priya 4 OS xx 40 60 RA\n";

        let summary = ingest_text(&conn, text, &IngestConfig::default()).unwrap();

        assert_eq!(summary.records_stored, 1);
        assert_eq!(summary.lines_skipped, 1);
    }

    #[test]
    fn six_token_only_upload_is_an_empty_result() {
        let conn = test_conn();

        let err = ingest_text(&conn, "CT001 Sriram 4 DBMS 25 55", &IngestConfig::default())
            .unwrap_err();

        assert!(matches!(err, IngestError::EmptyResult));
    }

    #[test]
    fn reingesting_updates_in_place() {
        let conn = test_conn();
        let config = IngestConfig::default();

        ingest_text(&conn, "CT001 Sriram 4 DBMS 20 10 30 RA", &config).unwrap();
        ingest_text(&conn, "CT001 Sriram 4 DBMS 25 55 80 PASS", &config).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM results", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);

        let result: String = conn
            .query_row("SELECT result FROM results", [], |row| row.get(0))
            .unwrap();
        assert_eq!(result, "PASS");
    }

    #[test]
    fn unsupported_media_is_its_own_error() {
        let conn = test_conn();

        let err = ingest_marksheet(
            &conn,
            b"plain text bytes",
            Some("text/plain"),
            &IngestConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, IngestError::UnsupportedMedia(_)));
    }
}
