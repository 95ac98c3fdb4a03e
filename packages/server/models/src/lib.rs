#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! API request and response types for the markbook server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the database row types to allow independent evolution of the API
//! contract.

use markbook_database_models::ResultRow;
use markbook_results_models::TableModel;
use serde::{Deserialize, Serialize};

/// A per-subject result as returned by the flat query endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResultRow {
    /// Student registration number.
    pub regno: String,
    /// Student name.
    pub name: String,
    /// Department code.
    pub department: String,
    /// Year of study.
    pub year: i32,
    /// Semester number.
    pub semester: i32,
    /// Derived subject code.
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
}

impl From<ResultRow> for ApiResultRow {
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

/// Response from the upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUploadResponse {
    /// Whether the sheet was ingested.
    pub success: bool,
    /// Human-readable outcome, always present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Rows written, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records_stored: Option<u64>,
    /// Lines rejected by validation, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines_skipped: Option<usize>,
}

impl ApiUploadResponse {
    /// A successful upload with its accounting.
    #[must_use]
    pub const fn stored(records_stored: u64, lines_skipped: usize) -> Self {
        Self {
            success: true,
            message: None,
            records_stored: Some(records_stored),
            lines_skipped: Some(lines_skipped),
        }
    }

    /// A failed upload with its reason.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            records_stored: None,
            lines_skipped: None,
        }
    }
}

/// Response from the table endpoint: either the pivoted table or an
/// explicit no-data signal for the client to render as a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiTableResponse {
    /// Nothing to display.
    #[serde(rename_all = "camelCase")]
    NoData {
        /// Always `true`; lets the client branch without probing shapes.
        no_data: bool,
        /// Message to render in place of the table.
        message: String,
    },
    /// The pivoted table.
    #[serde(rename_all = "camelCase")]
    Table {
        /// Ordered column titles.
        header: Vec<String>,
        /// Ordered display rows.
        rows: Vec<Vec<String>>,
    },
}

impl From<TableModel> for ApiTableResponse {
    fn from(model: TableModel) -> Self {
        match model {
            TableModel::NoData => Self::NoData {
                no_data: true,
                message: "No data available".to_owned(),
            },
            TableModel::Table { header, rows } => Self::Table { header, rows },
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
