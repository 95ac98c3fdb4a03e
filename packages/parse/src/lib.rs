#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Turns raw extracted mark-sheet text into typed result records.
//!
//! Parsing happens in two stages. The line parser ([`parse_rows`]) splits
//! the text into [`RawRow`]s, dropping blank lines and lines that do not
//! carry the expected eight fields; a malformed or noise line contributes
//! nothing and never aborts the batch. The [`normalize::Normalizer`] then
//! validates each raw row into a
//! [`markbook_results_models::ResultRecord`], rejecting individual lines
//! with a typed reason when a numeric field does not parse.

pub mod normalize;
pub mod pattern;
pub mod tokens;

/// Minimum number of whitespace-separated fields a mark-sheet line must
/// carry: regno, name, semester, subject title, IA, EA, total, result.
pub const MIN_FIELDS: usize = 8;

/// Errors specific to row parsing.
///
/// Malformed *lines* are not errors, they are skipped. Only a broken
/// parser configuration surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The configured row pattern failed to compile.
    #[error("Invalid row pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The configured row pattern is missing a required named group.
    #[error("Row pattern is missing named group '{0}'")]
    MissingGroup(&'static str),
}

/// Strategy for splitting one line of extracted text into fields.
#[derive(Debug, Clone)]
pub enum RowFormat {
    /// Split on runs of whitespace and read fields by position. This is
    /// the documented mark-sheet layout and the default. Brittle under
    /// multi-word names; see [`RowFormat::Pattern`] for noisy sources.
    Positional,

    /// Match each line against a regex with the named groups `regno`,
    /// `name`, `semester`, `subject`, `ia`, `ea`, `total`, and `result`.
    Pattern {
        /// Regex pattern with the eight named groups.
        pattern: String,
    },
}

impl Default for RowFormat {
    fn default() -> Self {
        Self::Positional
    }
}

/// One structurally valid mark-sheet line, fields still unvalidated.
///
/// Transient; discarded once normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// Registration number field.
    pub regno: String,
    /// Name field.
    pub name: String,
    /// Semester field (not yet parsed as a number).
    pub semester: String,
    /// Subject title field.
    pub subject_title: String,
    /// Internal assessment field.
    pub ia: String,
    /// External assessment field.
    pub ea: String,
    /// Total marks field.
    pub total: String,
    /// Result marker field.
    pub result: String,
}

/// Parses extracted text into raw rows using the given format.
///
/// Lines are split on newlines and trimmed; blank lines and lines that do
/// not match the format are dropped silently. Row order follows order of
/// appearance in the text.
///
/// # Errors
///
/// Returns [`ParseError`] if a [`RowFormat::Pattern`] regex is invalid or
/// missing a required group. [`RowFormat::Positional`] never errors.
pub fn parse_rows(text: &str, format: &RowFormat) -> Result<Vec<RawRow>, ParseError> {
    match format {
        RowFormat::Positional => Ok(tokens::parse(text)),
        RowFormat::Pattern { pattern } => pattern::parse(text, pattern),
    }
}
