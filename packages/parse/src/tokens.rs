//! Whitespace-positional row parsing.
//!
//! The documented mark-sheet layout is eight whitespace-separated fields
//! per line. OCR noise past the eighth field is ignored; a line with fewer
//! than eight fields is structurally invalid and dropped.

use crate::{MIN_FIELDS, RawRow};

/// Parses each non-blank line into a [`RawRow`] by field position.
///
/// Positions 0–7 map to regno, name, semester, subject title, IA, EA,
/// total, result. Lines with fewer than [`MIN_FIELDS`] tokens are skipped.
#[must_use]
pub fn parse(text: &str) -> Vec<RawRow> {
    let mut rows = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_FIELDS {
            log::debug!(
                "Skipping line with {} of {MIN_FIELDS} expected fields: {line:?}",
                fields.len()
            );
            continue;
        }

        rows.push(RawRow {
            regno: fields[0].to_owned(),
            name: fields[1].to_owned(),
            semester: fields[2].to_owned(),
            subject_title: fields[3].to_owned(),
            ia: fields[4].to_owned(),
            ea: fields[5].to_owned(),
            total: fields[6].to_owned(),
            result: fields[7].to_owned(),
        });
    }

    rows
}
