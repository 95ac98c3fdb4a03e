//! Named-group regex row parsing.
//!
//! For sources where positional splitting breaks down (multi-word names,
//! decorated OCR output) a row pattern with named capture groups can be
//! configured instead. Grounded on the same contract as the positional
//! parser: a non-matching line is skipped, never an error.

use regex::Regex;

use crate::{ParseError, RawRow};

/// The named groups every row pattern must define.
const REQUIRED_GROUPS: [&str; 8] = [
    "regno", "name", "semester", "subject", "ia", "ea", "total", "result",
];

/// Parses each non-blank line by matching it against `pattern`.
///
/// # Errors
///
/// Returns [`ParseError`] if the pattern does not compile or lacks one of
/// the required named groups.
pub fn parse(text: &str, pattern: &str) -> Result<Vec<RawRow>, ParseError> {
    let re = Regex::new(pattern)?;

    let group_names: Vec<&str> = re.capture_names().flatten().collect();
    for required in REQUIRED_GROUPS {
        if !group_names.contains(&required) {
            return Err(ParseError::MissingGroup(required));
        }
    }

    let mut rows = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(caps) = re.captures(line) else {
            log::debug!("Skipping line not matching row pattern: {line:?}");
            continue;
        };

        let field = |name: &str| caps.name(name).map_or("", |m| m.as_str()).to_owned();

        rows.push(RawRow {
            regno: field("regno"),
            name: field("name"),
            semester: field("semester"),
            subject_title: field("subject"),
            ia: field("ia"),
            ea: field("ea"),
            total: field("total"),
            result: field("result"),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATTERN: &str = concat!(
        r"(?P<regno>\S+)\s+(?P<name>.+?)\s+(?P<semester>\d+)\s+(?P<subject>\S+)\s+",
        r"(?P<ia>\d+)\s+(?P<ea>\d+)\s+(?P<total>\d+)\s+(?P<result>\S+)",
    );

    #[test]
    fn matching_line_produces_row() {
        let rows = parse("CT001 Sriram 4 DBMS 25 55 80 PASS", PATTERN).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject_title, "DBMS");
    }

    #[test]
    fn non_matching_line_is_skipped() {
        let rows = parse("page 2 of 3\nCT001 Sriram 4 DBMS 25 55 80 PASS", PATTERN).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(parse("x", "(unclosed").is_err());
    }
}
