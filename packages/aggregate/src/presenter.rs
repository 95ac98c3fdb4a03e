//! Builds the display table model from student aggregates.
//!
//! Pure display-model construction: no knowledge of parsing or
//! persistence, unit-testable with literal aggregates.

use markbook_results_models::{StudentAggregate, TableModel};

/// Cell rendered when a student has no entry for a subject column.
pub const MISSING_MARK: &str = "-";

/// Fixed leading columns before the per-subject columns.
const LEADING_COLUMNS: [&str; 3] = ["Reg No", "Name", "Semester"];

/// Builds the pivoted display model.
///
/// The subject column set is the union of subject titles across all
/// aggregates, in first-seen order over the whole input (not alphabetical,
/// not per-student). An empty input yields [`TableModel::NoData`], never
/// an empty header and body.
#[must_use]
pub fn build_table(aggregates: &[StudentAggregate]) -> TableModel {
    if aggregates.is_empty() {
        return TableModel::NoData;
    }

    let mut subjects: Vec<&str> = Vec::new();
    for aggregate in aggregates {
        for title in aggregate.subjects.keys() {
            if !subjects.contains(&title.as_str()) {
                subjects.push(title);
            }
        }
    }

    let mut header: Vec<String> = LEADING_COLUMNS.iter().map(ToString::to_string).collect();
    header.extend(subjects.iter().map(ToString::to_string));
    header.push("Arrears".to_owned());

    let rows = aggregates
        .iter()
        .map(|aggregate| {
            let mut row = vec![
                aggregate.regno.clone(),
                aggregate.name.clone(),
                aggregate.semester.to_string(),
            ];
            for subject in &subjects {
                row.push(
                    aggregate
                        .subjects
                        .get(*subject)
                        .cloned()
                        .unwrap_or_else(|| MISSING_MARK.to_owned()),
                );
            }
            row.push(aggregate.arrears.to_string());
            row
        })
        .collect();

    TableModel::Table { header, rows }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;

    fn student(regno: &str, semester: i32, subjects: &[(&str, &str)], arrears: usize) -> StudentAggregate {
        StudentAggregate {
            regno: regno.to_owned(),
            name: format!("{regno} name"),
            semester,
            subjects: subjects
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect::<IndexMap<_, _>>(),
            arrears,
        }
    }

    #[test]
    fn empty_input_yields_no_data() {
        assert_eq!(build_table(&[]), TableModel::NoData);
    }

    #[test]
    fn header_unions_subjects_in_first_seen_order() {
        let aggregates = vec![
            student("CT001", 4, &[("DBMS", "80 (PASS)")], 0),
            student("CT002", 4, &[("OS", "60 (PASS)"), ("DBMS", "70 (PASS)")], 0),
        ];
        let TableModel::Table { header, .. } = build_table(&aggregates) else {
            panic!("expected a table");
        };
        assert_eq!(
            header,
            ["Reg No", "Name", "Semester", "DBMS", "OS", "Arrears"]
        );
    }

    #[test]
    fn missing_subject_renders_placeholder() {
        let aggregates = vec![
            student("CT001", 4, &[("DBMS", "80 (PASS)")], 0),
            student("CT002", 4, &[("OS", "30 (RA)")], 1),
        ];
        let TableModel::Table { rows, .. } = build_table(&aggregates) else {
            panic!("expected a table");
        };
        // Columns: Reg No, Name, Semester, DBMS, OS, Arrears
        assert_eq!(rows[0][4], MISSING_MARK);
        assert_eq!(rows[1][3], MISSING_MARK);
        assert_eq!(rows[1][4], "30 (RA)");
        assert_eq!(rows[1][5], "1");
    }

    #[test]
    fn rows_follow_aggregate_order() {
        let aggregates = vec![
            student("CT002", 4, &[("DBMS", "70 (PASS)")], 0),
            student("CT001", 4, &[("DBMS", "80 (PASS)")], 0),
        ];
        let TableModel::Table { rows, .. } = build_table(&aggregates) else {
            panic!("expected a table");
        };
        assert_eq!(rows[0][0], "CT002");
        assert_eq!(rows[1][0], "CT001");
    }
}
