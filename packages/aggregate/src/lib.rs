#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Folds flat per-subject result rows into per-student aggregates.
//!
//! Pure functions of their input: no I/O, no clock, no global policy. The
//! arrears predicate and the grouping key are explicit parameters so both
//! deployment rule sets (and future ones) are testable in isolation. The
//! output order always follows first appearance in the input, keeping
//! table rendering stable across repeated reads.

pub mod presenter;

use indexmap::IndexMap;
use markbook_results_models::{ArrearsPolicy, Grouping, ResultRecord, StudentAggregate};

/// Options controlling a single aggregation pass.
///
/// There is deliberately no `Default`: the arrears predicate differs
/// between deployments and every caller must name the one it wants.
#[derive(Debug, Clone, Copy)]
pub struct AggregateOptions {
    /// Which results count as arrears.
    pub policy: ArrearsPolicy,
    /// How students are keyed.
    pub grouping: Grouping,
}

impl AggregateOptions {
    /// Creates options with an explicit arrears policy and the default
    /// grouping.
    #[must_use]
    pub const fn with_policy(policy: ArrearsPolicy) -> Self {
        Self {
            policy,
            grouping: Grouping::StudentSemester,
        }
    }
}

/// Groups a flat row list into [`StudentAggregate`]s.
///
/// Under [`Grouping::Student`] the first row for a registration number
/// initializes the aggregate's name and semester and every later row
/// overwrites the semester (last write wins in input order) without
/// touching the name. Under [`Grouping::StudentSemester`] the semester is
/// part of the key, so rows spanning semesters produce separate
/// aggregates.
///
/// A later duplicate `(key, subject_title)` pair overwrites the earlier
/// pivot cell. The persistence key should prevent duplicates, but the
/// aggregator does not assume that.
#[must_use]
pub fn aggregate(rows: &[ResultRecord], options: &AggregateOptions) -> Vec<StudentAggregate> {
    let mut groups: IndexMap<(String, Option<i32>), StudentAggregate> = IndexMap::new();

    for row in rows {
        let key = match options.grouping {
            Grouping::Student => (row.regno.clone(), None),
            Grouping::StudentSemester => (row.regno.clone(), Some(row.semester)),
        };

        let entry = groups.entry(key).or_insert_with(|| StudentAggregate {
            regno: row.regno.clone(),
            name: row.name.clone(),
            semester: row.semester,
            subjects: IndexMap::new(),
            arrears: 0,
        });

        entry.semester = row.semester;
        entry
            .subjects
            .insert(row.subject_title.clone(), format!("{} ({})", row.total, row.result));

        if options.policy.counts(&row.result) {
            entry.arrears += 1;
        }
    }

    groups.into_values().collect()
}

/// Returns the registration numbers of students whose aggregate arrears
/// count equals `count`, in first-appearance order, deduplicated.
#[must_use]
pub fn regnos_with_arrears(
    rows: &[ResultRecord],
    options: &AggregateOptions,
    count: usize,
) -> Vec<String> {
    let mut regnos = Vec::new();

    for student in aggregate(rows, options) {
        if student.arrears == count && !regnos.contains(&student.regno) {
            regnos.push(student.regno);
        }
    }

    regnos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(regno: &str, name: &str, semester: i32, subject: &str, total: i32, result: &str) -> ResultRecord {
        ResultRecord {
            regno: regno.to_owned(),
            name: name.to_owned(),
            department: "CT".to_owned(),
            year: markbook_results_models::year_for_semester(semester),
            semester,
            subject_code: markbook_results_models::subject_code_for_title(subject),
            subject_title: subject.to_owned(),
            ia: 20,
            ea: total - 20,
            total,
            result: result.to_owned(),
        }
    }

    #[test]
    fn pivots_subjects_and_counts_arrears() {
        let rows = vec![
            row("CT001", "Sriram", 4, "DBMS", 80, "PASS"),
            row("CT001", "Sriram", 4, "OS", 30, "FAIL"),
        ];
        let aggregates = aggregate(
            &rows,
            &AggregateOptions::with_policy(ArrearsPolicy::FailOnly),
        );

        assert_eq!(aggregates.len(), 1);
        let student = &aggregates[0];
        assert_eq!(student.regno, "CT001");
        assert_eq!(student.subjects["DBMS"], "80 (PASS)");
        assert_eq!(student.subjects["OS"], "30 (FAIL)");
        assert_eq!(student.arrears, 1);
    }

    #[test]
    fn order_follows_first_appearance() {
        let rows = vec![
            row("CT002", "Priya", 4, "DBMS", 70, "PASS"),
            row("CT001", "Sriram", 4, "DBMS", 80, "PASS"),
            row("CT002", "Priya", 4, "OS", 60, "PASS"),
        ];
        let aggregates = aggregate(
            &rows,
            &AggregateOptions::with_policy(ArrearsPolicy::FailOnly),
        );
        let regnos: Vec<&str> = aggregates.iter().map(|a| a.regno.as_str()).collect();
        assert_eq!(regnos, ["CT002", "CT001"]);
    }

    #[test]
    fn later_duplicate_subject_overwrites_earlier() {
        let rows = vec![
            row("CT001", "Sriram", 4, "DBMS", 30, "RA"),
            row("CT001", "Sriram", 4, "DBMS", 80, "PASS"),
        ];
        let aggregates = aggregate(
            &rows,
            &AggregateOptions::with_policy(ArrearsPolicy::Reattempt),
        );
        assert_eq!(aggregates[0].subjects["DBMS"], "80 (PASS)");
        assert_eq!(aggregates[0].subjects.len(), 1);
    }

    #[test]
    fn student_grouping_takes_last_semester_but_first_name() {
        let rows = vec![
            row("CT001", "Sriram", 3, "DBMS", 80, "PASS"),
            row("CT001", "S.RAM", 4, "OS", 70, "PASS"),
        ];
        let options = AggregateOptions {
            policy: ArrearsPolicy::FailOnly,
            grouping: Grouping::Student,
        };
        let aggregates = aggregate(&rows, &options);
        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].name, "Sriram");
        assert_eq!(aggregates[0].semester, 4);
        assert_eq!(aggregates[0].subjects.len(), 2);
    }

    #[test]
    fn student_semester_grouping_splits_semesters() {
        let rows = vec![
            row("CT001", "Sriram", 3, "DBMS", 80, "PASS"),
            row("CT001", "Sriram", 4, "OS", 70, "PASS"),
        ];
        let aggregates = aggregate(
            &rows,
            &AggregateOptions::with_policy(ArrearsPolicy::FailOnly),
        );
        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].semester, 3);
        assert_eq!(aggregates[1].semester, 4);
    }

    #[test]
    fn policies_disagree_on_reattempt_codes() {
        let rows = vec![
            row("CT001", "Sriram", 4, "DBMS", 30, "RA"),
            row("CT001", "Sriram", 4, "OS", 25, "AA"),
            row("CT001", "Sriram", 4, "MATHS", 20, "FAIL"),
        ];
        let fail_only = aggregate(
            &rows,
            &AggregateOptions::with_policy(ArrearsPolicy::FailOnly),
        );
        let reattempt = aggregate(
            &rows,
            &AggregateOptions::with_policy(ArrearsPolicy::Reattempt),
        );
        assert_eq!(fail_only[0].arrears, 1);
        assert_eq!(reattempt[0].arrears, 2);
    }

    #[test]
    fn repeated_runs_are_deterministic() {
        let rows = vec![
            row("CT003", "Anu", 4, "DBMS", 80, "PASS"),
            row("CT001", "Sriram", 4, "OS", 30, "RA"),
        ];
        let options = AggregateOptions::with_policy(ArrearsPolicy::Reattempt);
        let first = aggregate(&rows, &options);
        let second = aggregate(&rows, &options);
        assert_eq!(first, second);
    }

    #[test]
    fn filters_regnos_by_exact_arrears_count() {
        let rows = vec![
            row("CT001", "Sriram", 4, "DBMS", 30, "RA"),
            row("CT002", "Priya", 4, "DBMS", 80, "PASS"),
            row("CT003", "Anu", 4, "DBMS", 25, "RA"),
            row("CT003", "Anu", 4, "OS", 20, "AA"),
        ];
        let options = AggregateOptions::with_policy(ArrearsPolicy::Reattempt);
        assert_eq!(regnos_with_arrears(&rows, &options, 1), ["CT001"]);
        assert_eq!(regnos_with_arrears(&rows, &options, 2), ["CT003"]);
        assert_eq!(regnos_with_arrears(&rows, &options, 0), ["CT002"]);
    }
}
