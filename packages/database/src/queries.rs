//! Query functions for the results table.
//!
//! Writes are idempotent upserts on the natural key; reads come back
//! ordered by `(regno, semester)` so aggregation and table rendering stay
//! deterministic across uploads.

use std::fmt::Write as _;

use chrono::Utc;
use markbook_database_models::{ResultFilter, ResultRow};
use markbook_results_models::ResultRecord;
use rusqlite::{Connection, params};

use crate::DbError;

/// Inserts or updates a batch of result records.
///
/// Each record is one `INSERT ... ON CONFLICT DO UPDATE` statement keyed
/// by `(regno, semester, subject_code)`; re-ingesting a key updates the
/// marks, result, and `updated_at` in place. Returns the number of rows
/// written.
///
/// # Errors
///
/// Returns [`DbError`] if any statement fails.
pub fn upsert_results(conn: &Connection, records: &[ResultRecord]) -> Result<u64, DbError> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO results (
            regno, name, department, year, semester,
            subject_code, subject_title, ia, ea, total, result, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        ON CONFLICT (regno, semester, subject_code) DO UPDATE SET
            name = excluded.name,
            department = excluded.department,
            year = excluded.year,
            subject_title = excluded.subject_title,
            ia = excluded.ia,
            ea = excluded.ea,
            total = excluded.total,
            result = excluded.result,
            updated_at = excluded.updated_at",
    )?;

    let mut written = 0u64;

    for record in records {
        let changed = stmt.execute(params![
            record.regno,
            record.name,
            record.department,
            record.year,
            record.semester,
            record.subject_code,
            record.subject_title,
            record.ia,
            record.ea,
            record.total,
            record.result,
            Utc::now(),
        ])?;
        written += u64::try_from(changed).unwrap_or(0);
    }

    Ok(written)
}

/// Lists result rows matching `filter`, ordered by `(regno, semester)`.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn list_results(conn: &Connection, filter: &ResultFilter) -> Result<Vec<ResultRow>, DbError> {
    let mut sql = String::from(
        "SELECT id, regno, name, department, year, semester,
                subject_code, subject_title, ia, ea, total, result, updated_at
         FROM results
         WHERE 1=1",
    );

    let mut values: Vec<rusqlite::types::Value> = Vec::new();
    let mut param_idx = 1u32;

    if let Some(year) = filter.year {
        write!(sql, " AND year = ?{param_idx}").unwrap();
        values.push(year.into());
        param_idx += 1;
    }

    if let Some(semester) = filter.semester {
        write!(sql, " AND semester = ?{param_idx}").unwrap();
        values.push(semester.into());
        param_idx += 1;
    }

    if let Some(subject_code) = &filter.subject_code {
        write!(sql, " AND subject_code = ?{param_idx}").unwrap();
        values.push(subject_code.clone().into());
    }

    sql.push_str(" ORDER BY regno, semester");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(values), |row| {
        Ok(ResultRow {
            id: row.get(0)?,
            regno: row.get(1)?,
            name: row.get(2)?,
            department: row.get(3)?,
            year: row.get(4)?,
            semester: row.get(5)?,
            subject_code: row.get(6)?,
            subject_title: row.get(7)?,
            ia: row.get(8)?,
            ea: row.get(9)?,
            total: row.get(10)?,
            result: row.get(11)?,
            updated_at: row.get(12)?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_migrations;

    fn record(regno: &str, semester: i32, subject: &str, total: i32, result: &str) -> ResultRecord {
        ResultRecord {
            regno: regno.to_owned(),
            name: "Sriram".to_owned(),
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

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn upsert_same_key_keeps_one_row_with_latest_values() {
        let conn = test_conn();

        upsert_results(&conn, &[record("CT001", 4, "DBMS", 30, "RA")]).unwrap();
        upsert_results(&conn, &[record("CT001", 4, "DBMS", 80, "PASS")]).unwrap();

        let rows = list_results(&conn, &ResultFilter::all()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total, 80);
        assert_eq!(rows[0].result, "PASS");
    }

    #[test]
    fn distinct_subjects_do_not_collide() {
        let conn = test_conn();

        let written = upsert_results(
            &conn,
            &[
                record("CT001", 4, "DBMS", 80, "PASS"),
                record("CT001", 4, "OS", 30, "FAIL"),
            ],
        )
        .unwrap();

        assert_eq!(written, 2);
        assert_eq!(list_results(&conn, &ResultFilter::all()).unwrap().len(), 2);
    }

    #[test]
    fn lists_ordered_by_regno_then_semester() {
        let conn = test_conn();

        upsert_results(
            &conn,
            &[
                record("CT002", 4, "DBMS", 70, "PASS"),
                record("CT001", 5, "MATHS", 60, "PASS"),
                record("CT001", 4, "DBMS", 80, "PASS"),
            ],
        )
        .unwrap();

        let rows = list_results(&conn, &ResultFilter::all()).unwrap();
        let keys: Vec<(&str, i32)> = rows
            .iter()
            .map(|r| (r.regno.as_str(), r.semester))
            .collect();
        assert_eq!(keys, [("CT001", 4), ("CT001", 5), ("CT002", 4)]);
    }

    #[test]
    fn filters_compose_conjunctively() {
        let conn = test_conn();

        upsert_results(
            &conn,
            &[
                record("CT001", 4, "DBMS", 80, "PASS"),
                record("CT001", 5, "MATHS", 60, "PASS"),
                record("CT002", 4, "DBMS", 70, "PASS"),
            ],
        )
        .unwrap();

        let by_semester = list_results(
            &conn,
            &ResultFilter {
                semester: Some(4),
                ..ResultFilter::all()
            },
        )
        .unwrap();
        assert_eq!(by_semester.len(), 2);

        let by_year = list_results(
            &conn,
            &ResultFilter {
                year: Some(3),
                ..ResultFilter::all()
            },
        )
        .unwrap();
        assert_eq!(by_year.len(), 1);
        assert_eq!(by_year[0].subject_code, "MATHS");

        let by_subject = list_results(
            &conn,
            &ResultFilter {
                subject_code: Some("DBMS".to_owned()),
                ..ResultFilter::all()
            },
        )
        .unwrap();
        assert_eq!(by_subject.len(), 2);
    }
}
