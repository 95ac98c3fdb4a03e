#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! `SQLite` connection pool, queries, and migrations for markbook.
//!
//! Persistence is a thin gateway: an idempotent upsert keyed by
//! `(regno, semester, subject_code)` and an ordered select. Migrations are
//! embedded from the `migrations/` directory and applied at startup,
//! tracked in a `__markbook_migrations` table.

pub mod pool;
pub mod queries;

use include_dir::{Dir, include_dir};
use rusqlite::Connection;

/// Embedded SQL migrations from the `migrations/` directory.
static MIGRATIONS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/../../migrations");

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Migration error.
    #[error("Migration error: {message}")]
    Migration {
        /// Description of what went wrong.
        message: String,
    },
}

/// Opens a connection to the `SQLite` file at `path`, applying the
/// standard pragmas (WAL journaling, normal synchronous).
///
/// # Errors
///
/// Returns [`DbError`] if the file cannot be opened or a pragma fails.
pub fn connect(path: &str) -> Result<Connection, DbError> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(conn)
}

/// Runs all pending database migrations on `conn`.
///
/// Migrations apply in file-name order; each applied migration is
/// recorded and never re-applied.
///
/// # Errors
///
/// Returns [`DbError`] if any migration fails to apply.
pub fn run_migrations(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS __markbook_migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL
        )",
    )?;

    let mut files: Vec<_> = MIGRATIONS_DIR.files().collect();
    files.sort_by(|a, b| a.path().cmp(b.path()));

    for file in files {
        let name = file.path().to_string_lossy();

        let applied: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM __markbook_migrations WHERE name = ?1)",
            [name.as_ref()],
            |row| row.get(0),
        )?;
        if applied {
            continue;
        }

        let sql = file.contents_utf8().ok_or_else(|| DbError::Migration {
            message: format!("migration {name} is not valid UTF-8"),
        })?;
        conn.execute_batch(sql)?;
        conn.execute(
            "INSERT INTO __markbook_migrations (name, applied_at) VALUES (?1, ?2)",
            rusqlite::params![name.as_ref(), chrono::Utc::now()],
        )?;

        log::info!("Applied migration {name}");
    }

    Ok(())
}
