//! Round-robin pool of `SQLite` connections.
//!
//! `rusqlite::Connection` is `Send` but not `Sync`, so each connection is
//! wrapped in a `Mutex`. The pool hands out connections round-robin via
//! an atomic counter, allowing concurrent queries on different
//! connections. WAL journaling lets readers proceed alongside a writer.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use rusqlite::Connection;

use crate::{DbError, connect, run_migrations};

/// A fixed-size pool of `Mutex`-wrapped connections to one database file.
pub struct SqlitePool {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl SqlitePool {
    /// Opens `size` connections to the `SQLite` file at `path` and runs
    /// pending migrations on the first of them.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a connection fails to open or migrations
    /// fail to apply.
    ///
    /// # Panics
    ///
    /// Panics if a freshly created `Mutex` is poisoned, which cannot
    /// happen.
    pub fn open(path: &str, size: usize) -> Result<Self, DbError> {
        let mut connections = Vec::with_capacity(size.max(1));
        for _ in 0..size.max(1) {
            connections.push(Mutex::new(connect(path)?));
        }

        {
            let conn = connections[0]
                .lock()
                .expect("SQLite pool mutex poisoned");
            run_migrations(&conn)?;
        }

        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
        })
    }

    /// Acquires the next connection from the pool (round-robin).
    ///
    /// # Panics
    ///
    /// Panics if the `Mutex` is poisoned.
    pub fn acquire(&self) -> std::sync::MutexGuard<'_, Connection> {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        self.connections[idx]
            .lock()
            .expect("SQLite pool mutex poisoned")
    }
}

impl std::fmt::Debug for SqlitePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlitePool")
            .field("size", &self.connections.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_visible_across_pooled_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.db");
        let pool = SqlitePool::open(path.to_str().unwrap(), 2).unwrap();

        pool.acquire()
            .execute(
                "INSERT INTO __markbook_migrations (name, applied_at) VALUES ('marker', '2026-01-01')",
                [],
            )
            .unwrap();

        // The next acquire lands on the other connection.
        let count: i64 = pool
            .acquire()
            .query_row(
                "SELECT COUNT(*) FROM __markbook_migrations WHERE name = 'marker'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
