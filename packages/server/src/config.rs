//! Server configuration from environment variables.

use markbook_results_models::{ArrearsPolicy, DEFAULT_DEPARTMENT, Grouping};

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Path of the `SQLite` database file.
    pub database_path: String,
    /// Department code stamped onto ingested records.
    pub department: String,
    /// Which results count as arrears for this deployment.
    pub arrears_policy: ArrearsPolicy,
    /// How students are keyed when aggregating.
    pub grouping: Grouping,
    /// Maximum accepted upload size in bytes.
    pub upload_limit_bytes: usize,
}

impl ServerConfig {
    /// Builds the configuration from environment variables, falling back
    /// to defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let upload_limit_mb: usize = std::env::var("MARKBOOK_UPLOAD_LIMIT_MB")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/markbook.db".to_string()),
            department: std::env::var("MARKBOOK_DEPARTMENT")
                .unwrap_or_else(|_| DEFAULT_DEPARTMENT.to_string()),
            arrears_policy: std::env::var("MARKBOOK_ARREARS_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(ArrearsPolicy::Reattempt),
            grouping: std::env::var("MARKBOOK_GROUPING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            upload_limit_bytes: upload_limit_mb * 1024 * 1024,
        }
    }
}
