#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the markbook results application.
//!
//! Serves the upload endpoint, the flat result queries, the server-side
//! pivoted table, and the static browser client.

mod config;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use markbook_database::pool::SqlitePool;

use crate::config::ServerConfig;

/// Number of pooled `SQLite` connections.
const DB_POOL_SIZE: usize = 4;

/// Shared application state.
pub struct AppState {
    /// Database connection pool.
    pub pool: Arc<SqlitePool>,
    /// Deployment configuration.
    pub config: ServerConfig,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ServerConfig::from_env();

    if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    log::info!("Opening database at {}", config.database_path);
    let pool = SqlitePool::open(&config.database_path, DB_POOL_SIZE)
        .expect("Failed to open database");

    let state = web::Data::new(AppState {
        pool: Arc::new(pool),
        config: config.clone(),
    });

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/ocr/upload", web::post().to(handlers::upload))
                    .route("/results", web::get().to(handlers::results))
                    .route("/results/table", web::get().to(handlers::results_table))
                    .route(
                        "/results/year/{year}",
                        web::get().to(handlers::results_by_year),
                    )
                    .route(
                        "/results/semester/{semester}",
                        web::get().to(handlers::results_by_semester),
                    )
                    .route(
                        "/results/subject/{code}",
                        web::get().to(handlers::results_by_subject),
                    )
                    .route(
                        "/results/arrears/{count}",
                        web::get().to(handlers::results_by_arrears),
                    ),
            )
            // Serve the browser client
            .service(Files::new("/", "app").index_file("index.html"))
    })
    .bind((config.bind_addr.clone(), config.port))?
    .run()
    .await
}
