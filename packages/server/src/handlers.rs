//! HTTP handler functions for the markbook API.

use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures::TryStreamExt as _;
use markbook_aggregate::{AggregateOptions, aggregate, presenter, regnos_with_arrears};
use markbook_database::queries;
use markbook_database_models::ResultFilter;
use markbook_ingest::IngestConfig;
use markbook_results_models::ResultRecord;
use markbook_server_models::{ApiHealth, ApiResultRow, ApiTableResponse, ApiUploadResponse};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/ocr/upload`
///
/// Accepts one file in a multipart form, runs the ingest pipeline, and
/// reports the outcome. Pipeline failures respond `200` with
/// `success=false` and a message naming the failure; the client renders
/// the message as-is.
pub async fn upload(state: web::Data<AppState>, mut payload: Multipart) -> HttpResponse {
    let limit = state.config.upload_limit_bytes;
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let mime = field.content_type().map(ToString::to_string);
        let mut bytes: Vec<u8> = Vec::new();

        loop {
            match field.try_next().await {
                Ok(Some(chunk)) => {
                    if bytes.len() + chunk.len() > limit {
                        return HttpResponse::Ok().json(ApiUploadResponse::failed(format!(
                            "File exceeds the {} MB upload limit",
                            limit / (1024 * 1024),
                        )));
                    }
                    bytes.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    log::error!("Failed to read upload: {e}");
                    return HttpResponse::BadRequest()
                        .json(ApiUploadResponse::failed("Failed to read the upload"));
                }
            }
        }

        upload = Some((mime, bytes));
        break;
    }

    let Some((mime, bytes)) = upload else {
        return HttpResponse::Ok().json(ApiUploadResponse::failed("No file found in the upload"));
    };

    if bytes.is_empty() {
        return HttpResponse::Ok().json(ApiUploadResponse::failed("Uploaded file is empty"));
    }

    let pool = Arc::clone(&state.pool);
    let ingest_config = IngestConfig {
        department: state.config.department.clone(),
        ..IngestConfig::default()
    };

    let outcome = web::block(move || {
        let conn = pool.acquire();
        markbook_ingest::ingest_marksheet(&conn, &bytes, mime.as_deref(), &ingest_config)
    })
    .await;

    match outcome {
        Ok(Ok(summary)) => HttpResponse::Ok().json(ApiUploadResponse::stored(
            summary.records_stored,
            summary.lines_skipped,
        )),
        Ok(Err(e)) => {
            log::warn!("Upload rejected: {e}");
            HttpResponse::Ok().json(ApiUploadResponse::failed(e.to_string()))
        }
        Err(e) => {
            log::error!("Upload task failed: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Upload processing failed"
            }))
        }
    }
}

/// `GET /api/results`
pub async fn results(state: web::Data<AppState>) -> HttpResponse {
    list_with_filter(&state, ResultFilter::all()).await
}

/// `GET /api/results/year/{year}`
pub async fn results_by_year(state: web::Data<AppState>, path: web::Path<i32>) -> HttpResponse {
    list_with_filter(
        &state,
        ResultFilter {
            year: Some(path.into_inner()),
            ..ResultFilter::all()
        },
    )
    .await
}

/// `GET /api/results/semester/{semester}`
pub async fn results_by_semester(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> HttpResponse {
    list_with_filter(
        &state,
        ResultFilter {
            semester: Some(path.into_inner()),
            ..ResultFilter::all()
        },
    )
    .await
}

/// `GET /api/results/subject/{code}`
///
/// Subject codes are stored uppercase; the path segment is matched
/// case-insensitively.
pub async fn results_by_subject(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    list_with_filter(
        &state,
        ResultFilter {
            subject_code: Some(path.into_inner().to_uppercase()),
            ..ResultFilter::all()
        },
    )
    .await
}

/// `GET /api/results/arrears/{count}`
///
/// Returns the flat rows of students whose aggregate arrears count equals
/// `count` under the deployment's configured policy.
pub async fn results_by_arrears(
    state: web::Data<AppState>,
    path: web::Path<usize>,
) -> HttpResponse {
    let count = path.into_inner();
    let options = AggregateOptions {
        policy: state.config.arrears_policy,
        grouping: state.config.grouping,
    };

    let pool = Arc::clone(&state.pool);
    let outcome = web::block(move || {
        let conn = pool.acquire();
        queries::list_results(&conn, &ResultFilter::all())
    })
    .await;

    match outcome {
        Ok(Ok(rows)) => {
            let records: Vec<ResultRecord> =
                rows.iter().cloned().map(ResultRecord::from).collect();
            let regnos = regnos_with_arrears(&records, &options, count);

            let matching: Vec<ApiResultRow> = rows
                .into_iter()
                .filter(|row| regnos.contains(&row.regno))
                .map(ApiResultRow::from)
                .collect();

            HttpResponse::Ok().json(matching)
        }
        Ok(Err(e)) => query_failure(&e),
        Err(e) => blocking_failure(&e),
    }
}

/// `GET /api/results/table`
///
/// The server-side pivot: aggregates every stored row under the
/// configured policy and grouping and returns the display model.
pub async fn results_table(state: web::Data<AppState>) -> HttpResponse {
    let options = AggregateOptions {
        policy: state.config.arrears_policy,
        grouping: state.config.grouping,
    };

    let pool = Arc::clone(&state.pool);
    let outcome = web::block(move || {
        let conn = pool.acquire();
        queries::list_results(&conn, &ResultFilter::all())
    })
    .await;

    match outcome {
        Ok(Ok(rows)) => {
            let records: Vec<ResultRecord> =
                rows.into_iter().map(ResultRecord::from).collect();
            let aggregates = aggregate(&records, &options);
            let model = presenter::build_table(&aggregates);

            HttpResponse::Ok().json(ApiTableResponse::from(model))
        }
        Ok(Err(e)) => query_failure(&e),
        Err(e) => blocking_failure(&e),
    }
}

async fn list_with_filter(state: &web::Data<AppState>, filter: ResultFilter) -> HttpResponse {
    let pool = Arc::clone(&state.pool);
    let outcome = web::block(move || {
        let conn = pool.acquire();
        queries::list_results(&conn, &filter)
    })
    .await;

    match outcome {
        Ok(Ok(rows)) => {
            let api_rows: Vec<ApiResultRow> = rows.into_iter().map(ApiResultRow::from).collect();
            HttpResponse::Ok().json(api_rows)
        }
        Ok(Err(e)) => query_failure(&e),
        Err(e) => blocking_failure(&e),
    }
}

fn query_failure(e: &markbook_database::DbError) -> HttpResponse {
    log::error!("Failed to query results: {e}");
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Failed to query results"
    }))
}

fn blocking_failure(e: &actix_web::error::BlockingError) -> HttpResponse {
    log::error!("Blocking task failed: {e}");
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Internal server error"
    }))
}
