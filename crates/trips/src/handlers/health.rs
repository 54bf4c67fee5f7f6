//! Health check, OpenAPI document and fallback handlers.

use axum::{Extension, http::StatusCode, response::Json};
use chrono::Utc;
use utoipa::OpenApi;

use crate::{ApiDoc, database::Database, errors::AppError, models::HealthStatus};

/// Reports whether the database answers a liveness check.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Database reachable", body = HealthStatus),
        (status = 503, description = "Database unreachable", body = HealthStatus)
    )
)]
pub async fn health_check(Extension(db): Extension<Database>) -> (StatusCode, Json<HealthStatus>) {
    match db.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthStatus::connected(Utc::now()))),
        Err(e) => {
            tracing::warn!("Health check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus::disconnected(Utc::now(), e.detail())),
            )
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
