pub mod config;
pub mod connection;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod query_builder;
pub mod request_id;
pub mod types;

use std::sync::Arc;

use axum::{Extension, Router, middleware, routing::get};
use tower_http::catch_panic::CatchPanicLayer;
use utoipa::OpenApi;

use crate::{
    config::AppConfig,
    connection::ConnectionManager,
    database::Database,
    errors::panic_response,
    handlers::{
        __path_health_check, __path_top_start_stations, __path_trips_by_day,
        __path_trips_by_hour, __path_trips_by_hour_and_weekday, __path_trips_by_usertype,
        health_check, not_found, openapi_json, top_start_stations, trips_by_day, trips_by_hour,
        trips_by_hour_and_weekday, trips_by_usertype,
    },
    models::{
        DailySummary, HealthStatus, HourWeekdaySummary, HourlySummary, StationSummary,
        UserTypeSummary,
    },
    request_id::request_id_middleware,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Trips API", description = "Aggregated bicycle trip reports"),
    paths(
        health_check,
        trips_by_usertype,
        trips_by_hour,
        trips_by_day,
        top_start_stations,
        trips_by_hour_and_weekday,
    ),
    components(schemas(
        HealthStatus,
        UserTypeSummary,
        HourlySummary,
        DailySummary,
        StationSummary,
        HourWeekdaySummary,
    )),
    tags(
        (name = "health", description = "Service and database status"),
        (name = "trips", description = "Trip aggregation reports")
    )
)]
pub struct ApiDoc;

pub fn create_router(db: Database) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/trips/1.1", get(trips_by_usertype))
        .route("/api/trips/1.2", get(trips_by_hour))
        .route("/api/trips/1.3", get(trips_by_day))
        .route("/api/trips/1.4", get(top_start_stations))
        .route("/api/trips/1.5", get(trips_by_hour_and_weekday))
        .fallback(not_found)
        .layer(Extension(db))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(request_id_middleware))
}

pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let manager = ConnectionManager::new(config.mongo);
    let app = create_router(Database::new(Arc::new(manager)));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!("Server running on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
