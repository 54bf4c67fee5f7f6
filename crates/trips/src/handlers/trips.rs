//! Trip report handlers.

use axum::{Extension, extract::Query, response::Json};

use crate::{
    database::Database,
    errors::AppError,
    models::{DailySummary, HourWeekdaySummary, HourlySummary, StationSummary, UserTypeSummary},
    types::{HourQuery, HourWeekdayQuery, QueryPairs, StationLimitQuery},
};

/// Trip count and mean duration per rider type.
#[utoipa::path(
    get,
    path = "/api/trips/1.1",
    tag = "trips",
    responses(
        (status = 200, description = "One row per rider type", body = Vec<UserTypeSummary>),
        (status = 500, description = "Database or query failure")
    )
)]
pub async fn trips_by_usertype(
    Extension(db): Extension<Database>,
) -> Result<Json<Vec<UserTypeSummary>>, AppError> {
    let rows = db.trips_by_usertype().await?;
    Ok(Json(rows))
}

/// Trip count and mean duration per hour of day.
#[utoipa::path(
    get,
    path = "/api/trips/1.2",
    tag = "trips",
    params(HourQuery),
    responses(
        (status = 200, description = "One row per hour, ascending", body = Vec<HourlySummary>),
        (status = 500, description = "Database or query failure")
    )
)]
pub async fn trips_by_hour(
    Extension(db): Extension<Database>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<Vec<HourlySummary>>, AppError> {
    let query = HourQuery::from_pairs(&pairs);
    let rows = db.trips_by_hour(query.hour_filter()).await?;
    Ok(Json(rows))
}

/// Trip count per calendar day (UTC).
#[utoipa::path(
    get,
    path = "/api/trips/1.3",
    tag = "trips",
    responses(
        (status = 200, description = "One row per day, ascending", body = Vec<DailySummary>),
        (status = 500, description = "Database or query failure")
    )
)]
pub async fn trips_by_day(
    Extension(db): Extension<Database>,
) -> Result<Json<Vec<DailySummary>>, AppError> {
    let rows = db.trips_by_day().await?;
    Ok(Json(rows))
}

/// Start stations with the most departures.
#[utoipa::path(
    get,
    path = "/api/trips/1.4",
    tag = "trips",
    params(StationLimitQuery),
    responses(
        (status = 200, description = "Stations by departures", body = Vec<StationSummary>),
        (status = 500, description = "Database or query failure")
    )
)]
pub async fn top_start_stations(
    Extension(db): Extension<Database>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<Vec<StationSummary>>, AppError> {
    let query = StationLimitQuery::from_pairs(&pairs);
    let rows = db.top_start_stations(query.limit()).await?;
    Ok(Json(rows))
}

/// Trip count per hour and weekday.
#[utoipa::path(
    get,
    path = "/api/trips/1.5",
    tag = "trips",
    params(HourWeekdayQuery),
    responses(
        (
            status = 200,
            description = "Hour and weekday pairs by count",
            body = Vec<HourWeekdaySummary>
        ),
        (status = 500, description = "Database or query failure")
    )
)]
pub async fn trips_by_hour_and_weekday(
    Extension(db): Extension<Database>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<Vec<HourWeekdaySummary>>, AppError> {
    let query = HourWeekdayQuery::from_pairs(&pairs);
    let rows = db
        .trips_by_hour_and_weekday(query.hour_filter(), query.day_filter())
        .await?;
    Ok(Json(rows))
}
