//! Aggregation pipeline construction for the trip reports.
//!
//! Each report is a pure function returning the stages to run against the
//! trips collection. Filtering by hour or weekday is deliberately not part of
//! any pipeline: those filters run on the aggregated rows (see
//! [`crate::database::Database`]), so every group is computed over the full
//! collection first.

use bson::{Bson, Document, doc};

use crate::models::fields;

/// Rows returned by the top-stations report when no limit is given.
pub const DEFAULT_STATION_LIMIT: i64 = 10;

/// Builder for an ordered list of aggregation stages.
///
/// # Example
/// ```ignore
/// let pipeline = PipelineBuilder::new()
///     .group(doc! { "_id": "$usertype", "total_Viajes": { "$sum": 1 } })
///     .sort(doc! { "total_Viajes": -1 })
///     .limit(5)
///     .build();
/// ```
#[derive(Debug, Default, Clone)]
pub struct PipelineBuilder {
    stages: Vec<Document>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Appends a `$project` stage.
    pub fn project(mut self, spec: Document) -> Self {
        self.stages.push(doc! { "$project": spec });
        self
    }

    /// Appends a `$group` stage. `spec` must contain `_id`.
    pub fn group(mut self, spec: Document) -> Self {
        self.stages.push(doc! { "$group": spec });
        self
    }

    /// Appends a `$sort` stage. Key order in `spec` is the sort precedence.
    pub fn sort(mut self, spec: Document) -> Self {
        self.stages.push(doc! { "$sort": spec });
        self
    }

    /// Appends a `$limit` stage.
    pub fn limit(mut self, n: i64) -> Self {
        self.stages.push(doc! { "$limit": n });
        self
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn build(self) -> Vec<Document> {
        self.stages
    }
}

/// `"$field"` reference for a stored field name.
fn field_ref(name: &str) -> Bson {
    Bson::String(format!("${name}"))
}

/// Trip count and mean duration per rider type (1.1).
///
/// Rows are sorted by `usertype` ascending so repeated calls return the same
/// bytes, rather than the first-seen group order the engine would produce.
pub fn trips_by_usertype() -> Vec<Document> {
    PipelineBuilder::new()
        .group(doc! {
            "_id": field_ref(fields::USERTYPE),
            "total_Viajes": { "$sum": 1 },
            "duracion_Promedio": { "$avg": field_ref(fields::TRIP_DURATION) },
        })
        .project(doc! {
            "_id": 0,
            "usertype": "$_id",
            "total_Viajes": 1,
            "duracion_Promedio": 1,
        })
        .sort(doc! { "usertype": 1 })
        .build()
}

/// Trip count and mean duration per hour of day, ascending by hour (1.2).
pub fn trips_by_hour() -> Vec<Document> {
    PipelineBuilder::new()
        .project(doc! {
            "hora": { "$hour": field_ref(fields::START_TIME) },
            "tripduration": 1,
        })
        .group(doc! {
            "_id": "$hora",
            "total_Viajes": { "$sum": 1 },
            "duracion_Promedio": { "$avg": field_ref(fields::TRIP_DURATION) },
        })
        .project(doc! {
            "_id": 0,
            "hora": "$_id",
            "total_Viajes": 1,
            "duracion_Promedio": 1,
        })
        .sort(doc! { "hora": 1 })
        .build()
}

/// Trip count per UTC calendar day, ascending by day (1.3).
pub fn trips_by_day() -> Vec<Document> {
    PipelineBuilder::new()
        .project(doc! {
            "fecha": {
                "$dateTrunc": {
                    "date": field_ref(fields::START_TIME),
                    "unit": "day",
                    "timezone": "UTC",
                },
            },
        })
        .group(doc! {
            "_id": "$fecha",
            "total_Viajes": { "$sum": 1 },
        })
        .project(doc! {
            "_id": 0,
            "fecha": "$_id",
            "total_Viajes": 1,
        })
        .sort(doc! { "fecha": 1 })
        .build()
}

/// Busiest start stations by departures (1.4). Ties fall back to station id.
pub fn top_start_stations(limit: i64) -> Vec<Document> {
    PipelineBuilder::new()
        .group(doc! {
            "_id": {
                "estacion_id": field_ref(fields::START_STATION_ID),
                "estacion_nombre": field_ref(fields::START_STATION_NAME),
            },
            "total_Salidas": { "$sum": 1 },
            "duracion_Promedio": { "$avg": field_ref(fields::TRIP_DURATION) },
        })
        .project(doc! {
            "_id": 0,
            "estacion_id": "$_id.estacion_id",
            "estacion_nombre": "$_id.estacion_nombre",
            "total_Salidas": 1,
            "duracion_Promedio": 1,
        })
        .sort(doc! { "total_Salidas": -1, "estacion_id": 1 })
        .limit(clamp_station_limit(limit))
        .build()
}

/// Trip count per (hour, weekday), descending by count (1.5).
///
/// `$dayOfWeek` numbers days 1 = Sunday through 7 = Saturday.
pub fn trips_by_hour_and_weekday() -> Vec<Document> {
    PipelineBuilder::new()
        .project(doc! {
            "hora": { "$hour": field_ref(fields::START_TIME) },
            "dia_Semana": { "$dayOfWeek": field_ref(fields::START_TIME) },
        })
        .group(doc! {
            "_id": { "hora": "$hora", "dia_Semana": "$dia_Semana" },
            "total_Viajes": { "$sum": 1 },
        })
        .project(doc! {
            "_id": 0,
            "hora": "$_id.hora",
            "dia_Semana": "$_id.dia_Semana",
            "total_Viajes": 1,
        })
        .sort(doc! { "total_Viajes": -1, "hora": 1, "dia_Semana": 1 })
        .build()
}

/// `$limit` only accepts positive values.
pub fn clamp_station_limit(limit: i64) -> i64 {
    limit.max(1)
}
