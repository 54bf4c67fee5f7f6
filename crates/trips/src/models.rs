use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// Collection holding one document per historical ride.
pub const TRIPS_COLLECTION: &str = "trips";

/// Stored field names. Several contain spaces and are referenced verbatim by pipelines.
pub mod fields {
    pub const USERTYPE: &str = "usertype";
    pub const TRIP_DURATION: &str = "tripduration";
    pub const START_TIME: &str = "start time";
    pub const START_STATION_ID: &str = "start station id";
    pub const START_STATION_NAME: &str = "start station name";
}

/// A trip record as seeded into the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub usertype: Option<String>,
    /// Seconds.
    pub tripduration: Option<f64>,
    #[serde(rename = "start time", with = "chrono_datetime_as_bson_datetime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "start station id")]
    pub start_station_id: i64,
    #[serde(rename = "start station name")]
    pub start_station_name: String,
}

/// Trips grouped by rider type (report 1.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserTypeSummary {
    pub usertype: Option<String>,
    #[serde(rename = "total_Viajes")]
    pub total_viajes: i64,
    /// Mean trip duration in seconds; null when no trip in the group has one.
    #[serde(rename = "duracion_Promedio")]
    pub duracion_promedio: Option<f64>,
}

/// Trips grouped by hour of day (report 1.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HourlySummary {
    pub hora: Option<i32>,
    #[serde(rename = "total_Viajes")]
    pub total_viajes: i64,
    #[serde(rename = "duracion_Promedio")]
    pub duracion_promedio: Option<f64>,
}

/// Trips per calendar day, UTC (report 1.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailySummary {
    #[serde(
        default,
        deserialize_with = "deserialize_bson_datetime",
        serialize_with = "serialize_millis"
    )]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub fecha: Option<DateTime<Utc>>,
    #[serde(rename = "total_Viajes")]
    pub total_viajes: i64,
}

/// Departures from one start station (report 1.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StationSummary {
    /// Whatever the collection stores as the station id, usually an integer.
    #[schema(value_type = Object)]
    pub estacion_id: serde_json::Value,
    pub estacion_nombre: Option<String>,
    #[serde(rename = "total_Salidas")]
    pub total_salidas: i64,
    #[serde(rename = "duracion_Promedio")]
    pub duracion_promedio: Option<f64>,
}

/// Trips per (hour, weekday) pair (report 1.5). `dia_Semana` runs 1 = Sunday to 7 = Saturday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HourWeekdaySummary {
    pub hora: Option<i32>,
    #[serde(rename = "dia_Semana")]
    pub dia_semana: Option<i32>,
    #[serde(rename = "total_Viajes")]
    pub total_viajes: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn connected(now: DateTime<Utc>) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: format_millis(&now),
            database: "connected".to_string(),
            message: None,
        }
    }

    pub fn disconnected(now: DateTime<Utc>, message: String) -> Self {
        Self {
            status: "error".to_string(),
            timestamp: format_millis(&now),
            database: "disconnected".to_string(),
            message: Some(message),
        }
    }
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2019-01-01T00:00:00.000Z`.
pub fn format_millis(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn deserialize_bson_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<bson::DateTime>::deserialize(deserializer)?;
    Ok(value.map(|dt| dt.to_chrono()))
}

fn serialize_millis<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(dt) => serializer.serialize_str(&format_millis(dt)),
        None => serializer.serialize_none(),
    }
}
