//! HTTP request handlers for the trips API.

pub mod health;
pub mod trips;

pub use health::{__path_health_check, health_check, not_found, openapi_json};
pub use trips::{
    __path_top_start_stations, __path_trips_by_day, __path_trips_by_hour,
    __path_trips_by_hour_and_weekday, __path_trips_by_usertype, top_start_stations, trips_by_day,
    trips_by_hour, trips_by_hour_and_weekday, trips_by_usertype,
};
