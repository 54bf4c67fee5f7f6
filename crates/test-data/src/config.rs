//! Configuration types for test data generation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Controls the shape of generated trips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripGenConfig {
    /// Number of distinct start stations.
    pub station_count: usize,

    /// First day trips may start on (UTC).
    pub start_date: NaiveDate,

    /// Number of consecutive days trips are spread over.
    pub days: u32,

    /// Probability (0.0-1.0) that a trip is taken by a subscriber rather than a casual customer.
    pub subscriber_share: f64,

    /// Probability (0.0-1.0) that a trip has no recorded duration.
    pub missing_duration_rate: f64,

    /// Median trip duration in seconds.
    pub median_duration_secs: f64,

    /// Spread of the log-normal duration distribution.
    pub duration_sigma: f64,

    /// First station id; the rest are assigned sequentially.
    pub first_station_id: i64,
}

impl Default for TripGenConfig {
    fn default() -> Self {
        Self {
            station_count: 40,
            start_date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default(),
            days: 31,
            subscriber_share: 0.85,
            missing_duration_rate: 0.0,
            median_duration_secs: 600.0,
            duration_sigma: 0.6,
            first_station_id: 72,
        }
    }
}

/// Configuration for seeding operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Number of trips to generate.
    pub trip_count: usize,

    /// RNG seed for reproducible data.
    pub seed: u64,

    /// Drop the trips collection before inserting.
    pub reset: bool,

    /// Batch size for database insertions.
    pub batch_size: usize,

    pub trips: TripGenConfig,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            trip_count: 10_000,
            seed: 12345,
            reset: false,
            batch_size: 1_000,
            trips: TripGenConfig::default(),
        }
    }
}

/// Relative trip volume per hour of day, with commuter peaks at 08:00 and 17:00-18:00.
pub const HOURLY_WEIGHTS: [f64; 24] = [
    0.6, 0.3, 0.2, 0.15, 0.2, 0.7, 2.0, 4.5, 7.5, 5.0, 3.2, 3.4, //
    3.9, 4.0, 3.9, 4.3, 5.6, 8.0, 7.2, 5.0, 3.4, 2.5, 1.8, 1.1,
];
