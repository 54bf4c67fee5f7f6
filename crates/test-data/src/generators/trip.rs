//! Trip generation with realistic time-of-day and station popularity skew.

use chrono::{Duration, NaiveTime, TimeZone, Utc};
use fake::{Fake, faker::address::en::StreetName};
use rand::{Rng, distributions::WeightedIndex, prelude::Distribution};
use rand_distr::LogNormal;
use thiserror::Error;

use trips::models::Trip;

use crate::config::{HOURLY_WEIGHTS, TripGenConfig};

pub const SUBSCRIBER: &str = "Subscriber";
pub const CUSTOMER: &str = "Customer";

#[derive(Debug, Error)]
pub enum GenError {
    #[error("At least one station is required")]
    NoStations,
    #[error("At least one day is required")]
    NoDays,
    #[error("Invalid duration distribution: {0}")]
    Durations(String),
    #[error("Invalid weights: {0}")]
    Weights(#[from] rand::distributions::WeightedError),
}

/// A start station shared by many generated trips.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedStation {
    pub id: i64,
    pub name: String,
}

/// Generates trips. Station popularity follows 1/rank, so low-index stations dominate.
pub struct TripGenerator {
    config: TripGenConfig,
    stations: Vec<GeneratedStation>,
    station_weights: WeightedIndex<f64>,
    hour_weights: WeightedIndex<f64>,
    durations: LogNormal<f64>,
}

impl TripGenerator {
    /// Creates a generator, drawing station names from `rng`.
    pub fn new(config: TripGenConfig, rng: &mut impl Rng) -> Result<Self, GenError> {
        if config.station_count == 0 {
            return Err(GenError::NoStations);
        }
        if config.days == 0 {
            return Err(GenError::NoDays);
        }

        let stations: Vec<GeneratedStation> = (0..config.station_count)
            .map(|i| {
                let street: String = StreetName().fake_with_rng(rng);
                let cross: String = StreetName().fake_with_rng(rng);
                GeneratedStation {
                    id: config.first_station_id + i as i64,
                    name: format!("{street} & {cross}"),
                }
            })
            .collect();

        let rank_weights = (1..=stations.len()).map(|rank| 1.0 / rank as f64);
        let station_weights = WeightedIndex::new(rank_weights)?;
        let hour_weights = WeightedIndex::new(HOURLY_WEIGHTS)?;
        let durations = LogNormal::new(config.median_duration_secs.ln(), config.duration_sigma)
            .map_err(|e| GenError::Durations(e.to_string()))?;

        Ok(Self {
            config,
            stations,
            station_weights,
            hour_weights,
            durations,
        })
    }

    pub fn stations(&self) -> &[GeneratedStation] {
        &self.stations
    }

    /// Generates a single trip.
    pub fn generate(&self, rng: &mut impl Rng) -> Trip {
        let station = &self.stations[self.station_weights.sample(rng)];

        let usertype = if rng.r#gen::<f64>() < self.config.subscriber_share {
            SUBSCRIBER
        } else {
            CUSTOMER
        };

        let tripduration = if rng.r#gen::<f64>() < self.config.missing_duration_rate {
            None
        } else {
            // Casual riders take noticeably longer trips.
            let factor = if usertype == CUSTOMER { 2.0 } else { 1.0 };
            Some((self.durations.sample(rng) * factor).round().max(60.0))
        };

        let day_offset = rng.gen_range(0..self.config.days) as i64;
        let day = self.config.start_date + Duration::days(day_offset);
        let hour = self.hour_weights.sample(rng) as u32;
        let time = NaiveTime::from_hms_opt(hour, rng.gen_range(0..60), rng.gen_range(0..60))
            .unwrap_or_default();
        let start_time = Utc.from_utc_datetime(&day.and_time(time));

        Trip {
            usertype: Some(usertype.to_string()),
            tripduration,
            start_time,
            start_station_id: station.id,
            start_station_name: station.name.clone(),
        }
    }

    /// Generates multiple trips.
    pub fn generate_batch(&self, count: usize, rng: &mut impl Rng) -> Vec<Trip> {
        (0..count).map(|_| self.generate(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashMap;

    fn generator(config: TripGenConfig, seed: u64) -> (TripGenerator, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let generator = TripGenerator::new(config, &mut rng).unwrap();
        (generator, rng)
    }

    #[test]
    fn test_same_seed_same_trips() {
        let (a, mut rng_a) = generator(TripGenConfig::default(), 7);
        let (b, mut rng_b) = generator(TripGenConfig::default(), 7);
        assert_eq!(a.stations(), b.stations());

        let trips_a = a.generate_batch(50, &mut rng_a);
        let trips_b = b.generate_batch(50, &mut rng_b);
        for (x, y) in trips_a.iter().zip(&trips_b) {
            assert_eq!(x.start_time, y.start_time);
            assert_eq!(x.start_station_id, y.start_station_id);
            assert_eq!(x.tripduration, y.tripduration);
        }
    }

    #[test]
    fn test_trips_stay_within_configured_window() {
        let config = TripGenConfig {
            days: 3,
            ..TripGenConfig::default()
        };
        let start = Utc.from_utc_datetime(&config.start_date.and_hms_opt(0, 0, 0).unwrap());
        let end = start + Duration::days(3);
        let (generator, mut rng) = generator(config, 1);

        for trip in generator.generate_batch(500, &mut rng) {
            assert!(trip.start_time >= start && trip.start_time < end);
            assert!(trip.start_time.hour() < 24);
            assert!(trip.tripduration.unwrap() >= 60.0);
        }
    }

    #[test]
    fn test_station_names_are_consistent_per_id() {
        let (generator, mut rng) = generator(TripGenConfig::default(), 3);
        let mut names: HashMap<i64, String> = HashMap::new();
        for trip in generator.generate_batch(1_000, &mut rng) {
            let name = names
                .entry(trip.start_station_id)
                .or_insert_with(|| trip.start_station_name.clone());
            assert_eq!(*name, trip.start_station_name);
        }
    }

    #[test]
    fn test_first_station_is_busiest() {
        let (generator, mut rng) = generator(TripGenConfig::default(), 11);
        let mut counts: HashMap<i64, usize> = HashMap::new();
        for trip in generator.generate_batch(5_000, &mut rng) {
            *counts.entry(trip.start_station_id).or_default() += 1;
        }
        let first = generator.stations()[0].id;
        let last = generator.stations()[generator.stations().len() - 1].id;
        assert!(counts[&first] > counts.get(&last).copied().unwrap_or(0));
    }

    #[test]
    fn test_missing_durations() {
        let config = TripGenConfig {
            missing_duration_rate: 1.0,
            ..TripGenConfig::default()
        };
        let (generator, mut rng) = generator(config, 5);
        assert!(
            generator
                .generate_batch(20, &mut rng)
                .iter()
                .all(|t| t.tripduration.is_none())
        );
    }

    #[test]
    fn test_rejects_empty_station_set() {
        let config = TripGenConfig {
            station_count: 0,
            ..TripGenConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            TripGenerator::new(config, &mut rng),
            Err(GenError::NoStations)
        ));
    }
}
