//! Test data generation for the trips API.
//!
//! Generates reproducible bike trips with commuter-shaped hourly volume,
//! skewed station popularity and log-normal durations, and seeds them into
//! the `trips` collection.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use test_data::prelude::*;
//!
//! let mut rng = StdRng::seed_from_u64(12345);
//! let generator = TripGenerator::new(TripGenConfig::default(), &mut rng)?;
//! let trips = generator.generate_batch(10_000, &mut rng);
//! Seeder::new(db).seed_trips(&trips).await?;
//! ```

pub mod config;
pub mod db;
pub mod generators;

pub use trips::models::Trip;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::Trip;
    pub use crate::config::{SeedConfig, TripGenConfig};
    pub use crate::db::{SeedError, Seeder};
    pub use crate::generators::{GenError, GeneratedStation, TripGenerator};
    pub use rand::{SeedableRng, rngs::StdRng};
}
