//! Entity generators for test data.
//!
//! - [`TripGenerator`]: synthetic trips over a fixed station set

pub mod trip;

pub use trip::{GenError, GeneratedStation, TripGenerator};
