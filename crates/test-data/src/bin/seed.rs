//! Default seed script - fills the trips collection with synthetic data
//!
//! Run with:
//! ```
//! MONGODB_URI=mongodb://localhost:27017 MONGODB_DB=citibike cargo run -p test-data --bin seed
//! ```
//!
//! Optional: `SEED_TRIPS` (default 10000), `SEED_DAYS` (default 31), `SEED_RESET=1`.

use std::env;

use anyhow::Context;
use mongodb::Client;
use test_data::prelude::*;
use tracing_subscriber::EnvFilter;

fn env_parse<T: std::str::FromStr>(key: &str) -> anyhow::Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => Ok(Some(raw.trim().parse().with_context(|| format!("invalid {key}"))?)),
        Err(_) => Ok(None),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let uri = env::var("MONGODB_URI").context("MONGODB_URI is not set")?;
    let db_name = env::var("MONGODB_DB").context("MONGODB_DB is not set")?;

    let mut config = SeedConfig::default();
    if let Some(count) = env_parse::<usize>("SEED_TRIPS")? {
        config.trip_count = count;
    }
    if let Some(days) = env_parse::<u32>("SEED_DAYS")? {
        config.trips.days = days;
    }
    config.reset = env_parse::<u8>("SEED_RESET")?.is_some_and(|v| v != 0);

    let client = Client::with_uri_str(&uri).await?;
    let seeder = Seeder::new(client.database(&db_name)).with_batch_size(config.batch_size);

    tracing::info!("Connected to database {db_name}");

    if config.reset {
        seeder.reset().await?;
    }

    // Reproducible data
    let mut rng = StdRng::seed_from_u64(config.seed);
    let generator = TripGenerator::new(config.trips.clone(), &mut rng)?;
    let trips = generator.generate_batch(config.trip_count, &mut rng);
    let inserted = seeder.seed_trips(&trips).await?;

    // Summary output
    tracing::info!("Seed completed!");
    tracing::info!("  Stations: {}", generator.stations().len());
    tracing::info!("  Trips: {inserted}");
    tracing::info!("  Days: {}", config.trips.days);

    Ok(())
}
