//! Database seeding utilities.

use mongodb::Database;
use thiserror::Error;
use tracing::info;

use trips::models::{TRIPS_COLLECTION, Trip};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Database seeder for inserting generated trips.
pub struct Seeder {
    db: Database,
    batch_size: usize,
}

impl Seeder {
    /// Creates a new seeder writing into `db`.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            batch_size: 1_000,
        }
    }

    /// Sets the batch size for bulk operations.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Drops the trips collection.
    pub async fn reset(&self) -> Result<(), SeedError> {
        self.db.collection::<Trip>(TRIPS_COLLECTION).drop().await?;
        info!("Dropped {TRIPS_COLLECTION} collection");
        Ok(())
    }

    /// Seeds trips into the database.
    pub async fn seed_trips(&self, trips: &[Trip]) -> Result<usize, SeedError> {
        info!("Seeding {} trips...", trips.len());
        let collection = self.db.collection::<Trip>(TRIPS_COLLECTION);

        let mut inserted = 0;
        for chunk in trips.chunks(self.batch_size) {
            let result = collection.insert_many(chunk).await?;
            inserted += result.inserted_ids.len();
            info!("  Inserted {inserted}/{} trips", trips.len());
        }

        info!("Seeded {inserted} trips");
        Ok(inserted)
    }
}
