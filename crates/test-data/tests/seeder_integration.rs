//! Seeder tests against a real MongoDB.
//!
//! Run with:
//! `MONGODB_URI=mongodb://localhost:27017 cargo test -p test-data --test seeder_integration`
//!
//! Each test writes into its own throwaway database and drops it afterwards.

use std::env;

use mongodb::{Client, Database, bson::doc};
use test_data::prelude::*;
use trips::models::TRIPS_COLLECTION;
use uuid::Uuid;

async fn scratch_database() -> Option<(Client, Database)> {
    let uri = match env::var("MONGODB_URI") {
        Ok(uri) => uri,
        Err(_) => {
            eprintln!("Skipping test: MONGODB_URI not set");
            return None;
        }
    };

    match Client::with_uri_str(&uri).await {
        Ok(client) => {
            let db = client.database(&format!("seed_test_{}", Uuid::new_v4().simple()));
            Some((client, db))
        }
        Err(e) => {
            eprintln!("Skipping test: Failed to connect to database: {e}");
            None
        }
    }
}

async fn trip_count(db: &Database) -> u64 {
    db.collection::<Trip>(TRIPS_COLLECTION)
        .count_documents(doc! {})
        .await
        .unwrap()
}

fn generated_trips(count: usize) -> Vec<Trip> {
    let mut rng = StdRng::seed_from_u64(7);
    let generator = TripGenerator::new(TripGenConfig::default(), &mut rng).unwrap();
    generator.generate_batch(count, &mut rng)
}

#[tokio::test]
async fn seeds_partial_final_batch() {
    let Some((_client, db)) = scratch_database().await else {
        return;
    };
    let trips = generated_trips(10);

    let seeder = Seeder::new(db.clone()).with_batch_size(4);
    let inserted = seeder.seed_trips(&trips).await.unwrap();

    assert_eq!(inserted, 10);
    assert_eq!(trip_count(&db).await, 10);

    db.drop().await.unwrap();
}

#[tokio::test]
async fn reset_empties_collection() {
    let Some((_client, db)) = scratch_database().await else {
        return;
    };
    let seeder = Seeder::new(db.clone()).with_batch_size(0);
    seeder.seed_trips(&generated_trips(3)).await.unwrap();
    assert_eq!(trip_count(&db).await, 3);

    seeder.reset().await.unwrap();
    assert_eq!(trip_count(&db).await, 0);

    // Seeding again after a reset starts from an empty collection.
    assert_eq!(seeder.seed_trips(&generated_trips(5)).await.unwrap(), 5);
    assert_eq!(trip_count(&db).await, 5);

    db.drop().await.unwrap();
}

#[tokio::test]
async fn empty_input_inserts_nothing() {
    let Some((_client, db)) = scratch_database().await else {
        return;
    };

    let inserted = Seeder::new(db.clone()).seed_trips(&[]).await.unwrap();
    assert_eq!(inserted, 0);
    assert_eq!(trip_count(&db).await, 0);

    db.drop().await.unwrap();
}
