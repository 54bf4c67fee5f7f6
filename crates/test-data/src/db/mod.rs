//! Database seeding for test data.

mod seeder;

pub use seeder::{SeedError, Seeder};
