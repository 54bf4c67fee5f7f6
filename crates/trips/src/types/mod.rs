//! Query parameter types accepted by the report endpoints.

mod queries;

pub use queries::*;
