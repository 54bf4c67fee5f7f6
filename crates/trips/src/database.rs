use std::sync::Arc;

use async_trait::async_trait;
use bson::Document;
use serde::de::DeserializeOwned;

use crate::errors::AppError;
use crate::models::{
    DailySummary, HourWeekdaySummary, HourlySummary, StationSummary, UserTypeSummary,
};
use crate::query_builder;
use crate::types::{KeyFilter, passes};

/// Executes aggregation pipelines against the trips collection.
#[async_trait]
pub trait TripSource: Send + Sync {
    /// Runs `pipeline` and returns every resulting row.
    async fn aggregate(&self, pipeline: Vec<Document>) -> Result<Vec<Document>, AppError>;

    /// Confirms the database is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct Database {
    source: Arc<dyn TripSource>,
}

impl Database {
    pub fn new(source: Arc<dyn TripSource>) -> Self {
        Self { source }
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.source.ping().await
    }

    pub async fn trips_by_usertype(&self) -> Result<Vec<UserTypeSummary>, AppError> {
        self.run(query_builder::trips_by_usertype()).await
    }

    /// All hourly groups are computed before `hour` narrows the result.
    pub async fn trips_by_hour(
        &self,
        hour: Option<KeyFilter>,
    ) -> Result<Vec<HourlySummary>, AppError> {
        let mut rows: Vec<HourlySummary> = self.run(query_builder::trips_by_hour()).await?;
        rows.retain(|row| passes(hour, row.hora));
        Ok(rows)
    }

    pub async fn trips_by_day(&self) -> Result<Vec<DailySummary>, AppError> {
        self.run(query_builder::trips_by_day()).await
    }

    pub async fn top_start_stations(&self, limit: i64) -> Result<Vec<StationSummary>, AppError> {
        self.run(query_builder::top_start_stations(limit)).await
    }

    /// Hour and day filters are AND-combined on the aggregated rows.
    pub async fn trips_by_hour_and_weekday(
        &self,
        hour: Option<KeyFilter>,
        day: Option<KeyFilter>,
    ) -> Result<Vec<HourWeekdaySummary>, AppError> {
        let mut rows: Vec<HourWeekdaySummary> =
            self.run(query_builder::trips_by_hour_and_weekday()).await?;
        rows.retain(|row| passes(hour, row.hora) && passes(day, row.dia_semana));
        Ok(rows)
    }

    async fn run<T: DeserializeOwned>(&self, pipeline: Vec<Document>) -> Result<Vec<T>, AppError> {
        let docs = self.source.aggregate(pipeline).await?;
        let rows = docs
            .into_iter()
            .map(bson::from_document)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(rows)
    }
}
