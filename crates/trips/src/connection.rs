//! Lazily established, liveness-checked database handle.
//!
//! The first caller connects; later callers reuse the cached handle after a
//! `ping`. A failed ping drops the handle and the caller reconnects. Concurrent
//! callers may race to reconnect, and the last writer wins.

use async_trait::async_trait;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::{Client, options::ClientOptions};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::MongoSettings;
use crate::database::TripSource;
use crate::errors::AppError;
use crate::models::TRIPS_COLLECTION;

/// Opens handles and checks that an existing one is still usable.
#[async_trait]
pub trait Connector: Send + Sync {
    type Handle: Clone + Send + Sync;

    async fn connect(&self) -> Result<Self::Handle, AppError>;

    async fn ping(&self, handle: &Self::Handle) -> Result<(), AppError>;
}

/// Connects to MongoDB with the configured pool bounds and timeouts.
pub struct MongoConnector {
    settings: MongoSettings,
}

impl MongoConnector {
    pub fn new(settings: MongoSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Connector for MongoConnector {
    type Handle = mongodb::Database;

    async fn connect(&self) -> Result<mongodb::Database, AppError> {
        self.settings.validate()?;

        let mut options = ClientOptions::parse(&self.settings.uri)
            .await
            .map_err(|e| AppError::Configuration(format!("invalid MongoDB URI: {e}")))?;
        options.max_pool_size = Some(self.settings.max_pool_size);
        options.min_pool_size = Some(self.settings.min_pool_size);
        options.connect_timeout = Some(self.settings.connect_timeout);
        options.server_selection_timeout = Some(self.settings.server_selection_timeout);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options)?;
        let db = client.database(&self.settings.database);
        self.ping(&db).await.map_err(|e| match e {
            AppError::QueryExecution(msg) => AppError::Connection(msg),
            other => other,
        })?;

        info!("Connected to database {}", self.settings.database);
        Ok(db)
    }

    async fn ping(&self, db: &mongodb::Database) -> Result<(), AppError> {
        db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

pub struct ConnectionManager<C: Connector = MongoConnector> {
    connector: C,
    cached: RwLock<Option<C::Handle>>,
}

impl ConnectionManager<MongoConnector> {
    /// Creates a manager without connecting.
    pub fn new(settings: MongoSettings) -> Self {
        Self::with_connector(MongoConnector::new(settings))
    }
}

impl<C: Connector> ConnectionManager<C> {
    pub fn with_connector(connector: C) -> Self {
        Self {
            connector,
            cached: RwLock::new(None),
        }
    }

    /// Returns a live handle, connecting or reconnecting as needed.
    pub async fn acquire(&self) -> Result<C::Handle, AppError> {
        let cached = self.cached.read().await.clone();
        if let Some(handle) = cached {
            match self.connector.ping(&handle).await {
                Ok(()) => return Ok(handle),
                Err(e) => {
                    warn!("Cached database connection failed liveness check: {e}");
                    self.invalidate().await;
                }
            }
        }

        let handle = self.connector.connect().await?;
        *self.cached.write().await = Some(handle.clone());
        Ok(handle)
    }

    /// Drops the cached handle so the next caller reconnects.
    pub async fn invalidate(&self) {
        self.cached.write().await.take();
    }

    pub async fn is_cached(&self) -> bool {
        self.cached.read().await.is_some()
    }
}

#[async_trait]
impl TripSource for ConnectionManager<MongoConnector> {
    async fn aggregate(&self, pipeline: Vec<Document>) -> Result<Vec<Document>, AppError> {
        let db = self.acquire().await?;
        let collection = db.collection::<Document>(TRIPS_COLLECTION);
        let socket_timeout = self.connector.settings.socket_timeout;

        let query = async {
            let cursor = collection.aggregate(pipeline).await?;
            cursor.try_collect::<Vec<Document>>().await
        };

        match tokio::time::timeout(socket_timeout, query).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(AppError::Connection(format!(
                "aggregation on {TRIPS_COLLECTION} exceeded socket timeout {socket_timeout:?}"
            ))),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.acquire().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    /// Hands out numbered handles and fails on demand.
    #[derive(Default)]
    struct CountingConnector {
        connects: AtomicUsize,
        pings: AtomicUsize,
        ping_fails: AtomicBool,
        connect_fails: AtomicBool,
    }

    #[async_trait]
    impl Connector for CountingConnector {
        type Handle = usize;

        async fn connect(&self) -> Result<usize, AppError> {
            if self.connect_fails.load(Ordering::SeqCst) {
                return Err(AppError::Connection("connection refused".into()));
            }
            Ok(self.connects.fetch_add(1, Ordering::SeqCst) + 1)
        }

        async fn ping(&self, _handle: &usize) -> Result<(), AppError> {
            self.pings.fetch_add(1, Ordering::SeqCst);
            if self.ping_fails.load(Ordering::SeqCst) {
                return Err(AppError::Connection("server went away".into()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_healthy_cached_handle_is_reused() {
        let manager = ConnectionManager::with_connector(CountingConnector::default());
        assert!(!manager.is_cached().await);

        assert_eq!(manager.acquire().await.unwrap(), 1);
        assert!(manager.is_cached().await);
        assert_eq!(manager.acquire().await.unwrap(), 1);
        assert_eq!(manager.acquire().await.unwrap(), 1);

        assert_eq!(manager.connector.connects.load(Ordering::SeqCst), 1);
        assert_eq!(manager.connector.pings.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_ping_clears_cache_and_reconnects() {
        let manager = ConnectionManager::with_connector(CountingConnector::default());
        assert_eq!(manager.acquire().await.unwrap(), 1);

        // Server drops: the liveness check fails and so does the reconnect.
        manager.connector.ping_fails.store(true, Ordering::SeqCst);
        manager.connector.connect_fails.store(true, Ordering::SeqCst);
        let err = manager.acquire().await.unwrap_err();
        assert!(matches!(err, AppError::Connection(_)));
        assert!(!manager.is_cached().await);

        // Server returns: the next call opens a fresh handle without a ping.
        manager.connector.ping_fails.store(false, Ordering::SeqCst);
        manager.connector.connect_fails.store(false, Ordering::SeqCst);
        let pings_before = manager.connector.pings.load(Ordering::SeqCst);
        assert_eq!(manager.acquire().await.unwrap(), 2);
        assert!(manager.is_cached().await);
        assert_eq!(manager.connector.pings.load(Ordering::SeqCst), pings_before);
    }

    #[tokio::test]
    async fn test_failed_ping_replaces_handle_in_one_call() {
        let manager = ConnectionManager::with_connector(CountingConnector::default());
        assert_eq!(manager.acquire().await.unwrap(), 1);

        manager.connector.ping_fails.store(true, Ordering::SeqCst);
        assert_eq!(manager.acquire().await.unwrap(), 2);
        assert_eq!(manager.connector.connects.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reconnect() {
        let manager = ConnectionManager::with_connector(CountingConnector::default());
        manager.acquire().await.unwrap();
        manager.invalidate().await;
        assert!(!manager.is_cached().await);
        assert_eq!(manager.acquire().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unset_uri_is_configuration_error() {
        let manager = ConnectionManager::new(MongoSettings::new("", "citibike"));
        let err = manager.acquire().await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(!manager.is_cached().await);
    }

    #[tokio::test]
    async fn test_unset_database_is_configuration_error() {
        let manager = ConnectionManager::new(MongoSettings::new("mongodb://localhost:27017", ""));
        let err = manager.acquire().await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_malformed_uri_is_configuration_error() {
        let manager = ConnectionManager::new(MongoSettings::new("postgres://nope", "citibike"));
        let err = manager.acquire().await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        let uri = "mongodb://127.0.0.1:1/?directConnection=true";
        let mut settings = MongoSettings::new(uri, "citibike");
        settings.server_selection_timeout = Duration::from_millis(200);
        settings.connect_timeout = Duration::from_millis(200);
        let manager = ConnectionManager::new(settings);

        let err = manager.acquire().await.unwrap_err();
        assert!(matches!(err, AppError::Connection(_)), "got {err:?}");
        assert!(!manager.is_cached().await);
    }
}
