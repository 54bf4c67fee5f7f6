//! Service configuration loaded from the process environment.

use std::{env, time::Duration};

use crate::errors::AppError;

pub const MONGODB_URI: &str = "MONGODB_URI";
pub const MONGODB_DB: &str = "MONGODB_DB";
pub const PORT: &str = "PORT";
pub const MONGODB_SERVER_SELECTION_TIMEOUT_MS: &str = "MONGODB_SERVER_SELECTION_TIMEOUT_MS";
pub const MONGODB_CONNECT_TIMEOUT_MS: &str = "MONGODB_CONNECT_TIMEOUT_MS";
pub const MONGODB_SOCKET_TIMEOUT_MS: &str = "MONGODB_SOCKET_TIMEOUT_MS";

/// Upper bound on pooled driver connections.
pub const MAX_POOL_SIZE: u32 = 10;
/// Connections the driver keeps open while idle.
pub const MIN_POOL_SIZE: u32 = 2;

const DEFAULT_SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_SOCKET_TIMEOUT: Duration = Duration::from_secs(45);

/// Connection parameters for the trips database.
#[derive(Debug, Clone)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub server_selection_timeout: Duration,
    pub connect_timeout: Duration,
    /// Bounds a single aggregation from dispatch to the last row.
    pub socket_timeout: Duration,
}

impl MongoSettings {
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            max_pool_size: MAX_POOL_SIZE,
            min_pool_size: MIN_POOL_SIZE,
            server_selection_timeout: DEFAULT_SERVER_SELECTION_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            socket_timeout: DEFAULT_SOCKET_TIMEOUT,
        }
    }

    /// Rejects settings a connection attempt could never succeed with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.uri.trim().is_empty() {
            return Err(AppError::Configuration(format!("{MONGODB_URI} is not set")));
        }
        if self.database.trim().is_empty() {
            return Err(AppError::Configuration(format!("{MONGODB_DB} is not set")));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongo: MongoSettings,
    pub port: u16,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = required(&lookup, MONGODB_URI)?;
        let database = required(&lookup, MONGODB_DB)?;
        let port = required(&lookup, PORT)?
            .parse::<u16>()
            .map_err(|e| AppError::Configuration(format!("{PORT} is not a valid port: {e}")))?;

        let mut mongo = MongoSettings::new(uri, database);
        if let Some(timeout) = optional_millis(&lookup, MONGODB_SERVER_SELECTION_TIMEOUT_MS)? {
            mongo.server_selection_timeout = timeout;
        }
        if let Some(timeout) = optional_millis(&lookup, MONGODB_CONNECT_TIMEOUT_MS)? {
            mongo.connect_timeout = timeout;
        }
        if let Some(timeout) = optional_millis(&lookup, MONGODB_SOCKET_TIMEOUT_MS)? {
            mongo.socket_timeout = timeout;
        }
        mongo.validate()?;

        Ok(Self { mongo, port })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(AppError::Configuration(format!("{key} is not set"))),
    }
}

fn optional_millis<F>(lookup: &F, key: &str) -> Result<Option<Duration>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(AppError::Configuration(format!("{key} must be positive"))),
        Ok(ms) => Ok(Some(Duration::from_millis(ms))),
        Err(e) => Err(AppError::Configuration(format!(
            "{key} is not a valid number of milliseconds: {e}"
        ))),
    }
}
