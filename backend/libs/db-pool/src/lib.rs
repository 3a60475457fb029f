//! PostgreSQL connection pool management
//!
//! Builds a verified `PgPool` from environment configuration and keeps the
//! pool gauges in `metrics` up to date.

mod metrics;

pub use metrics::update_pool_metrics;

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

/// How often the background task refreshes the pool gauges.
const METRICS_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DbConfigError {
    #[error("DATABASE_URL environment variable not set")]
    MissingUrl,

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("DB_MIN_CONNECTIONS ({min}) exceeds DB_MAX_CONNECTIONS ({max})")]
    MinExceedsMax { min: u32, max: u32 },
}

/// Database connection pool configuration
#[derive(Clone)]
pub struct DbConfig {
    /// Service name for metrics labeling
    pub service_name: String,
    /// PostgreSQL connection URL
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Budget for opening and verifying the first connection
    pub connect_timeout_secs: u64,
    /// Budget for checking a connection out of the pool
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("service_name", &self.service_name)
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("max_lifetime_secs", &self.max_lifetime_secs)
            .finish()
    }
}

impl DbConfig {
    /// Configuration with the default pool sizing for `database_url`.
    pub fn new(service_name: &str, database_url: impl Into<String>) -> Self {
        Self {
            service_name: service_name.to_string(),
            database_url: database_url.into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 5,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }

    /// Read `DATABASE_URL` and the optional `DB_*` overrides.
    ///
    /// Unlike a silent fallback, a present-but-unparsable override is an
    /// error so a typo in deployment config surfaces at startup.
    pub fn from_env(service_name: &str) -> Result<Self, DbConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .ok_or(DbConfigError::MissingUrl)?;

        let defaults = Self::new(service_name, database_url);
        let config = Self {
            max_connections: env_or("DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: env_or("DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connect_timeout_secs: env_or("DB_CONNECT_TIMEOUT_SECS", defaults.connect_timeout_secs)?,
            acquire_timeout_secs: env_or("DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout_secs)?,
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout_secs)?,
            max_lifetime_secs: env_or("DB_MAX_LIFETIME_SECS", defaults.max_lifetime_secs)?,
            ..defaults
        };

        if config.min_connections > config.max_connections {
            return Err(DbConfigError::MinExceedsMax {
                min: config.min_connections,
                max: config.max_connections,
            });
        }

        Ok(config)
    }

    /// Log pool configuration details
    pub fn log_config(&self) {
        info!(
            service = %self.service_name,
            max_connections = self.max_connections,
            min_connections = self.min_connections,
            acquire_timeout_secs = self.acquire_timeout_secs,
            idle_timeout_secs = self.idle_timeout_secs,
            max_lifetime_secs = self.max_lifetime_secs,
            "Database pool configuration"
        );
    }
}

fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, DbConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| DbConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Create a PostgreSQL connection pool, verify it with `SELECT 1`, and start
/// the background gauge updater.
pub async fn create_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    debug!(
        service = %config.service_name,
        max = config.max_connections,
        min = config.min_connections,
        "Creating database pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
        .connect(&config.database_url)
        .await?;

    match tokio::time::timeout(
        Duration::from_secs(config.connect_timeout_secs),
        ping(&pool),
    )
    .await
    {
        Ok(Ok(())) => {
            info!(service = %config.service_name, "Database pool created and verified");
            update_pool_metrics(&pool, &config.service_name);
            spawn_metrics_updater(pool.clone(), config.service_name.clone());
            Ok(pool)
        }
        Ok(Err(e)) => {
            error!(service = %config.service_name, error = %e, "Database connection verification failed");
            Err(e)
        }
        Err(_) => {
            error!(
                service = %config.service_name,
                timeout_secs = config.connect_timeout_secs,
                "Database connection verification timed out"
            );
            Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "database verification timeout",
            )))
        }
    }
}

/// Round-trip a trivial query; used for startup verification and health checks.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

fn spawn_metrics_updater(pool: PgPool, service: String) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(METRICS_REFRESH_INTERVAL);
        loop {
            interval.tick().await;
            if pool.is_closed() {
                debug!(service = %service, "Pool closed, stopping metrics updater");
                break;
            }
            update_pool_metrics(&pool, &service);
        }
    });
}
