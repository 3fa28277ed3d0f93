//! Async connection pool for Diesel PostgreSQL connections.
//!
//! Wraps `diesel-async` and `bb8` behind a small interface the adapters
//! share. Checkout respects the configured timeout and never blocks the
//! async runtime; failures surface as [`PoolError`] values the adapters
//! translate into repository errors.

use std::time::Duration;

use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_IDLE: u32 = 2;
const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Failures raised while building the pool or checking out a connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became available within the checkout timeout, or the
    /// backend refused the connection.
    #[error("connection checkout failed: {message}")]
    Checkout {
        /// Description reported by bb8.
        message: String,
    },

    /// The pool itself could not be assembled, e.g. for a malformed
    /// database URL.
    #[error("pool construction failed: {message}")]
    Build {
        /// Description reported by bb8.
        message: String,
    },
}

impl PoolError {
    pub(crate) fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub(crate) fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Tuning knobs for the connection pool.
///
/// [`PoolConfig::new`] starts from the service defaults (ten connections,
/// two kept idle, thirty-second checkout timeout); the `with_` methods
/// adjust individual knobs.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_connections: u32,
    min_idle: Option<u32>,
    checkout_timeout: Duration,
}

impl PoolConfig {
    /// Start from the defaults over the given database URL.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_idle: Some(DEFAULT_MIN_IDLE),
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Cap the number of simultaneously open connections.
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Keep at least this many idle connections warm; `None` disables the
    /// floor.
    #[must_use]
    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    /// Bound how long a checkout may wait for a free connection.
    #[must_use]
    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }
}

/// Shared handle to the PostgreSQL connection pool.
///
/// Cloning is cheap; every adapter holds its own clone.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the pool cannot be constructed.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_connections)
            .min_idle(config.min_idle)
            .connection_timeout(config.checkout_timeout)
            .build(manager)
            .await
            .map_err(|e| PoolError::build(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Check out a connection, waiting up to the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when no connection becomes
    /// available in time.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|e| PoolError::checkout(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn defaults_are_service_wide() {
        let config = PoolConfig::new("postgres://localhost/aula");
        assert_eq!(config.database_url, "postgres://localhost/aula");
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.min_idle, Some(DEFAULT_MIN_IDLE));
        assert_eq!(config.checkout_timeout, DEFAULT_CHECKOUT_TIMEOUT);
    }

    #[rstest]
    fn builder_methods_override_each_knob() {
        let config = PoolConfig::new("postgres://localhost/aula")
            .with_max_connections(25)
            .with_min_idle(None)
            .with_checkout_timeout(Duration::from_secs(5));
        assert_eq!(config.max_connections, 25);
        assert_eq!(config.min_idle, None);
        assert_eq!(config.checkout_timeout, Duration::from_secs(5));
    }

    #[rstest]
    fn errors_carry_the_reported_message() {
        assert!(PoolError::checkout("timed out")
            .to_string()
            .contains("timed out"));
        assert!(PoolError::build("bad url").to_string().contains("bad url"));
    }
}
