//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits, opened lazily on first
//! checkout. In front of it sits an admission gate that caps callers in
//! flight (checked out + waiting) at `pool_size + queue_limit`; callers
//! beyond that fail fast with [`StoreError::Saturated`].

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Serialize;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgConnection, PgPool, Postgres};
use tally_core::{ConnectionConfig, PoolSettings};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::error::StoreError;

/// Create a lazily-connected PostgreSQL pool.
///
/// No connection is opened here; the first [`DbPool::acquire`] connects.
/// Requires a resolved [`ConnectionConfig`], so the pool can never be
/// built from half-resolved credentials.
///
/// # Example
///
/// ```ignore
/// let connection = ConfigResolver::new(env, settings.secret).resolve().await;
/// let pool = create_pool(&connection, &settings.pool);
/// ```
pub fn create_pool(config: &ConnectionConfig, settings: &PoolSettings) -> DbPool {
    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .database(&config.database);
    if config.has_password() {
        options = options.password(config.password.expose_secret());
    }

    create_pool_with_options(options, settings)
}

/// Create a lazily-connected pool from explicit connect options.
///
/// Used where options come from elsewhere, e.g. a per-test database.
pub fn create_pool_with_options(options: PgConnectOptions, settings: &PoolSettings) -> DbPool {
    tracing::info!(
        host = %options.get_host(),
        port = options.get_port(),
        database = options.get_database().unwrap_or_default(),
        pool_size = settings.pool_size,
        queue_limit = settings.queue_limit,
        "database pool configured"
    );

    let pool = PgPoolOptions::new()
        .max_connections(settings.pool_size)
        .acquire_timeout(settings.acquire_timeout)
        .connect_lazy_with(options);

    DbPool {
        pool,
        gate: AdmissionGate::new(settings),
        statement_timeout: settings.statement_timeout,
    }
}

/// Pool handle shared across handlers (cheap to clone)
#[derive(Clone)]
pub struct DbPool {
    pool: PgPool,
    gate: AdmissionGate,
    statement_timeout: Duration,
}

impl DbPool {
    /// Check out a connection, waiting if the pool is exhausted.
    ///
    /// The returned guard gives the connection and the admission slot back
    /// when dropped.
    pub async fn acquire(&self) -> Result<PooledConnection, StoreError> {
        let permit = self.gate.enter()?;
        let conn = self.pool.acquire().await.map_err(StoreError::Connection)?;
        Ok(PooledConnection {
            conn,
            _permit: permit,
        })
    }

    /// Deadline applied to each store operation.
    pub fn statement_timeout(&self) -> Duration {
        self.statement_timeout
    }

    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
            in_flight: self.gate.in_flight(),
        }
    }

    /// Close all connections; later checkouts fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Snapshot of pool usage
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PoolStatus {
    /// Open connections
    pub size: u32,
    /// Open connections not checked out
    pub idle: usize,
    /// Operations checked out or waiting
    pub in_flight: usize,
}

/// A checked-out connection. Dropping it returns the connection to the pool.
pub struct PooledConnection {
    conn: PoolConnection<Postgres>,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledConnection {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        &self.conn
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut PgConnection {
        &mut self.conn
    }
}

/// Caps callers in flight at `pool_size + queue_limit`, bounded by what a
/// tokio semaphore can hold.
#[derive(Clone)]
struct AdmissionGate {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionGate {
    fn new(settings: &PoolSettings) -> Self {
        let capacity = settings.capacity().min(Semaphore::MAX_PERMITS);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    fn enter(&self) -> Result<OwnedSemaphorePermit, StoreError> {
        Arc::clone(&self.permits).try_acquire_owned().map_err(|_| {
            let in_flight = self.in_flight();
            tracing::warn!(in_flight, "connection queue full, rejecting operation");
            StoreError::Saturated { in_flight }
        })
    }

    fn in_flight(&self) -> usize {
        self.capacity - self.permits.available_permits()
    }
}

/// Pool pointed at a closed local port, for tests that need a pool but no
/// database.
#[cfg(test)]
pub(crate) fn unreachable_pool() -> DbPool {
    use tally_core::Environment;

    let env = Environment::from_pairs([("DB_HOST", "127.0.0.1"), ("DB_PORT", "1")]);
    let config = ConnectionConfig::from_env(&env);
    let settings = PoolSettings {
        pool_size: 2,
        queue_limit: 2,
        acquire_timeout: Duration::from_millis(500),
        statement_timeout: Duration::from_secs(10),
    };
    create_pool(&config, &settings)
}
