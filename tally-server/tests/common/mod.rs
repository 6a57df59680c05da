//! Shared helpers for database-backed tests
//!
//! Each `#[sqlx::test]` gets its own freshly migrated database on the server
//! named by DATABASE_URL:
//! DATABASE_URL=postgres://... cargo test -p tally-server -- --ignored

#![allow(dead_code)]

use std::time::Duration;

use sqlx::postgres::PgConnectOptions;
use tally_core::PoolSettings;
use tally_server::{create_pool_with_options, DbPool};

pub fn settings(pool_size: u32, queue_limit: usize) -> PoolSettings {
    PoolSettings {
        pool_size,
        queue_limit,
        acquire_timeout: Duration::from_secs(10),
        statement_timeout: Duration::from_secs(30),
    }
}

pub fn pool_with(options: PgConnectOptions, settings: PoolSettings) -> DbPool {
    create_pool_with_options(options, &settings)
}

pub fn pool(options: PgConnectOptions) -> DbPool {
    pool_with(options, settings(10, 100))
}
