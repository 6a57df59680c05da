//! tally-server: pooled transaction store and HTTP API
//!
//! - `db`: connection pool with bounded wait queue, transaction repository
//! - `models`: validated input types
//! - `http`: axum router, error mapping, graceful shutdown

pub mod db;
pub mod http;
pub mod models;

pub use db::{
    create_pool, create_pool_with_options, DbPool, StoreError, TransactionRecord, TransactionRepo,
};
pub use http::{build_router, run_server, ServerConfig};
