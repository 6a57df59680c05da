//! Database layer - connection pool and repositories
//!
//! # Design Principles
//!
//! - One connection checked out per operation, returned on every exit path
//! - Callers beyond the pool size wait, up to a fixed queue limit
//! - Caller values are always bound, never formatted into SQL
//! - Every operation runs under a deadline

pub mod error;
pub mod pool;
pub mod repos;

pub use error::StoreError;
pub use pool::{create_pool, create_pool_with_options, DbPool, PoolStatus, PooledConnection};
pub use repos::*;
