//! Store error type

use std::time::Duration;

/// Failure of a store operation
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No connection could be produced (unreachable, auth failure, checkout timeout)
    #[error("database connection unavailable: {0}")]
    Connection(#[source] sqlx::Error),

    /// Too many callers already waiting for a connection
    #[error("connection pool saturated ({in_flight} operations in flight)")]
    Saturated { in_flight: usize },

    /// Operation did not finish before its deadline
    #[error("{op} timed out after {}s", .after.as_secs())]
    Timeout { op: &'static str, after: Duration },

    /// The store rejected or failed the statement
    #[error("{op} failed: {source}")]
    Query {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    /// Classify a failure raised while running a statement on a checked-out
    /// connection. Losing the connection mid-statement is an outage, not a
    /// rejected statement.
    pub(crate) fn from_statement(op: &'static str, source: sqlx::Error) -> Self {
        match source {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Connection(source),
            source => Self::Query { op, source },
        }
    }

    /// True when the store could not be reached at all, as opposed to
    /// rejecting a statement.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Saturated { .. })
    }
}
