//! Transaction repository
//!
//! Five parameterized statements plus a liveness check. Each operation
//! checks out one connection, runs one statement under the pool's
//! statement deadline, and gives the connection back on every exit path.
//! Failures are logged with the operation name and returned.

use std::future::Future;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use tracing::{debug, error, info};

use crate::db::error::StoreError;
use crate::db::pool::{DbPool, PooledConnection};
use crate::models::NewTransaction;

/// Transaction record from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct TransactionRecord {
    pub id: i64,
    pub amount: Decimal,
    pub description: String,
}

/// Transaction repository
pub struct TransactionRepo<'a> {
    pool: &'a DbPool,
}

impl<'a> TransactionRepo<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a transaction, returning the store-assigned id.
    pub async fn add_transaction(&self, new: &NewTransaction) -> Result<i64, StoreError> {
        let amount = new.amount();
        let description = new.description().to_owned();

        let id = self
            .run("add_transaction", move |mut conn| async move {
                sqlx::query_scalar::<_, i64>(
                    "INSERT INTO transactions (amount, description) VALUES ($1, $2) RETURNING id",
                )
                .bind(amount)
                .bind(description)
                .fetch_one(&mut *conn)
                .await
            })
            .await?;

        info!(id, "transaction added");
        Ok(id)
    }

    /// All transactions, in no particular order.
    pub async fn get_all_transactions(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        let records = self
            .run("get_all_transactions", |mut conn| async move {
                sqlx::query_as::<_, TransactionRecord>(
                    "SELECT id, amount, description FROM transactions",
                )
                .fetch_all(&mut *conn)
                .await
            })
            .await?;

        debug!(count = records.len(), "fetched all transactions");
        Ok(records)
    }

    /// Look up one transaction. `Ok(None)` when no row has this id.
    pub async fn find_transaction_by_id(
        &self,
        id: i64,
    ) -> Result<Option<TransactionRecord>, StoreError> {
        let record = self
            .run("find_transaction_by_id", move |mut conn| async move {
                sqlx::query_as::<_, TransactionRecord>(
                    "SELECT id, amount, description FROM transactions WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
            })
            .await?;

        debug!(id, found = record.is_some(), "looked up transaction");
        Ok(record)
    }

    /// Delete every transaction, returning the number of rows removed.
    pub async fn delete_all_transactions(&self) -> Result<u64, StoreError> {
        let deleted = self
            .run("delete_all_transactions", |mut conn| async move {
                sqlx::query("DELETE FROM transactions")
                    .execute(&mut *conn)
                    .await
                    .map(|done| done.rows_affected())
            })
            .await?;

        info!(deleted, "deleted all transactions");
        Ok(deleted)
    }

    /// Delete one transaction. Deleting an unknown id is not an error; the
    /// returned row count is 0.
    pub async fn delete_transaction_by_id(&self, id: i64) -> Result<u64, StoreError> {
        let deleted = self
            .run("delete_transaction_by_id", move |mut conn| async move {
                sqlx::query("DELETE FROM transactions WHERE id = $1")
                    .bind(id)
                    .execute(&mut *conn)
                    .await
                    .map(|done| done.rows_affected())
            })
            .await?;

        info!(id, deleted, "deleted transaction");
        Ok(deleted)
    }

    /// Liveness check (`SELECT 1`). Never errors; failures are logged and
    /// reported as `false`.
    pub async fn check_database_connection(&self) -> bool {
        self.ping().await.is_ok()
    }

    /// Liveness check that keeps the failure, for health reporting.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.run("check_database_connection", |mut conn| async move {
            sqlx::query_scalar::<_, i32>("SELECT 1")
                .fetch_one(&mut *conn)
                .await
                .map(|_| ())
        })
        .await
    }

    /// Check out a connection and run one statement under the deadline.
    async fn run<T, F, Fut>(&self, op: &'static str, statement: F) -> Result<T, StoreError>
    where
        F: FnOnce(PooledConnection) -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        let deadline = self.pool.statement_timeout();
        let attempt = async {
            let conn = self.pool.acquire().await?;
            statement(conn)
                .await
                .map_err(|source| StoreError::from_statement(op, source))
        };

        let result = match tokio::time::timeout(deadline, attempt).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout { op, after: deadline }),
        };

        if let Err(e) = &result {
            error!(op, error = %e, "transaction store operation failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::unreachable_pool;

    // Against a live database, see tests/transactions.rs

    #[tokio::test]
    async fn liveness_false_when_unreachable() {
        let pool = unreachable_pool();
        assert!(!TransactionRepo::new(&pool).check_database_connection().await);
    }

    #[tokio::test]
    async fn operations_report_connection_errors() {
        let pool = unreachable_pool();
        let repo = TransactionRepo::new(&pool);
        let new = NewTransaction::new(Decimal::new(1250, 2), "coffee").unwrap();

        let err = repo.add_transaction(&new).await.unwrap_err();
        assert!(err.is_unavailable(), "unexpected error: {err}");

        let err = repo.find_transaction_by_id(1).await.unwrap_err();
        assert!(matches!(err, StoreError::Connection(_)));

        assert_eq!(pool.status().in_flight, 0);
    }
}
