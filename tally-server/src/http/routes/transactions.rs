//! Transaction endpoints
//!
//! `/transaction/id` takes the id in a JSON body (`{"id": 7}`) for existing
//! clients; `/transaction/{id}` takes it from the path.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::{TransactionRecord, TransactionRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, ValidTransactionId};
use crate::http::server::AppState;
use crate::models::{parse_transaction_id, NewTransaction};

/// Create transaction request
#[derive(Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default, alias = "description")]
    pub desc: Option<Value>,
}

/// Body-addressed request (`{"id": ...}`)
#[derive(Deserialize)]
pub struct TransactionIdRequest {
    #[serde(default)]
    pub id: Option<Value>,
}

/// Transaction response
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: i64,
    pub amount: String,
    pub description: String,
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(t: TransactionRecord) -> Self {
        Self {
            id: t.id,
            amount: t.amount.to_string(),
            description: t.description,
        }
    }
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: i64,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct ListResponse {
    pub result: Vec<TransactionResponse>,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub message: String,
    pub deleted: u64,
}

/// POST /transaction - add a transaction
async fn create_transaction(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let new = NewTransaction::from_json(req.amount.as_ref(), req.desc.as_ref())?;
    tracing::info!(amount = %new.amount(), description = new.description(), "adding transaction");

    let id = TransactionRepo::new(&state.pool).add_transaction(&new).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Transaction added successfully",
            id,
            timestamp: Utc::now().to_rfc3339(),
        }),
    ))
}

/// GET /transaction - list all transactions
async fn list_transactions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListResponse>, ApiError> {
    let records = TransactionRepo::new(&state.pool)
        .get_all_transactions()
        .await?;

    Ok(Json(ListResponse {
        result: records.into_iter().map(TransactionResponse::from).collect(),
    }))
}

/// DELETE /transaction - delete all transactions
async fn delete_all_transactions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = TransactionRepo::new(&state.pool)
        .delete_all_transactions()
        .await?;

    Ok(Json(DeletedResponse {
        message: "delete function execution finished.".to_string(),
        deleted,
    }))
}

/// GET /transaction/id - get a single transaction, id in body
async fn get_transaction_by_body(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<TransactionIdRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let id = parse_transaction_id(req.id.as_ref())?;
    find(&state, id).await
}

/// GET /transaction/{id} - get a single transaction
async fn get_transaction(
    State(state): State<Arc<AppState>>,
    ValidTransactionId(id): ValidTransactionId,
) -> Result<Json<TransactionResponse>, ApiError> {
    find(&state, id).await
}

/// DELETE /transaction/id - delete a single transaction, id in body
async fn delete_transaction_by_body(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<TransactionIdRequest>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let id = parse_transaction_id(req.id.as_ref())?;
    delete(&state, id).await
}

/// DELETE /transaction/{id} - delete a single transaction
async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    ValidTransactionId(id): ValidTransactionId,
) -> Result<Json<DeletedResponse>, ApiError> {
    delete(&state, id).await
}

async fn find(state: &AppState, id: i64) -> Result<Json<TransactionResponse>, ApiError> {
    let record = TransactionRepo::new(&state.pool)
        .find_transaction_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "transaction",
            id: id.to_string(),
        })?;

    Ok(Json(TransactionResponse::from(record)))
}

async fn delete(state: &AppState, id: i64) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = TransactionRepo::new(&state.pool)
        .delete_transaction_by_id(id)
        .await?;

    Ok(Json(DeletedResponse {
        message: format!("transaction with id {} deleted", id),
        deleted,
    }))
}

/// Transaction routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transaction",
            get(list_transactions)
                .post(create_transaction)
                .delete(delete_all_transactions),
        )
        .route(
            "/transaction/id",
            get(get_transaction_by_body).delete(delete_transaction_by_body),
        )
        .route(
            "/transaction/{id}",
            get(get_transaction).delete(delete_transaction),
        )
}
