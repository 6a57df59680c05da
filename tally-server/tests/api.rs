//! HTTP API against a live PostgreSQL database

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tower::ServiceExt;

use tally_server::build_router;

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires database"]
async fn transaction_lifecycle(_: PgPoolOptions, options: PgConnectOptions) {
    let app = build_router(common::pool(options));

    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, empty) = call(&app, "GET", "/transaction", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["result"], json!([]));

    let (status, created) = call(
        &app,
        "POST",
        "/transaction",
        Some(json!({"amount": "19.99", "desc": "books"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().expect("id in response");

    let (status, list) = call(&app, "GET", "/transaction", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        list["result"],
        json!([{"id": id, "amount": "19.99", "description": "books"}])
    );

    let (status, one) = call(&app, "GET", "/transaction/id", Some(json!({"id": id}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["description"], "books");

    let (status, one) = call(&app, "GET", &format!("/transaction/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["amount"], "19.99");

    let (status, deleted) = call(&app, "DELETE", "/transaction/id", Some(json!({"id": id}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["deleted"], 1);

    let (status, missing) = call(&app, "GET", &format!("/transaction/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["error"], "not_found");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires database"]
async fn numeric_amount_accepted(_: PgPoolOptions, options: PgConnectOptions) {
    let app = build_router(common::pool(options));

    let (status, created) = call(
        &app,
        "POST",
        "/transaction",
        Some(json!({"amount": 7, "description": "alias field"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_i64().unwrap();
    let (_, one) = call(&app, "GET", &format!("/transaction/{id}"), None).await;
    assert_eq!(one["amount"], "7");
    assert_eq!(one["description"], "alias field");
}
