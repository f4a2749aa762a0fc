// Plan preview API tests
// Exercise the HTTP surface in-process with tower's oneshot
//
// Numan Thabit 2025 Nov

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use common::*;
use maker_bridge::config::CoreConfig;
use maker_bridge::router::{create_api_router, ApiState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> axum::Router {
    create_api_router(ApiState {
        router: Arc::new(router()),
        config: CoreConfig::testnet(),
    })
}

async fn post_plan(body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/plan")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_is_ok() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn chains_lists_the_catalog() {
    let response = app()
        .oneshot(Request::get("/api/v1/chains").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let chains: Vec<Value> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(chains.len(), 7);
    assert_eq!(chains[0]["chainId"], "5");
}

#[tokio::test]
async fn plan_preview_resolves_strategy() {
    let (status, body) = post_plan(json!({
        "fromChain": "5",
        "toChain": "420",
        "fromCurrency": "ETH",
        "toCurrency": "ETH",
        "amount": "0.001",
        "sender": SENDER,
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["strategy"], "evm");
    assert_eq!(body["is_native"], true);
    assert!(body["instruction"].is_null());
}

#[tokio::test]
async fn plan_preview_maps_errors_to_statuses() {
    let (status, body) = post_plan(json!({
        "fromChain": "5",
        "toChain": "420",
        "fromCurrency": "WBTC",
        "toCurrency": "WBTC",
        "amount": "1",
        "sender": SENDER,
    }))
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "no_route_found");

    let (status, body) = post_plan(json!({
        "fromChain": "5",
        "toChain": "420",
        "fromCurrency": "ETH",
        "toCurrency": "ETH",
        "amount": "50",
        "sender": SENDER,
    }))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "out_of_bounds");
}

#[tokio::test]
async fn metrics_are_exposed() {
    let response = app()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
