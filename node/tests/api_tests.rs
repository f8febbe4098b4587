// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::FaultyStore;
use herostats_kernel::Roster;
use herostats_node::api::{ErrorResponse, SubmitMatchResponse};
use herostats_node::config::NodeConfig;
use herostats_node::server::{build_router, AppState};
use herostats_node::store::{KeyedStore, MemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

fn app_with(store: Arc<dyn KeyedStore>) -> Router {
    let state = AppState::new(store, Roster::standard(), &NodeConfig::default());
    build_router(state, None)
}

fn post_match(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/match")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn dorado_body() -> String {
    json!({
        "map": "Dorado",
        "winning-team": ["Tracer", "Reinhardt"],
        "losing-team": ["Widowmaker"]
    })
    .to_string()
}

#[tokio::test]
async fn test_post_match_then_read_every_category() {
    let app = app_with(Arc::new(MemoryStore::new()));

    let response = app.clone().oneshot(post_match(dorado_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let receipt: SubmitMatchResponse = body_json(response).await;
    assert_eq!(receipt.map_performance_updates, 3);
    assert_eq!(receipt.matchup_updates, 4);
    assert_eq!(receipt.synergy_updates, 2);

    let response = app.clone().oneshot(get("/api/maps")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let maps: Value = body_json(response).await;
    assert_eq!(maps["Widowmaker-on-Dorado"], json!({"total": 1, "wins": 0}));

    let matchups: Value = body_json(app.clone().oneshot(get("/api/matchups")).await.unwrap()).await;
    assert_eq!(matchups["Widowmaker-vs-Reinhardt"], json!({"total": 1}));
    assert_eq!(matchups["Reinhardt-vs-Widowmaker"], json!({"total": 1, "wins": 1}));

    let synergy: Value = body_json(app.clone().oneshot(get("/api/synergy")).await.unwrap()).await;
    assert_eq!(synergy.as_object().unwrap().len(), 2);

    let history: Value = body_json(app.oneshot(get("/api/history")).await.unwrap()).await;
    assert_eq!(history[&receipt.id]["winning-team"], json!(["Tracer", "Reinhardt"]));
}

#[tokio::test]
async fn test_bad_bodies_are_400() {
    let store = Arc::new(MemoryStore::new());
    let app = app_with(store.clone());

    let response = app.clone().oneshot(post_match("{not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = body_json(response).await;
    assert_eq!(err.error, "Invalid JSON");

    // Well-formed JSON of the wrong shape is still invalid JSON for this endpoint.
    let response = app.clone().oneshot(post_match(r#"{"map": 7}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let nowhere = json!({"map": "Nowhereville", "winning-team": ["Tracer"], "losing-team": []});
    let response = app.clone().oneshot(post_match(nowhere.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = body_json(response).await;
    assert_eq!(err.error, "Bad Request");

    let unknown_hero = json!({"map": "Dorado", "winning-team": ["Tracer"], "losing-team": ["Gandalf"]});
    let response = app.clone().oneshot(post_match(unknown_hero.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let crowd = vec!["Ana"; 7];
    let oversized = json!({"map": "Dorado", "winning-team": crowd, "losing-team": ["Mei"]});
    let response = app.oneshot(post_match(oversized.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = body_json(response).await;
    assert_eq!(err.error, "Bad Request");

    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn test_match_endpoint_is_post_only() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let response = app.clone().oneshot(get("/api/match")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let put = Request::builder()
        .method("PUT")
        .uri("/api/match")
        .body(Body::from(dorado_body()))
        .unwrap();
    assert_eq!(app.oneshot(put).await.unwrap().status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_empty_store_reads_empty_objects() {
    let app = app_with(Arc::new(MemoryStore::new()));
    for uri in ["/api/history", "/api/matchups", "/api/synergy", "/api/maps"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        let body: Value = body_json(response).await;
        assert_eq!(body, json!({}), "{}", uri);
    }
}

#[tokio::test]
async fn test_store_failures_are_500() {
    let app = app_with(Arc::new(FaultyStore {
        fail_get: true,
        fail_push: true,
        ..Default::default()
    }));

    let response = app.clone().oneshot(get("/api/maps")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err: ErrorResponse = body_json(response).await;
    assert_eq!(err.error, "Failed to get data from database");

    let response = app.oneshot(post_match(dorado_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err: ErrorResponse = body_json(response).await;
    assert_eq!(err.error, "Failed to add match data");
}

#[tokio::test]
async fn test_aggregate_failure_is_500() {
    let app = app_with(Arc::new(FaultyStore {
        broken_path: Some("synergy/Tracer-with-Reinhardt".into()),
        ..Default::default()
    }));
    let response = app.oneshot(post_match(dorado_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err: ErrorResponse = body_json(response).await;
    assert_eq!(err.error, "Failed to update stats");
}

#[tokio::test]
async fn test_cors_headers() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let req = Request::builder()
        .uri("/api/maps")
        .header("origin", "https://dashboard.example")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    let preflight = Request::builder()
        .method("OPTIONS")
        .uri("/api/match")
        .header("origin", "https://dashboard.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(preflight).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let methods = response.headers()["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("POST"));
}

#[tokio::test]
async fn test_static_fallback_serves_index() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>dashboard</html>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();

    let state = AppState::new(Arc::new(MemoryStore::new()), Roster::standard(), &NodeConfig::default());
    let app = build_router(state, Some(dir.path().to_path_buf()));

    let response = app.clone().oneshot(get("/app.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], b"console.log(1)");

    let response = app.clone().oneshot(get("/heroes/tracer")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], b"<html>dashboard</html>");

    // API routes still win over the fallback.
    let response = app.oneshot(get("/api/maps")).await.unwrap();
    let body: Value = body_json(response).await;
    assert_eq!(body, json!({}));
}
