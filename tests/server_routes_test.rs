//! HTTP 路由集成测试
//!
//! 使用 tower 的 oneshot 直接驱动 axum Router，不经过真实监听端口。

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use draftpilot::config::AppConfig;
use draftpilot::server::{AppState, create_router};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

fn router() -> axum::Router {
    let config = AppConfig::default();
    create_router(Arc::new(AppState::new(&config)))
}

async fn post_json(router: axum::Router, path: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_module_endpoint_answers_200_with_in_band_error() {
    // no model config at all: the guard answers in English
    let (status, body) = post_json(router(), "/api/topic", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "error": "Please configure the API key and model ID on the home page." })
    );
}

#[tokio::test]
async fn test_module_endpoint_error_follows_request_language() {
    let (status, body) = post_json(
        router(),
        "/api/polish",
        json!({ "project": { "language": "zh" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "error": "请先在首页配置 API Key 与模型 ID。" }));
}

#[tokio::test]
async fn test_all_module_routes_are_wired() {
    for path in [
        "/api/topic",
        "/api/outline",
        "/api/draft",
        "/api/polish",
        "/api/search-refs",
        "/api/insert-refs",
    ] {
        let (status, body) = post_json(router(), path, json!({})).await;
        assert_eq!(status, StatusCode::OK, "route {} not wired", path);
        assert!(body.get("error").is_some(), "route {} should guard", path);
    }
}

#[tokio::test]
async fn test_models_endpoint_missing_key() {
    let (status, body) = post_json(router(), "/api/models", json!({ "model": {} })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "models": [], "error": "Missing API key" }));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/review")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
