//! Integration tests for rate limiting middleware.
//!
//! These tests verify the HTTP-level behavior of rate limiting,
//! including 429 responses and proper integration with the middleware stack.

use std::num::NonZeroU32;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use conversions_hex::{ConversionService, inbound::HttpServer};
use conversions_repo::SqliteRepo;

/// Helper to create a test server with a very low rate limit.
async fn create_test_server(requests_per_minute: u32) -> HttpServer<SqliteRepo> {
    // Use in-memory SQLite for tests
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let service = ConversionService::new(repo);
    HttpServer::with_rate_limit(service, NonZeroU32::new(requests_per_minute).unwrap())
}

fn health_request() -> Request<Body> {
    Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap()
}

/// A history request from the given client address.
fn history_request(client: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/conversions");
    if let Some(ip) = client {
        builder = builder.header("X-Forwarded-For", ip);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_rate_limiting_returns_429_when_exceeded() {
    let server = create_test_server(3).await;
    let app = server.router();

    for i in 1..=3 {
        let response = app
            .clone()
            .oneshot(history_request(Some("198.51.100.1")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "request {i} should pass");
    }

    let response = app
        .clone()
        .oneshot(history_request(Some("198.51.100.1")))
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::TOO_MANY_REQUESTS,
        "Request should be rate limited after exceeding quota"
    );

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("application/json"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("Rate limit exceeded")
    );
    assert_eq!(json["retry_after_seconds"], 60);
}

#[tokio::test]
async fn test_rate_limiting_health_endpoint_bypassed() {
    let server = create_test_server(1).await;
    let app = server.router();

    for _ in 0..10 {
        let response = app.clone().oneshot(health_request()).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Health endpoint should not be rate limited"
        );
    }
}

#[tokio::test]
async fn test_rate_limiting_per_client_isolation() {
    let server = create_test_server(1).await;
    let app = server.router();

    let first = app
        .clone()
        .oneshot(history_request(Some("198.51.100.1")))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let limited = app
        .clone()
        .oneshot(history_request(Some("198.51.100.1, 10.0.0.1")))
        .await
        .unwrap();
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);

    // A different client still has its own quota
    let other = app
        .clone()
        .oneshot(history_request(Some("203.0.113.9")))
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::OK);

    // So do clients without a forwarded address
    let anonymous = app.clone().oneshot(history_request(None)).await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_no_rate_limit_by_default() {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let app = HttpServer::new(ConversionService::new(repo)).router();

    for _ in 0..50 {
        let response = app.clone().oneshot(history_request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
