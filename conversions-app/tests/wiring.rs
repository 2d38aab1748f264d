//! Startup wiring against a file-backed SQLite database.
//!
//! This test requires the `sqlite` feature flag.

#![cfg(feature = "sqlite")]

use axum::{body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use conversions_app::config::Config;
use conversions_app::{build_server, build_service};

fn config(database_url: &str, rate_limit: Option<&str>) -> Config {
    let database_url = database_url.to_string();
    let rate_limit = rate_limit.map(String::from);
    Config::from_lookup(move |name| match name {
        "DATABASE_URL" => Some(database_url.clone()),
        "RATE_LIMIT_PER_MINUTE" => rate_limit.clone(),
        _ => None,
    })
    .unwrap()
}

fn stats_request() -> Request<Body> {
    Request::builder()
        .uri("/api/stats")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_service_persists_across_restarts() {
    let tmp = tempfile::tempdir().unwrap();
    let url = format!(
        "sqlite://{}?mode=rwc",
        tmp.path().join("conversions.db").display()
    );
    let config = config(&url, None);

    let router = build_server(&config, build_service(&config).await.unwrap()).router();
    let request = Request::builder()
        .method("POST")
        .uri("/api/conversions")
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"amount":100,"fromCurrency":"USD","toCurrency":"EUR","rate":0.9,"convertedAmount":90}"#,
        ))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // A fresh service sees the record written by the first one
    let router = build_server(&config, build_service(&config).await.unwrap()).router();
    let response = router.oneshot(stats_request()).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json[0]["count"], 1);
}

#[tokio::test]
async fn test_configured_rate_limit_is_applied() {
    let config = config("sqlite::memory:", Some("1"));
    let router = build_server(&config, build_service(&config).await.unwrap()).router();

    let first = router.clone().oneshot(stats_request()).await.unwrap();
    let second = router.oneshot(stats_request()).await.unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_unsupported_database_url_is_fatal() {
    let config = config("mysql://localhost/conversions", None);

    assert!(build_service(&config).await.is_err());
}
