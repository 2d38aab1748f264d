//! Function-per-request adapter.
//!
//! Serverless platforms hand each invocation over as a JSON event and expect a
//! JSON response back. This module translates such an event into an HTTP
//! request, runs it through the regular [`Router`](axum::Router), and turns
//! the router's response into the platform's response shape.

use std::collections::BTreeMap;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use tower::ServiceExt;

use conversions_types::ErrorResponse;

/// Path prefix under which the platform mounts deployed functions.
const FUNCTIONS_PREFIX: &str = "/.netlify/functions/";

/// An incoming invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    pub http_method: String,
    pub path: String,
    #[serde(default)]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

/// The reply handed back to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl FunctionResponse {
    /// A JSON error reply in the same shape the HTTP API uses.
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        let body = ErrorResponse {
            error: message.into(),
            code: status.as_u16(),
        };
        Self {
            status_code: status.as_u16(),
            headers: BTreeMap::from([("content-type".to_string(), "application/json".to_string())]),
            body: serde_json::to_string(&body).unwrap_or_default(),
            is_base64_encoded: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FunctionError {
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Maps `/.netlify/functions/<name>/rest` onto `/api/rest`. Other paths are
/// returned unchanged.
pub fn rewrite_path(path: &str) -> String {
    let Some(rest) = path.strip_prefix(FUNCTIONS_PREFIX) else {
        return path.to_string();
    };

    match rest.find('/') {
        Some(idx) => format!("/api{}", &rest[idx..]),
        None => "/api".to_string(),
    }
}

fn build_request(event: FunctionEvent) -> Result<Request<Body>, FunctionError> {
    let method = Method::from_bytes(event.http_method.as_bytes())
        .map_err(|e| FunctionError::InvalidEvent(e.to_string()))?;

    let mut uri = rewrite_path(&event.path);
    if let Some(params) = event.query_string_parameters.filter(|p| !p.is_empty()) {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter())
            .finish();
        uri.push('?');
        uri.push_str(&query);
    }

    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in event.headers.unwrap_or_default() {
        builder = builder.header(name, value);
    }

    builder
        .body(Body::from(event.body.unwrap_or_default()))
        .map_err(|e| FunctionError::InvalidEvent(e.to_string()))
}

/// Runs one event through `router`.
///
/// Base64-encoded bodies are not supported and are answered with 400.
#[tracing::instrument(skip(router, event), fields(method = %event.http_method, path = %event.path))]
pub async fn dispatch(router: Router, event: FunctionEvent) -> Result<FunctionResponse, FunctionError> {
    if event.is_base64_encoded {
        return Ok(FunctionResponse::error(
            StatusCode::BAD_REQUEST,
            "Base64-encoded bodies are not supported",
        ));
    }

    let request = match build_request(event) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Rejecting function event");
            return Ok(FunctionResponse::error(StatusCode::BAD_REQUEST, e.to_string()));
        }
    };

    let response = router
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {});

    let status_code = response.status().as_u16();
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in response.headers() {
        let Ok(value) = value.to_str() else { continue };
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    let bytes = response
        .into_body()
        .collect()
        .await
        .map_err(|e| FunctionError::Body(e.to_string()))?
        .to_bytes();
    let body = String::from_utf8(bytes.to_vec()).map_err(|e| FunctionError::Body(e.to_string()))?;

    Ok(FunctionResponse {
        status_code,
        headers,
        body,
        is_base64_encoded: false,
    })
}

/// Parses a raw JSON event and runs it through `router`. An event that cannot
/// be parsed is answered with 400.
pub async fn invoke(router: Router, raw_event: &str) -> Result<FunctionResponse, FunctionError> {
    match serde_json::from_str::<FunctionEvent>(raw_event) {
        Ok(event) => dispatch(router, event).await,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed function event");
            Ok(FunctionResponse::error(
                StatusCode::BAD_REQUEST,
                "Malformed function event",
            ))
        }
    }
}
