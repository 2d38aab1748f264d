//! Rate limiting middleware using Governor.
//!
//! Implements per-client rate limiting with a token bucket algorithm. Clients
//! are told apart by the first `X-Forwarded-For` hop, which the proxy in front
//! of the service is expected to set. The number of tracked clients is
//! bounded, so invented header values cannot grow the table without limit.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde_json::json;
use std::{
    num::NonZeroU32,
    sync::Arc,
    time::{Duration, Instant},
};

const ANONYMOUS: &str = "anonymous";

/// Upper bound on the number of clients tracked individually.
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// A per-minute bucket left alone this long is full again.
const REFILL_PERIOD: Duration = Duration::from_secs(60);

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

struct ClientBucket {
    limiter: DirectLimiter,
    last_seen: Instant,
}

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// Per-client buckets, at most `max_clients` of them
    clients: DashMap<String, ClientBucket>,
    /// Shared by new clients while the table is full of active ones
    overflow: DirectLimiter,
    /// Quota for new clients
    quota: Quota,
    max_clients: usize,
}

impl RateLimiterState {
    /// Allows `requests_per_minute` requests per client, all of which may be
    /// spent in a single burst.
    pub fn per_minute(requests_per_minute: NonZeroU32) -> Self {
        Self::with_capacity(Quota::per_minute(requests_per_minute), MAX_TRACKED_CLIENTS)
    }

    fn with_capacity(quota: Quota, max_clients: usize) -> Self {
        Self {
            clients: DashMap::new(),
            overflow: RateLimiter::direct(quota),
            quota,
            max_clients,
        }
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        if let Some(mut bucket) = self.clients.get_mut(key) {
            bucket.last_seen = now;
            return bucket.limiter.check().is_ok();
        }

        if self.clients.len() >= self.max_clients {
            // Dropping a refilled bucket is invisible to its client
            self.clients
                .retain(|_, bucket| now.saturating_duration_since(bucket.last_seen) < REFILL_PERIOD);
        }
        if self.clients.len() >= self.max_clients {
            tracing::debug!(client = %key, "Client table full, using shared bucket");
            return self.overflow.check().is_ok();
        }

        let mut bucket = self
            .clients
            .entry(key.to_string())
            .or_insert_with(|| ClientBucket {
                limiter: RateLimiter::direct(self.quota),
                last_seen: now,
            });
        bucket.last_seen = now;
        bucket.limiter.check().is_ok()
    }
}

/// First `X-Forwarded-For` hop, or a shared key for direct clients.
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(ANONYMOUS)
        .to_string()
}

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Health checks are never limited
    if request.uri().path() == "/api/health" {
        return next.run(request).await;
    }

    let key = client_key(request.headers());

    if !limiter.check(&key) {
        tracing::warn!(client = %key, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "retry_after_seconds": 60
            })),
        )
            .into_response();
    }

    next.run(request).await
}
