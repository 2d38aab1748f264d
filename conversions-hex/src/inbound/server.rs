//! HTTP Server configuration and startup.

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use conversions_types::ConversionRepository;

use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use crate::ConversionService;
use crate::openapi::ApiDoc;

/// HTTP Server for the Conversions API.
pub struct HttpServer<R: ConversionRepository> {
    state: Arc<AppState<R>>,
    rate_limiter: Option<Arc<RateLimiterState>>,
}

impl<R: ConversionRepository> HttpServer<R> {
    /// Creates a new HTTP server with the given service. Requests are not
    /// rate limited.
    pub fn new(service: ConversionService<R>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: None,
        }
    }

    /// Creates a new HTTP server that limits each client to
    /// `requests_per_minute`.
    pub fn with_rate_limit(service: ConversionService<R>, requests_per_minute: NonZeroU32) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Some(Arc::new(RateLimiterState::per_minute(
                requests_per_minute,
            ))),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        let mut router = Router::new()
            .route("/api/health", get(handlers::health))
            .route(
                "/api/conversions",
                post(handlers::save_conversion::<R>).get(handlers::conversion_history::<R>),
            )
            .route("/api/stats", get(handlers::pair_stats::<R>))
            .route(
                "/api/distribution",
                get(handlers::currency_distribution::<R>),
            )
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .layer(metrics);

        if let Some(limiter) = &self.rate_limiter {
            router = router.layer(middleware::from_fn_with_state(
                limiter.clone(),
                rate_limit_middleware,
            ));
        }

        router
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
