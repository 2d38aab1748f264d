//! # Conversions Application
//!
//! Wiring shared by the two entry points:
//! - `conversions-server` - long-lived HTTP server
//! - `conversions-function` - handles a single function invocation and exits
//!
//! Both load [`Config`](config::Config) from the environment, initialize
//! tracing, build the repository and serve the same router.

pub mod config;
pub mod telemetry;

use conversions_hex::{ConversionService, inbound::HttpServer};
use conversions_repo::{Repo, RepoOptions};

use crate::config::Config;

/// Connects to the configured database, creating the schema if needed.
///
/// Any failure here is fatal for the caller.
pub async fn build_service(config: &Config) -> anyhow::Result<ConversionService<Repo>> {
    let options = RepoOptions {
        max_connections: config.database_max_connections,
    };
    let repo = Repo::new(&config.database_url, &options).await?;
    Ok(ConversionService::new(repo))
}

/// Wraps `service` in an HTTP server, rate limited when configured.
pub fn build_server(config: &Config, service: ConversionService<Repo>) -> HttpServer<Repo> {
    match config.rate_limit_per_minute {
        Some(limit) => {
            tracing::info!("Rate limiting enabled: {} requests/minute per client", limit);
            HttpServer::with_rate_limit(service, limit)
        }
        None => HttpServer::new(service),
    }
}

/// Scheme of a database URL, safe to log.
pub fn database_kind(database_url: &str) -> &str {
    database_url.split(':').next().unwrap_or_default()
}
