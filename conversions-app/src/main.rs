//! # Conversions Server
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository adapter
//! - Create the conversion service
//! - Start the HTTP server

use conversions_app::config::Config;
use conversions_app::{build_server, build_service, database_kind, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let telemetry = telemetry::init(&config, "conversions-service", std::io::stdout)?;

    tracing::info!("Starting conversions server on {}", config.bind_addr());
    tracing::info!("Using database: {}", database_kind(&config.database_url));

    // Build repository (handles connection and schema creation)
    let service = build_service(&config).await?;

    let server = build_server(&config, service);
    server.run(&config.bind_addr()).await?;

    // Ensure traces are flushed before exit
    telemetry.shutdown();
    Ok(())
}
