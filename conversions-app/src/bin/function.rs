//! # Conversions Function
//!
//! Handles one function invocation: reads the event JSON from stdin, runs it
//! through the API router and prints the response JSON to stdout. Logs go to
//! stderr.

use tokio::io::AsyncReadExt;

use conversions_app::config::Config;
use conversions_app::{build_server, build_service, telemetry};
use conversions_hex::inbound::function;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let telemetry = telemetry::init(&config, "conversions-function", std::io::stderr)?;

    let mut raw_event = String::new();
    tokio::io::stdin().read_to_string(&mut raw_event).await?;

    // Nothing is kept between invocations
    let service = build_service(&config).await?;
    let router = build_server(&config, service).router();

    let response = function::invoke(router, &raw_event).await?;
    tracing::debug!(status = response.status_code, "Invocation handled");
    println!("{}", serde_json::to_string(&response)?);

    telemetry.shutdown();
    Ok(())
}
