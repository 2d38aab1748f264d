//! Client example demonstrating the conversion log against a running server.
//!
//! Run with: cargo run -p conversions-app --example client_example --no-default-features --features sqlite

use conversions_client::ConversionsClient;
use conversions_hex::{ConversionService, inbound::HttpServer};
use conversions_repo::build_repo;
use conversions_types::NewConversion;
use rust_decimal::Decimal;
use std::net::SocketAddr;
use tempfile::tempdir;
use tokio::net::TcpListener;

fn conversion(amount: i64, from: &str, to: &str, rate: Decimal) -> NewConversion {
    let amount = Decimal::from(amount);
    NewConversion {
        amount,
        from_currency: from.into(),
        to_currency: to.into(),
        rate,
        converted_amount: amount * rate,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Bind to an available port
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;

    // Use a temp file-backed SQLite DB
    let tmp = tempdir()?;
    let db_path = tmp.path().join("conversions.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    println!("🚀 Starting server on {addr}...");
    println!("   Database: {db_url}");

    // Build repository (handles connection and schema creation)
    let repo = build_repo(&db_url).await?;

    // Start server in background
    let router = HttpServer::new(ConversionService::new(repo)).router();
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router.into_make_service()).await {
            eprintln!("server error: {e}");
        }
    });

    let client = ConversionsClient::new(format!("http://{addr}"));

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: record a few conversions and read them back
    // ─────────────────────────────────────────────────────────────────────────

    let health = client.health().await?;
    println!("✅ {}", health.message);

    let eur = Decimal::new(92, 2);
    let usd = Decimal::new(1087, 3);
    for c in [
        conversion(100, "USD", "EUR", eur),
        conversion(250, "USD", "EUR", eur),
        conversion(40, "EUR", "USD", usd),
    ] {
        let summary = format!("{} {} -> {} {}", c.amount, c.from_currency, c.converted_amount, c.to_currency);
        let saved = client.save_conversion(c).await?;
        println!("✅ Saved #{} ({summary})", saved.id);
    }

    // Validation is enforced by the server
    let rejected = client
        .save_conversion(conversion(0, "USD", "EUR", eur))
        .await;
    println!("✅ Zero amount rejected: {}", rejected.unwrap_err());

    println!("\n📋 Latest conversions:");
    for record in client.history(Some(2)).await? {
        println!(
            "   #{} {} {} -> {} {} at {}",
            record.id,
            record.amount,
            record.from_currency,
            record.converted_amount,
            record.to_currency,
            record.created_at
        );
    }

    println!("\n📊 Popular pairs:");
    for stat in client.stats().await? {
        println!("   {} -> {}: {}", stat.from_currency, stat.to_currency, stat.count);
    }

    println!("\n🌍 Currency usage:");
    for entry in client.distribution().await? {
        println!("   {}: {}", entry.currency_code, entry.count);
    }

    println!("\n🎉 Example completed successfully!");

    Ok(())
}
