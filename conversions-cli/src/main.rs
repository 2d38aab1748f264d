//! Conversions CLI
//!
//! Converts amounts with live exchange rates, records every conversion in the
//! conversion log API and shows the log's history and statistics.

mod output;

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use conversions_client::ConversionsClient;
use exchange_rates::{
    CatalogSource, Converter, ExchangeRateHost, RateError, RateProvider, RateTable, StaticRates,
    currency_catalog,
};

#[derive(Parser)]
#[command(name = "conversions")]
#[command(author, version, about = "Currency converter and conversion log client", long_about = None)]
struct Cli {
    /// Base URL of the Conversions API
    #[arg(
        long,
        env = "CONVERSIONS_API_URL",
        default_value = "http://localhost:5000"
    )]
    api_url: String,

    /// Base URL of the exchange rate API
    #[arg(
        long,
        env = "EXCHANGE_RATES_API_URL",
        default_value = exchange_rates::DEFAULT_API_URL
    )]
    rates_url: String,

    /// Access key for the exchange rate API
    #[arg(long, env = "EXCHANGE_RATES_ACCESS_KEY", hide_env_values = true)]
    rates_access_key: Option<String>,

    /// Use the built-in development rates instead of the exchange rate API
    #[arg(long)]
    offline: bool,

    /// Print API results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an amount and record the conversion
    Convert {
        /// Amount in the source currency
        amount: Decimal,
        /// Source currency code, e.g. USD
        from: String,
        /// Target currency code, e.g. EUR
        to: String,
    },
    /// List available currencies
    Currencies,
    /// Show the latest rates for a base currency
    Rates {
        /// Base currency code
        #[arg(default_value = "USD")]
        base: String,
    },
    /// Show recent conversions
    History {
        /// Maximum number of conversions to show
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Show the most frequent currency pairs
    Stats,
    /// Show how often each currency is used
    Distribution,
    /// Check API health
    Health,
}

/// Rate source selected on the command line.
enum Rates {
    Live(ExchangeRateHost),
    Offline(StaticRates),
}

impl Rates {
    fn from_cli(cli: &Cli) -> Self {
        if cli.offline {
            return Rates::Offline(StaticRates);
        }
        let mut host = ExchangeRateHost::new(&cli.rates_url);
        if let Some(key) = &cli.rates_access_key {
            host = host.with_access_key(key.clone());
        }
        Rates::Live(host)
    }
}

#[async_trait]
impl RateProvider for Rates {
    async fn symbols(&self) -> Result<BTreeMap<String, String>, RateError> {
        match self {
            Rates::Live(host) => host.symbols().await,
            Rates::Offline(table) => table.symbols().await,
        }
    }

    async fn latest(&self, base: &str) -> Result<RateTable, RateError> {
        match self {
            Rates::Live(host) => host.latest(base).await,
            Rates::Offline(table) => table.latest(base).await,
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ConversionsClient::new(&cli.api_url);
    let rates = Rates::from_cli(&cli);

    match cli.command {
        Commands::Health => {
            let health = client.health().await?;
            println!("✓ {}", health.message);
        }

        Commands::Convert { amount, from, to } => {
            let converter = Converter::new(rates);
            let conversion = converter
                .convert(amount, &from.to_uppercase(), &to.to_uppercase())
                .await
                .map_err(|e| anyhow::anyhow!("Conversion failed: {e}"))?;

            println!("{}", conversion.summary());
            println!("{}", conversion.rate_line());
            if let Some(date) = conversion.rates_date {
                println!("Rates as of {date}");
            }

            // The conversion stands even if it cannot be recorded
            match client.save_conversion(conversion.into_new_conversion()).await {
                Ok(saved) => println!("Saved as #{}", saved.id),
                Err(e) => eprintln!("⚠ Failed to save conversion: {e}"),
            }

            println!();
            match client.history(None).await {
                Ok(records) => output::print_history(&records),
                Err(e) => eprintln!("⚠ Failed to load conversion history: {e}"),
            }
        }

        Commands::Currencies => {
            let catalog = currency_catalog(&rates).await;
            if cli.json {
                return print_json(&catalog.entries);
            }
            if catalog.source == CatalogSource::Fallback {
                eprintln!("Using the built-in currency list");
            }
            for (code, name) in catalog.ordered() {
                println!("{code}  {name}");
            }
        }

        Commands::Rates { base } => {
            let table = rates.latest(&base.to_uppercase()).await?;
            if cli.json {
                return print_json(&table.rates);
            }
            if let Some(date) = table.date {
                println!("Rates for 1 {} as of {date}", table.base);
            } else {
                println!("Rates for 1 {}", table.base);
            }
            for (code, rate) in &table.rates {
                println!("{code}  {:.6}", rate.round_dp(6));
            }
        }

        Commands::History { limit } => {
            let records = client.history(limit).await?;
            if cli.json {
                return print_json(&records);
            }
            output::print_history(&records);
        }

        Commands::Stats => {
            let stats = client.stats().await?;
            if cli.json {
                return print_json(&stats);
            }
            for stat in &stats {
                println!("{}", output::stat_line(stat));
            }
        }

        Commands::Distribution => {
            let distribution = client.distribution().await?;
            if cli.json {
                return print_json(&distribution);
            }
            for entry in &distribution {
                println!("{}", output::distribution_line(entry));
            }
        }
    }

    Ok(())
}
