//! Exchange rate provider port.
//!
//! This trait defines the interface for live exchange rate services.
//! Implementations can be HTTP clients, static tables, etc.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Error type for exchange rate operations.
#[derive(Debug, thiserror::Error)]
pub enum RateError {
    #[error("Request failed: {0}")]
    Http(String),

    #[error("API error: {0}")]
    Status(u16),

    #[error("Provider reported failure: {0}")]
    Unsuccessful(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
}

/// Rates for one base currency, as published by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub base: String,
    /// Publication date reported by the provider, if any
    pub date: Option<NaiveDate>,
    /// Units of each currency per unit of `base`
    pub rates: BTreeMap<String, Decimal>,
}

impl RateTable {
    /// Returns the rate from the base currency to `to`.
    pub fn rate(&self, to: &str) -> Option<Decimal> {
        self.rates.get(to).copied()
    }
}

/// Port trait for exchange rate providers.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    /// Lists supported currency codes with their descriptions.
    async fn symbols(&self) -> Result<BTreeMap<String, String>, RateError>;

    /// Fetches the latest rates for `base`.
    async fn latest(&self, base: &str) -> Result<RateTable, RateError>;
}
