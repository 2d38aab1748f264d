//! Client-side conversion with a per-base rate cache.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use conversions_types::{NewConversion, RateError, RateProvider, RateTable};

/// How long a fetched rate table is reused.
pub const RATES_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Please enter a valid amount (got {0})")]
    InvalidAmount(Decimal),

    #[error("Failed to fetch exchange rates: {0}")]
    Rates(#[from] RateError),

    #[error("Exchange rate not available for {from} to {to}")]
    RateNotAvailable { from: String, to: String },

    #[error("Converted amount is too large ({amount} {from} to {to})")]
    Overflow {
        amount: Decimal,
        from: String,
        to: String,
    },
}

/// Result of a conversion, ready to be displayed and recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub amount: Decimal,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub converted_amount: Decimal,
    /// Publication date of the rates, when the provider reports one
    pub rates_date: Option<NaiveDate>,
    pub fetched_at: DateTime<Utc>,
}

impl Conversion {
    /// `1 FROM = 0.900000 TO`
    pub fn rate_line(&self) -> String {
        format!(
            "1 {} = {:.6} {}",
            self.from_currency,
            self.rate.round_dp(6),
            self.to_currency
        )
    }

    /// `100.00 USD = 90.00 EUR`
    pub fn summary(&self) -> String {
        format!(
            "{:.2} {} = {:.2} {}",
            self.amount.round_dp(2),
            self.from_currency,
            self.converted_amount.round_dp(2),
            self.to_currency
        )
    }

    pub fn into_new_conversion(self) -> NewConversion {
        NewConversion {
            amount: self.amount,
            from_currency: self.from_currency,
            to_currency: self.to_currency,
            rate: self.rate,
            converted_amount: self.converted_amount,
        }
    }
}

struct CachedTable {
    table: RateTable,
    fetched_at: DateTime<Utc>,
}

impl CachedTable {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let ttl = TimeDelta::seconds(RATES_TTL.as_secs() as i64);
        now - self.fetched_at <= ttl
    }
}

/// Converts amounts using rates from `P`, keeping one table per base
/// currency until it expires.
pub struct Converter<P> {
    provider: P,
    cache: Mutex<HashMap<String, CachedTable>>,
}

impl<P: RateProvider> Converter<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn convert(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
    ) -> Result<Conversion, ConvertError> {
        self.convert_at(amount, from, to, Utc::now()).await
    }

    /// Same as [`Converter::convert`], with an explicit clock reading.
    #[instrument(skip(self))]
    pub async fn convert_at(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
        now: DateTime<Utc>,
    ) -> Result<Conversion, ConvertError> {
        if amount <= Decimal::ZERO {
            return Err(ConvertError::InvalidAmount(amount));
        }

        let mut cache = self.cache.lock().await;
        if !cache.get(from).is_some_and(|cached| cached.is_fresh(now)) {
            debug!(base = from, "Fetching exchange rates");
            let table = self.provider.latest(from).await?;
            cache.insert(
                from.to_string(),
                CachedTable {
                    table,
                    fetched_at: now,
                },
            );
        }
        let cached = &cache[from];

        let rate = cached
            .table
            .rate(to)
            .filter(|r| !r.is_zero())
            .ok_or_else(|| ConvertError::RateNotAvailable {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        let converted_amount = amount
            .checked_mul(rate)
            .ok_or_else(|| ConvertError::Overflow {
                amount,
                from: from.to_string(),
                to: to.to_string(),
            })?;

        Ok(Conversion {
            amount,
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            rate,
            converted_amount,
            rates_date: cached.table.date,
            fetched_at: cached.fetched_at,
        })
    }
}
