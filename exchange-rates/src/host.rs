//! HTTP adapter for exchangerate.host-compatible rate APIs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use conversions_types::{RateError, RateProvider, RateTable};

pub const DEFAULT_API_URL: &str = "https://api.exchangerate.host";

/// Rate provider backed by `GET /symbols` and `GET /latest?base=CODE`.
#[derive(Debug, Clone)]
pub struct ExchangeRateHost {
    base_url: String,
    access_key: Option<String>,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ProviderFailure {
    #[serde(rename = "type")]
    kind: Option<String>,
    info: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
    description: String,
}

#[derive(Debug, Deserialize)]
struct SymbolsResponse {
    #[serde(default)]
    success: bool,
    symbols: Option<BTreeMap<String, SymbolInfo>>,
    error: Option<ProviderFailure>,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    success: bool,
    base: Option<String>,
    date: Option<String>,
    rates: Option<BTreeMap<String, Decimal>>,
    error: Option<ProviderFailure>,
}

fn unsuccessful(context: &str, failure: Option<ProviderFailure>) -> RateError {
    let detail = failure.and_then(|f| f.info.or(f.kind));
    match detail {
        Some(detail) => RateError::Unsuccessful(format!("{context}: {detail}")),
        None => RateError::Unsuccessful(context.to_string()),
    }
}

impl ExchangeRateHost {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: None,
            http: reqwest::Client::new(),
        }
    }

    /// Sends `access_key` with every request.
    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RateError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.get(&url).query(query);
        if let Some(key) = &self.access_key {
            request = request.query(&[("access_key", key.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RateError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RateError::Http(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| RateError::Malformed(e.to_string()))
    }
}

impl Default for ExchangeRateHost {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[async_trait]
impl RateProvider for ExchangeRateHost {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn symbols(&self) -> Result<BTreeMap<String, String>, RateError> {
        let response: SymbolsResponse = self.get("/symbols", &[]).await?;
        if !response.success {
            return Err(unsuccessful("Failed to fetch currencies", response.error));
        }

        let symbols = response
            .symbols
            .ok_or_else(|| RateError::Malformed("missing `symbols`".into()))?;
        debug!(count = symbols.len(), "Fetched currency symbols");

        Ok(symbols
            .into_iter()
            .map(|(code, info)| (code, info.description))
            .collect())
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn latest(&self, base: &str) -> Result<RateTable, RateError> {
        let response: LatestResponse = self.get("/latest", &[("base", base)]).await?;
        if !response.success {
            return Err(unsuccessful(
                "Failed to fetch exchange rates",
                response.error,
            ));
        }

        let rates = response
            .rates
            .ok_or_else(|| RateError::Malformed("missing `rates`".into()))?;
        let date = response
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
        debug!(count = rates.len(), ?date, "Fetched exchange rates");

        Ok(RateTable {
            base: response.base.unwrap_or_else(|| base.to_string()),
            date,
            rates,
        })
    }
}
