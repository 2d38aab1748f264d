//! # Conversions Client SDK
//!
//! A typed Rust client for the Conversions API.

use conversions_types::{
    ConversionRecord, CurrencyCount, HealthResponse, NewConversion, PairStat,
    SaveConversionRequest, SavedConversion,
};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Conversions API client.
#[derive(Debug, Clone)]
pub struct ConversionsClient {
    base_url: String,
    http: Client,
}

impl ConversionsClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the health report.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get("/api/health", &[]).await
    }

    /// Records a completed conversion.
    pub async fn save_conversion(
        &self,
        conversion: NewConversion,
    ) -> Result<SavedConversion, ClientError> {
        let req = SaveConversionRequest::from(conversion);
        self.post("/api/conversions", &req).await
    }

    /// Most recent conversions first. The server applies its default when
    /// `limit` is `None`.
    pub async fn history(&self, limit: Option<i64>) -> Result<Vec<ConversionRecord>, ClientError> {
        match limit {
            Some(limit) => {
                self.get("/api/conversions", &[("limit", limit.to_string())])
                    .await
            }
            None => self.get("/api/conversions", &[]).await,
        }
    }

    /// Most frequent currency pairs.
    pub async fn stats(&self) -> Result<Vec<PairStat>, ClientError> {
        self.get("/api/stats", &[]).await
    }

    /// Per-currency usage counts.
    pub async fn distribution(&self) -> Result<Vec<CurrencyCount>, ClientError> {
        self.get("/api/distribution", &[]).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ConversionsClient::new("http://localhost:5000");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = ConversionsClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api {
            status: 400,
            message: "Missing required fields".into(),
        };
        assert_eq!(err.to_string(), "API error: 400 - Missing required fields");
    }
}
