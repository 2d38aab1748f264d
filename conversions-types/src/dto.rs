//! Data Transfer Objects (DTOs) for requests and responses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{DEFAULT_HISTORY_LIMIT, NewConversion};
use crate::error::DomainError;

// ─────────────────────────────────────────────────────────────────────────────
// Conversion DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to record a completed conversion.
///
/// Every field is required. Numbers may be sent as JSON numbers or numeric
/// strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveConversionRequest {
    /// Amount in the source currency
    #[schema(value_type = Option<f64>, example = 100)]
    pub amount: Option<Decimal>,
    #[schema(example = "USD")]
    pub from_currency: Option<String>,
    #[schema(example = "EUR")]
    pub to_currency: Option<String>,
    /// Units of target currency per unit of source currency
    #[schema(value_type = Option<f64>, example = 0.9)]
    pub rate: Option<Decimal>,
    #[schema(value_type = Option<f64>, example = 90)]
    pub converted_amount: Option<Decimal>,
}

impl SaveConversionRequest {
    /// Checks that every field is present and truthy.
    ///
    /// A field counts as missing when it is absent, an empty string, or a
    /// numeric zero. Zero is checked on the parsed decimal, so `"0.00"` is
    /// missing too. Negative numbers are accepted.
    pub fn validate(self) -> Result<NewConversion, DomainError> {
        fn number(value: Option<Decimal>) -> Result<Decimal, DomainError> {
            value
                .filter(|d| !d.is_zero())
                .ok_or(DomainError::MissingFields)
        }

        fn code(value: Option<String>) -> Result<String, DomainError> {
            value
                .filter(|s| !s.is_empty())
                .ok_or(DomainError::MissingFields)
        }

        Ok(NewConversion {
            amount: number(self.amount)?,
            from_currency: code(self.from_currency)?,
            to_currency: code(self.to_currency)?,
            rate: number(self.rate)?,
            converted_amount: number(self.converted_amount)?,
        })
    }
}

impl From<NewConversion> for SaveConversionRequest {
    fn from(c: NewConversion) -> Self {
        Self {
            amount: Some(c.amount),
            from_currency: Some(c.from_currency),
            to_currency: Some(c.to_currency),
            rate: Some(c.rate),
            converted_amount: Some(c.converted_amount),
        }
    }
}

/// Query parameters for the history endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Maximum number of records to return (default 10)
    #[param(value_type = Option<i64>, example = 10)]
    pub limit: Option<String>,
}

impl HistoryQuery {
    /// Resolves the effective limit.
    ///
    /// Absent, non-numeric and zero values fall back to the default. Any
    /// other value, including a negative one, is returned unchanged.
    pub fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(parse_leading_int)
            .filter(|n| *n != 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}

/// Parses the leading integer of `s`: optional whitespace, an optional sign,
/// then digits. Anything after the digits is ignored. Saturates at the `i64`
/// bounds.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = digits[..end].bytes().fold(0i64, |acc, b| {
        let digit = i64::from(b - b'0');
        if negative {
            acc.saturating_mul(10).saturating_sub(digit)
        } else {
            acc.saturating_mul(10).saturating_add(digit)
        }
    });
    Some(value)
}

// ─────────────────────────────────────────────────────────────────────────────
// Health DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "Currency converter API is running")]
    pub message: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
            message: "Currency converter API is running".into(),
        }
    }
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Missing required fields")]
    pub error: String,
    #[schema(example = 400)]
    pub code: u16,
}
