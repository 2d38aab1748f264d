//! The persisted conversion record and its identifier.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Store-assigned, monotonically increasing conversion identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ConversionId(i64);

impl ConversionId {
    /// Wraps a raw identifier read back from the store.
    pub fn from_i64(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ConversionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConversionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A conversion as submitted by a client, before the store assigns an
/// identifier and timestamp.
///
/// `converted_amount` is taken as given; it is not recomputed from
/// `amount * rate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConversion {
    pub amount: Decimal,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub converted_amount: Decimal,
}

/// A persisted conversion. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConversionRecord {
    pub id: ConversionId,
    /// Amount in the source currency
    #[schema(value_type = String, example = "100")]
    pub amount: Decimal,
    #[schema(example = "USD")]
    pub from_currency: String,
    #[schema(example = "EUR")]
    pub to_currency: String,
    /// Units of target currency per unit of source currency
    #[schema(value_type = String, example = "0.9")]
    pub conversion_rate: Decimal,
    #[schema(value_type = String, example = "90")]
    pub converted_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Result of an insert: the identifier and timestamp assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SavedConversion {
    pub id: ConversionId,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_id_parse_and_display() {
        let id: ConversionId = "42".parse().unwrap();
        assert_eq!(id.as_i64(), 42);
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<ConversionId>().is_err());
    }

    #[test]
    fn test_record_serializes_with_column_names() {
        let record = ConversionRecord {
            id: ConversionId::from_i64(7),
            amount: Decimal::new(100, 0),
            from_currency: "USD".into(),
            to_currency: "EUR".into(),
            conversion_rate: Decimal::new(9, 1),
            converted_amount: Decimal::new(90, 0),
            created_at: DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["amount"], "100");
        assert_eq!(json["from_currency"], "USD");
        assert_eq!(json["conversion_rate"], "0.9");
        assert_eq!(json["converted_amount"], "90");
        assert_eq!(json["created_at"], "2024-05-01T12:00:00Z");
    }
}
