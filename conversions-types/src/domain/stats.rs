//! Read-time aggregates over the conversion log.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum number of currency pairs reported by the pair statistics.
pub const STATS_LIMIT: i64 = 5;

/// Maximum number of currencies reported by the distribution.
pub const DISTRIBUTION_LIMIT: i64 = 10;

/// Number of conversions recorded for an ordered (source, target) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PairStat {
    #[schema(example = "USD")]
    pub from_currency: String,
    #[schema(example = "EUR")]
    pub to_currency: String,
    #[schema(example = 2)]
    pub count: i64,
}

/// Number of appearances of a currency code, counting both the source and
/// the target role of every conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CurrencyCount {
    #[schema(example = "USD")]
    pub currency_code: String,
    #[schema(example = 3)]
    pub count: i64,
}
