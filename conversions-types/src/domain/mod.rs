//! Domain models for the conversion log.

pub mod conversion;
pub mod stats;

pub use conversion::{ConversionId, ConversionRecord, NewConversion, SavedConversion};
pub use stats::{CurrencyCount, DISTRIBUTION_LIMIT, PairStat, STATS_LIMIT};

/// Number of records returned by a history query when no usable limit is given.
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;
