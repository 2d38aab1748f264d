//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite, in-memory test doubles) implement this trait.

use crate::domain::{ConversionRecord, CurrencyCount, NewConversion, PairStat, SavedConversion};
use crate::error::RepoError;

/// Storage port for the conversion log.
///
/// Records are append-only: there is no update or delete operation. Schema
/// creation happens when an adapter is constructed, so a value implementing
/// this trait is always ready to serve queries.
#[async_trait::async_trait]
pub trait ConversionRepository: Send + Sync + 'static {
    /// Inserts a conversion and returns the identifier and timestamp the
    /// store assigned to it, in a single atomic statement.
    async fn save_conversion(&self, conversion: NewConversion)
    -> Result<SavedConversion, RepoError>;

    /// Returns up to `limit` most recent conversions, newest first.
    ///
    /// `limit` is handed to the store unchanged.
    async fn conversion_history(&self, limit: i64) -> Result<Vec<ConversionRecord>, RepoError>;

    /// Returns the most frequent (source, target) pairs, most frequent first.
    async fn pair_stats(&self) -> Result<Vec<PairStat>, RepoError>;

    /// Returns the most frequent currency codes across both roles.
    async fn currency_distribution(&self) -> Result<Vec<CurrencyCount>, RepoError>;
}
