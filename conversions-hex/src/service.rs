//! Conversion Log Application Service
//!
//! Orchestrates validation and persistence through the repository port.
//! Contains NO infrastructure logic - pure orchestration.

use conversions_types::{
    AppError, ConversionRecord, ConversionRepository, CurrencyCount, PairStat, RepoError,
    SaveConversionRequest, SavedConversion,
};

/// Application service for the conversion log.
///
/// Generic over `R: ConversionRepository` - the adapter is injected at compile time.
/// This enables:
/// - Swapping repositories without code changes
/// - Testing with in-memory repo
/// - Compile-time checks for port implementation
pub struct ConversionService<R: ConversionRepository> {
    repo: R,
}

/// Logs the underlying failure and hides it behind `message`.
fn internal(message: &'static str) -> impl FnOnce(RepoError) -> AppError {
    move |err| {
        tracing::error!(error = %err, "{}", message);
        AppError::Internal(message.into())
    }
}

impl<R: ConversionRepository> ConversionService<R> {
    /// Creates a new conversion service with the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────────

    /// Validates and records a completed conversion.
    #[tracing::instrument(skip(self))]
    pub async fn save_conversion(
        &self,
        req: SaveConversionRequest,
    ) -> Result<SavedConversion, AppError> {
        let conversion = req.validate()?;

        let saved = self
            .repo
            .save_conversion(conversion)
            .await
            .map_err(internal("Failed to save conversion"))?;

        tracing::debug!(id = %saved.id, "Conversion saved");
        Ok(saved)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────────

    /// Most recent conversions first, at most `limit` of them.
    #[tracing::instrument(skip(self))]
    pub async fn conversion_history(&self, limit: i64) -> Result<Vec<ConversionRecord>, AppError> {
        self.repo
            .conversion_history(limit)
            .await
            .map_err(internal("Failed to fetch conversion history"))
    }

    /// The most frequent currency pairs.
    #[tracing::instrument(skip(self))]
    pub async fn pair_stats(&self) -> Result<Vec<PairStat>, AppError> {
        self.repo
            .pair_stats()
            .await
            .map_err(internal("Failed to fetch conversion statistics"))
    }

    /// How often each currency appears on either side of a conversion.
    #[tracing::instrument(skip(self))]
    pub async fn currency_distribution(&self) -> Result<Vec<CurrencyCount>, AppError> {
        self.repo
            .currency_distribution()
            .await
            .map_err(internal("Failed to fetch currency distribution"))
    }
}
