//! Database row types and their conversion into domain values.
//!
//! PostgreSQL decodes `NUMERIC` and `TIMESTAMPTZ` natively. SQLite stores
//! decimals and timestamps as `TEXT`, so its rows are parsed here.

use sqlx::FromRow;

use conversions_types::{CurrencyCount, PairStat, RepoError};

// ─────────────────────────────────────────────────────────────────────────────
// Shared aggregate rows
// ─────────────────────────────────────────────────────────────────────────────

/// Row of the grouped pair statistics query.
#[derive(FromRow)]
pub struct DbPairStat {
    pub from_currency: String,
    pub to_currency: String,
    pub count: i64,
}

impl From<DbPairStat> for PairStat {
    fn from(row: DbPairStat) -> Self {
        PairStat {
            from_currency: row.from_currency,
            to_currency: row.to_currency,
            count: row.count,
        }
    }
}

/// Row of the currency distribution query.
#[derive(FromRow)]
pub struct DbCurrencyCount {
    pub currency_code: String,
    pub count: i64,
}

impl From<DbCurrencyCount> for CurrencyCount {
    fn from(row: DbCurrencyCount) -> Self {
        CurrencyCount {
            currency_code: row.currency_code,
            count: row.count,
        }
    }
}

pub fn db_err(e: sqlx::Error) -> RepoError {
    RepoError::Database(e.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL rows
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "postgres")]
pub use pg::{PgConversion, PgSaved};

#[cfg(feature = "postgres")]
mod pg {
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;
    use sqlx::FromRow;

    use conversions_types::{ConversionId, ConversionRecord, SavedConversion};

    /// Conversion row from PostgreSQL.
    #[derive(FromRow)]
    pub struct PgConversion {
        pub id: i64,
        pub amount: Decimal,
        pub from_currency: String,
        pub to_currency: String,
        pub conversion_rate: Decimal,
        pub converted_amount: Decimal,
        pub created_at: DateTime<Utc>,
    }

    impl From<PgConversion> for ConversionRecord {
        fn from(row: PgConversion) -> Self {
            ConversionRecord {
                id: ConversionId::from_i64(row.id),
                amount: row.amount,
                from_currency: row.from_currency,
                to_currency: row.to_currency,
                conversion_rate: row.conversion_rate,
                converted_amount: row.converted_amount,
                created_at: row.created_at,
            }
        }
    }

    /// `RETURNING id, created_at` row from PostgreSQL.
    #[derive(FromRow)]
    pub struct PgSaved {
        pub id: i64,
        pub created_at: DateTime<Utc>,
    }

    impl From<PgSaved> for SavedConversion {
        fn from(row: PgSaved) -> Self {
            SavedConversion {
                id: ConversionId::from_i64(row.id),
                created_at: row.created_at,
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite rows
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "sqlite")]
pub use lite::{SqliteConversion, SqliteSaved};

#[cfg(feature = "sqlite")]
mod lite {
    use std::str::FromStr;

    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;
    use sqlx::FromRow;

    use conversions_types::{ConversionId, ConversionRecord, RepoError, SavedConversion};

    fn parse_decimal(column: &str, value: &str) -> Result<Decimal, RepoError> {
        Decimal::from_str(value)
            .map_err(|e| RepoError::Corrupt(format!("{column} = {value:?}: {e}")))
    }

    fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepoError> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| RepoError::Corrupt(format!("created_at = {value:?}: {e}")))
    }

    /// Conversion row from SQLite.
    #[derive(FromRow)]
    pub struct SqliteConversion {
        pub id: i64,
        pub amount: String,
        pub from_currency: String,
        pub to_currency: String,
        pub conversion_rate: String,
        pub converted_amount: String,
        pub created_at: String,
    }

    impl SqliteConversion {
        /// Convert database row to domain ConversionRecord.
        pub fn into_domain(self) -> Result<ConversionRecord, RepoError> {
            Ok(ConversionRecord {
                id: ConversionId::from_i64(self.id),
                amount: parse_decimal("amount", &self.amount)?,
                from_currency: self.from_currency,
                to_currency: self.to_currency,
                conversion_rate: parse_decimal("conversion_rate", &self.conversion_rate)?,
                converted_amount: parse_decimal("converted_amount", &self.converted_amount)?,
                created_at: parse_timestamp(&self.created_at)?,
            })
        }
    }

    /// `RETURNING id, created_at` row from SQLite.
    #[derive(FromRow)]
    pub struct SqliteSaved {
        pub id: i64,
        pub created_at: String,
    }

    impl SqliteSaved {
        pub fn into_domain(self) -> Result<SavedConversion, RepoError> {
            Ok(SavedConversion {
                id: ConversionId::from_i64(self.id),
                created_at: parse_timestamp(&self.created_at)?,
            })
        }
    }

}
