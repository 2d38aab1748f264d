//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use conversions_types::{
    ConversionRecord, ConversionRepository, CurrencyCount, DISTRIBUTION_LIMIT, NewConversion,
    PairStat, RepoError, STATS_LIMIT, SavedConversion,
};

use crate::RepoOptions;
use crate::types::{DbCurrencyCount, DbPairStat, SqliteConversion, SqliteSaved, db_err};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::with_options(database_url, &RepoOptions::default()).await
    }

    /// Creates a new SQLite repository with explicit pool options.
    pub async fn with_options(database_url: &str, options: &RepoOptions) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let connect = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let mut pool_options = SqlitePoolOptions::new();
        if let Some(max) = options.max_connections {
            pool_options = pool_options.max_connections(max);
        }
        let pool = pool_options.connect_with(connect).await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        tracing::info!("Database tables initialized successfully");

        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema if it does not exist yet.
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_conversions.sql");
        sqlx::query(ddl).execute(&self.pool).await.map_err(db_err)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ConversionRepository for SqliteRepo {
    async fn save_conversion(
        &self,
        conversion: NewConversion,
    ) -> Result<SavedConversion, RepoError> {
        let row: SqliteSaved = sqlx::query_as(
            r#"INSERT INTO conversions (amount, from_currency, to_currency, conversion_rate, converted_amount)
               VALUES (?, ?, ?, ?, ?)
               RETURNING id, created_at"#,
        )
        .bind(conversion.amount.to_string())
        .bind(&conversion.from_currency)
        .bind(&conversion.to_currency)
        .bind(conversion.rate.to_string())
        .bind(conversion.converted_amount.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.into_domain()
    }

    async fn conversion_history(&self, limit: i64) -> Result<Vec<ConversionRecord>, RepoError> {
        let rows: Vec<SqliteConversion> = sqlx::query_as(
            r#"SELECT id, amount, from_currency, to_currency, conversion_rate, converted_amount, created_at
               FROM conversions
               ORDER BY created_at DESC, id DESC
               LIMIT ?"#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(SqliteConversion::into_domain).collect()
    }

    async fn pair_stats(&self) -> Result<Vec<PairStat>, RepoError> {
        let rows: Vec<DbPairStat> = sqlx::query_as(
            r#"SELECT from_currency, to_currency, COUNT(*) AS count
               FROM conversions
               GROUP BY from_currency, to_currency
               ORDER BY count DESC
               LIMIT ?"#,
        )
        .bind(STATS_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(PairStat::from).collect())
    }

    async fn currency_distribution(&self) -> Result<Vec<CurrencyCount>, RepoError> {
        let rows: Vec<DbCurrencyCount> = sqlx::query_as(
            r#"SELECT currency_code, COUNT(*) AS count
               FROM (
                   SELECT from_currency AS currency_code FROM conversions
                   UNION ALL
                   SELECT to_currency AS currency_code FROM conversions
               ) AS all_currencies
               GROUP BY currency_code
               ORDER BY count DESC
               LIMIT ?"#,
        )
        .bind(DISTRIBUTION_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(CurrencyCount::from).collect())
    }
}
