//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use conversions_types::{
    ConversionRecord, ConversionRepository, CurrencyCount, DISTRIBUTION_LIMIT, NewConversion,
    PairStat, RepoError, STATS_LIMIT, SavedConversion,
};

use crate::RepoOptions;
use crate::types::{DbCurrencyCount, DbPairStat, PgConversion, PgSaved, db_err};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_conversions_pg.sql"),
        "0001",
    )
    .await
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::with_options(database_url, &RepoOptions::default()).await
    }

    /// Creates a new PostgreSQL repository with explicit pool options.
    pub async fn with_options(database_url: &str, options: &RepoOptions) -> anyhow::Result<Self> {
        let mut pool_options = PgPoolOptions::new();
        if let Some(max) = options.max_connections {
            pool_options = pool_options.max_connections(max);
        }
        let pool = pool_options.connect(database_url).await?;

        run_migrations(&pool).await?;
        tracing::info!("Database tables initialized successfully");

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        run_migrations(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ConversionRepository for PostgresRepo {
    async fn save_conversion(
        &self,
        conversion: NewConversion,
    ) -> Result<SavedConversion, RepoError> {
        let row: PgSaved = sqlx::query_as(
            r#"INSERT INTO conversions (amount, from_currency, to_currency, conversion_rate, converted_amount)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, created_at"#,
        )
        .bind(conversion.amount)
        .bind(&conversion.from_currency)
        .bind(&conversion.to_currency)
        .bind(conversion.rate)
        .bind(conversion.converted_amount)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.into())
    }

    async fn conversion_history(&self, limit: i64) -> Result<Vec<ConversionRecord>, RepoError> {
        let rows: Vec<PgConversion> = sqlx::query_as(
            r#"SELECT id, amount, from_currency, to_currency, conversion_rate, converted_amount, created_at
               FROM conversions
               ORDER BY created_at DESC, id DESC
               LIMIT $1"#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(ConversionRecord::from).collect())
    }

    async fn pair_stats(&self) -> Result<Vec<PairStat>, RepoError> {
        let rows: Vec<DbPairStat> = sqlx::query_as(
            r#"SELECT from_currency, to_currency, COUNT(*) AS count
               FROM conversions
               GROUP BY from_currency, to_currency
               ORDER BY count DESC
               LIMIT $1"#,
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
               LIMIT $1"#,
        )
        .bind(DISTRIBUTION_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(CurrencyCount::from).collect())
    }
}
