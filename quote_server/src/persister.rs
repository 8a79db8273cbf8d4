//! Quote history persistence.
//!
//! Each successful fetch becomes one row in `quote_history`. The insert runs inside
//! a transaction under the caller's deadline: if the deadline elapses the
//! transaction is dropped before commit and SQLite rolls it back, so a failed
//! [`QuoteStore::record`] never leaves a row behind.
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use quote_common::{Deadline, Quote, QuoteError, Result, Stage};
use sqlx::FromRow;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Default connection string, a file next to the binary.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://client-server-api.db";

const MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS quote_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        captured_at DATETIME NOT NULL,
        value NUMERIC NOT NULL
    )
"#;

const INSERT_QUOTE: &str = "INSERT INTO quote_history (captured_at, value) VALUES (?, ?)";

/// Durable sink for fetched quotes.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Insert one `(now, value)` row, returning its id.
    async fn record(&self, quote: &Quote, deadline: Deadline) -> Result<i64>;
}

/// One persisted quote.
#[derive(Debug, Clone, FromRow)]
pub struct StoredQuoteRecord {
    /// Monotonic surrogate key.
    pub id: i64,
    /// Server time at insert.
    pub captured_at: DateTime<Utc>,
    /// Quote value.
    pub value: f64,
}

/// [`QuoteStore`] backed by a shared SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteQuoteStore {
    pool: SqlitePool,
}

impl SqliteQuoteStore {
    /// Open (creating if missing) the database behind `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| QuoteError::Config(format!("invalid database url '{}': {}", url, e)))?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(|e| QuoteError::Prepare(format!("failed to open {}: {}", url, e)))?;

        info!("Connected to quote store at {}", url);
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool handle.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the `quote_history` table if it does not exist yet.
    pub async fn bootstrap(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| QuoteError::Exec(format!("failed to create quote_history: {}", e)))?;
        debug!("quote_history table ready");
        Ok(())
    }

    /// Number of stored quotes.
    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quote_history")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| QuoteError::Exec(e.to_string()))
    }

    /// Most recent quotes, newest first.
    pub async fn recent(&self, limit: u32) -> Result<Vec<StoredQuoteRecord>> {
        sqlx::query_as::<_, StoredQuoteRecord>(
            "SELECT id, captured_at, CAST(value AS REAL) AS value \
             FROM quote_history ORDER BY id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| QuoteError::Exec(e.to_string()))
    }

    async fn insert(&self, value: &str) -> Result<i64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| QuoteError::Prepare(e.to_string()))?;

        let id = sqlx::query(INSERT_QUOTE)
            .bind(Utc::now())
            .bind(value)
            .execute(&mut *tx)
            .await
            .map_err(|e| QuoteError::Exec(e.to_string()))?
            .last_insert_rowid();

        tx.commit()
            .await
            .map_err(|e| QuoteError::Exec(e.to_string()))?;
        Ok(id)
    }
}

#[async_trait]
impl QuoteStore for SqliteQuoteStore {
    async fn record(&self, quote: &Quote, deadline: Deadline) -> Result<i64> {
        let value = quote.value();
        if !value.parse::<f64>().is_ok_and(f64::is_finite) {
            return Err(QuoteError::Exec(format!("value '{}' is not numeric", value)));
        }

        let budget = deadline.budget().unwrap_or_default();
        let id = deadline
            .run(self.insert(value))
            .await
            .map_err(|_| QuoteError::Timeout {
                stage: Stage::Persist,
                budget,
            })??;
        debug!("Stored quote {} as row {}", value, id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_common::ErrorKind;
    use sqlx::{Connection, SqliteConnection};
    use tempfile::TempDir;

    fn database_url(tmp: &TempDir) -> String {
        format!("sqlite://{}", tmp.path().join("quotes.db").display())
    }

    async fn open_store() -> (TempDir, SqliteQuoteStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = SqliteQuoteStore::connect(&database_url(&tmp))
            .await
            .unwrap();
        store.bootstrap().await.unwrap();
        (tmp, store)
    }

    fn generous() -> Deadline {
        Deadline::after(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn records_value_and_timestamp() {
        let (_tmp, store) = open_store().await;
        let id = store.record(&Quote::new("5.42"), generous()).await.unwrap();

        let rows = store.recent(10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].value, 5.42);
        let age = Utc::now() - rows[0].captured_at;
        assert!((0..60).contains(&age.num_seconds()), "{age:?}");
    }

    #[tokio::test]
    async fn identical_quotes_are_separate_rows() {
        let (_tmp, store) = open_store().await;
        let first = store.record(&Quote::new("5.42"), generous()).await.unwrap();
        let second = store.record(&Quote::new("5.42"), generous()).await.unwrap();
        assert!(second > first);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let (_tmp, store) = open_store().await;
        store.record(&Quote::new("1.0"), generous()).await.unwrap();
        store.bootstrap().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn elapsed_deadline_leaves_no_row() {
        let (_tmp, store) = open_store().await;

        let err = store
            .record(&Quote::new("5.42"), Deadline::after(Duration::ZERO))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn insert_stuck_on_write_lock_is_rolled_back() {
        let (tmp, store) = open_store().await;
        let mut blocker = SqliteConnection::connect(&database_url(&tmp))
            .await
            .unwrap();
        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut blocker)
            .await
            .unwrap();

        let budget = Duration::from_millis(100);
        let err = store
            .record(&Quote::new("5.42"), Deadline::after(budget))
            .await
            .unwrap_err();
        match err {
            QuoteError::Timeout { stage, budget: reported } => {
                assert_eq!(stage, Stage::Persist);
                assert_eq!(reported, budget);
            }
            other => panic!("expected a timeout, got {other}"),
        }

        sqlx::query("COMMIT").execute(&mut blocker).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);

        let id = store.record(&Quote::new("5.43"), generous()).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.recent(1).await.unwrap()[0].id, id);
    }

    #[tokio::test]
    async fn value_is_stored_exactly_as_replied() {
        let (_tmp, store) = open_store().await;
        let err = store
            .record(&Quote::new(" 5.42\n"), generous())
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::Exec(_)), "{err}");
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn non_numeric_value_is_rejected() {
        let (_tmp, store) = open_store().await;
        let err = store
            .record(&Quote::new("n/a"), generous())
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::Exec(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn closed_pool_fails_to_prepare() {
        let (_tmp, store) = open_store().await;
        store.pool().close().await;
        let err = store
            .record(&Quote::new("5.42"), generous())
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::Prepare(_)), "{err}");
    }
}
