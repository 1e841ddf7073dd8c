//! SQLite-backed record store.

use std::path::Path;

use async_trait::async_trait;
use common::record::{WriteId, WriteRecord};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions},
    Row,
};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::store::{decode_stored, encode_for_put, RecordStore};

/// Record store over a SQLite connection pool.
///
/// One row per record in `write_records`, keyed by the raw 32-byte digest.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) a database file and run migrations.
    pub async fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create an in-memory database.
    ///
    /// Each SQLite connection to `:memory:` is its own database, so the pool
    /// is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn put(&self, record: &WriteRecord) -> Result<WriteId> {
        let (id, bytes) = encode_for_put(record)?;
        let now = chrono::Utc::now().timestamp();

        // a single statement, so check and insert cannot interleave
        let result = sqlx::query(
            r#"
            INSERT INTO write_records (digest, record, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(digest) DO NOTHING
            "#,
        )
        .bind(&id.as_bytes()[..])
        .bind(bytes)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!(write_id = %id, "rejecting duplicate record");
            return Err(StoreError::AlreadyExists(id));
        }

        debug!(write_id = %id, "stored record");
        Ok(id)
    }

    async fn get(&self, id: &WriteId) -> Result<WriteRecord> {
        let row = sqlx::query(
            r#"
            SELECT record FROM write_records WHERE digest = ?
            "#,
        )
        .bind(&id.as_bytes()[..])
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(*id))?;

        let bytes: Vec<u8> = row.get("record");
        decode_stored(id, &bytes)
    }

    async fn contains(&self, id: &WriteId) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT 1 FROM write_records WHERE digest = ?
            "#,
        )
        .bind(&id.as_bytes()[..])
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    async fn len(&self) -> Result<usize> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) as count FROM write_records
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        let count: i64 = row.get("count");
        Ok(count as usize)
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
