//! SQLite implementation of the notice ledger.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use lsd_operation_sm::notice::Notice;
use lsd_primitives::types::OpId;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    types::Json,
    SqlitePool,
};
use tracing::{debug, info};

use super::errors::StorageError;
use crate::{
    errors::{LedgerError, LedgerResult},
    traits::NoticeDb,
};

/// Notice ledger stored in a SQLite database.
///
/// Each notice is stored as JSON next to a recency counter that orders the listing.
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    pool: SqlitePool,
    capacity: usize,
}

impl SqliteLedger {
    /// Wraps an existing pool and applies the schema migrations.
    pub async fn new(pool: SqlitePool, capacity: usize) -> LedgerResult<Self> {
        if capacity == 0 {
            return Err(LedgerError::ZeroCapacity);
        }

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Self { pool, capacity })
    }

    /// Opens (creating if needed) the database file at `path`.
    pub async fn open(path: impl AsRef<Path>, capacity: usize) -> LedgerResult<Self> {
        let path = path.as_ref();
        info!(?path, "opening notice ledger");

        let connect_options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_options)
            .await
            .map_err(StorageError::from)?;

        Self::new(pool, capacity).await
    }

    /// The maximum number of notices kept.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

#[async_trait]
impl NoticeDb for SqliteLedger {
    async fn upsert(&self, mut notice: Notice) -> LedgerResult<Notice> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;
        let id = notice.id.to_string();

        let previous: Option<Json<Notice>> =
            sqlx::query_scalar("SELECT payload FROM notices WHERE id = $1")
                .bind(&id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(StorageError::from)?;

        notice.timestamp = previous
            .and_then(|Json(previous)| previous.timestamp)
            .or(notice.timestamp)
            .or_else(|| Some(Utc::now()));

        sqlx::query(
            "INSERT INTO notices (id, seq, status, payload)
                VALUES ($1, (SELECT COALESCE(MAX(seq), 0) + 1 FROM notices), $2, $3)
                ON CONFLICT(id) DO UPDATE SET
                    seq = excluded.seq,
                    status = excluded.status,
                    payload = excluded.payload",
        )
        .bind(&id)
        .bind(notice.status.to_string())
        .bind(Json(&notice))
        .execute(&mut *tx)
        .await
        .map_err(StorageError::from)?;

        let evicted = sqlx::query(
            "DELETE FROM notices WHERE id NOT IN
                (SELECT id FROM notices ORDER BY seq DESC LIMIT $1)",
        )
        .bind(i64::try_from(self.capacity).unwrap_or(i64::MAX))
        .execute(&mut *tx)
        .await
        .map_err(StorageError::from)?
        .rows_affected();

        tx.commit().await.map_err(StorageError::from)?;

        if evicted > 0 {
            debug!(%evicted, "evicted notices beyond capacity");
        }

        Ok(notice)
    }

    async fn get(&self, id: OpId) -> LedgerResult<Option<Notice>> {
        let notice: Option<Json<Notice>> =
            sqlx::query_scalar("SELECT payload FROM notices WHERE id = $1")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::from)?;

        Ok(notice.map(|Json(notice)| notice))
    }

    async fn list(&self) -> LedgerResult<Vec<Notice>> {
        let notices: Vec<Json<Notice>> =
            sqlx::query_scalar("SELECT payload FROM notices ORDER BY seq DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?;

        Ok(notices.into_iter().map(|Json(notice)| notice).collect())
    }

    async fn remove(&self, id: OpId) -> LedgerResult<bool> {
        let removed = sqlx::query("DELETE FROM notices WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?
            .rows_affected();

        Ok(removed > 0)
    }
}
