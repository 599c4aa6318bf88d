//! `PostgreSQL` implementation of the sync log provider.

use async_trait::async_trait;
use gcn_model::SyncRecord;
use gcn_storage::{StorageResult, SyncLogProvider};
use sqlx::PgPool;

use crate::entities::SyncRow;
use crate::error::from_sqlx_error;

/// `PostgreSQL` sync log provider.
pub struct PgSyncLogProvider {
    pool: PgPool,
}

impl PgSyncLogProvider {
    /// Creates a new `PostgreSQL` sync log provider.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SyncLogProvider for PgSyncLogProvider {
    async fn append(&self, record: &SyncRecord) -> StorageResult<()> {
        sqlx::query("INSERT INTO sync_log (synced_on, synced_by) VALUES ($1, $2)")
            .bind(record.synced_on)
            .bind(&record.synced_by)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;
        Ok(())
    }

    async fn latest(&self) -> StorageResult<Option<SyncRecord>> {
        let row: Option<SyncRow> = sqlx::query_as(
            "SELECT synced_on, synced_by FROM sync_log ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        Ok(row.map(SyncRow::into_record))
    }
}
