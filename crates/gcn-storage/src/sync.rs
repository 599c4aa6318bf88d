//! Sync log storage provider trait.

use async_trait::async_trait;
use gcn_model::SyncRecord;

use crate::error::StorageResult;

/// Provider for the append-only bulk-sync log.
#[async_trait]
pub trait SyncLogProvider: Send + Sync {
    /// Appends a record. Existing records are never updated or deleted.
    async fn append(&self, record: &SyncRecord) -> StorageResult<()>;

    /// Returns the most recent record, if any sync has ever run.
    async fn latest(&self) -> StorageResult<Option<SyncRecord>>;
}
