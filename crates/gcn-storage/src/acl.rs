//! ACL mirror storage provider trait.

use async_trait::async_trait;
use gcn_model::AclEntry;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for the local mirror of broker ACL state.
///
/// The mirror is the UI's fast read path; the broker remains the system of
/// record for enforcement. Implementations must be thread-safe and support
/// concurrent access.
#[async_trait]
pub trait AclMirrorProvider: Send + Sync {
    /// Persists an entry, replacing any entry with the same id.
    async fn put(&self, entry: &AclEntry) -> StorageResult<()>;

    /// Persists a batch of entries.
    async fn put_all(&self, entries: &[AclEntry]) -> StorageResult<()> {
        for entry in entries {
            self.put(entry).await?;
        }
        Ok(())
    }

    /// Gets an entry by mirror id.
    async fn get(&self, id: Uuid) -> StorageResult<Option<AclEntry>>;

    /// Resolves every id in order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for the first missing id; no
    /// partial result is produced.
    async fn get_many(&self, ids: &[Uuid]) -> StorageResult<Vec<AclEntry>> {
        let mut entries = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.get(id).await? {
                Some(entry) => entries.push(entry),
                None => return Err(crate::StorageError::not_found("AclEntry", id)),
            }
        }
        Ok(entries)
    }

    /// Deletes an entry by mirror id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the entry doesn't exist.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;

    /// Full scan of the mirror, drained before returning.
    ///
    /// `filter` is a case-sensitive substring matched against the resource
    /// name or the principal's group identifier. Result size is unbounded.
    async fn list(&self, filter: Option<&str>) -> StorageResult<Vec<AclEntry>>;
}
