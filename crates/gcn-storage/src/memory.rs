//! In-memory provider implementations.
//!
//! Used by tests and by sandbox deployments that run without a database.
//! The ACL mirror additionally counts trait invocations so authorization
//! tests can assert that rejected requests performed no storage calls.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use gcn_model::{AclEntry, Circular, CircularSubmission, SyncRecord};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::acl::AclMirrorProvider;
use crate::circular::{CircularPage, CircularProvider, CircularSearchCriteria};
use crate::error::{StorageError, StorageResult};
use crate::sync::SyncLogProvider;

/// In-memory ACL mirror.
#[derive(Debug, Default)]
pub struct InMemoryAclMirror {
    entries: RwLock<HashMap<Uuid, AclEntry>>,
    operations: AtomicUsize,
}

impl InMemoryAclMirror {
    /// Creates an empty mirror.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of provider operations performed so far.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    /// Number of entries currently stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the mirror is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl AclMirrorProvider for InMemoryAclMirror {
    async fn put(&self, entry: &AclEntry) -> StorageResult<()> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        self.entries.write().await.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> StorageResult<Option<AclEntry>> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        self.entries
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found("AclEntry", id))
    }

    async fn list(&self, filter: Option<&str>) -> StorageResult<Vec<AclEntry>> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        let entries = self.entries.read().await;
        let mut matched: Vec<AclEntry> = entries
            .values()
            .filter(|entry| {
                filter.is_none_or(|needle| {
                    entry.binding.resource_name.contains(needle)
                        || entry
                            .binding
                            .principal_group()
                            .is_some_and(|group| group.contains(needle))
                })
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            a.binding
                .resource_name
                .cmp(&b.binding.resource_name)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(matched)
    }
}

/// In-memory sync log.
#[derive(Debug, Default)]
pub struct InMemorySyncLog {
    records: RwLock<Vec<SyncRecord>>,
}

impl InMemorySyncLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all records, oldest first.
    pub async fn records(&self) -> Vec<SyncRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl SyncLogProvider for InMemorySyncLog {
    async fn append(&self, record: &SyncRecord) -> StorageResult<()> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn latest(&self) -> StorageResult<Option<SyncRecord>> {
        Ok(self.records.read().await.last().cloned())
    }
}

/// In-memory circulars store with an atomic identifier counter.
#[derive(Debug, Default)]
pub struct InMemoryCirculars {
    rows: RwLock<BTreeMap<u64, Circular>>,
    counter: AtomicU64,
}

impl InMemoryCirculars {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_query(circular: &Circular, query: &str) -> bool {
    let needle = query.to_lowercase();
    circular.subject.to_lowercase().contains(&needle)
        || circular.body.to_lowercase().contains(&needle)
        || circular.submitter.to_lowercase().contains(&needle)
}

#[async_trait]
impl CircularProvider for InMemoryCirculars {
    async fn put(&self, submission: CircularSubmission) -> StorageResult<Circular> {
        let circular_id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let circular = Circular {
            circular_id,
            subject: submission.subject,
            body: submission.body,
            submitter: submission.submitter,
            created_on: Utc::now(),
            event_id: submission.event_id,
        };
        self.rows.write().await.insert(circular_id, circular.clone());
        Ok(circular)
    }

    async fn get(&self, circular_id: u64) -> StorageResult<Option<Circular>> {
        Ok(self.rows.read().await.get(&circular_id).cloned())
    }

    async fn search(&self, criteria: &CircularSearchCriteria) -> StorageResult<CircularPage> {
        let rows = self.rows.read().await;
        // BTreeMap iterates ascending by id; reverse for id-descending order.
        let matched: Vec<&Circular> = rows
            .values()
            .rev()
            .filter(|c| {
                criteria
                    .query
                    .as_deref()
                    .is_none_or(|q| matches_query(c, q))
                    && criteria.start.is_none_or(|start| c.created_on >= start)
                    && criteria.end.is_none_or(|end| c.created_on <= end)
            })
            .collect();

        let total_items = matched.len() as u64;
        let offset = usize::try_from(criteria.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(criteria.limit).unwrap_or(usize::MAX);
        let items = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(CircularPage {
            items,
            total_items,
            page: criteria.page,
            limit: criteria.limit,
        })
    }
}
