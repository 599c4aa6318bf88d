//! Kafka ACL reconciliation operations.
//!
//! The broker is the system of record for enforcement; the mirror is the
//! admin UI's read path. Neither direction performs a compensating
//! rollback: a partial failure leaves the broker authoritative and the
//! mirror repairable by a subsequent import.

use std::collections::BTreeSet;

use futures::future::try_join_all;
use gcn_broker::BrokerAdmin;
use gcn_model::{AclBinding, AclEntry, AclPatternType, AclResourceType, SyncRecord};
use gcn_storage::{AclMirrorProvider, SyncLogProvider};
use tracing::info;
use uuid::Uuid;

use crate::dto::{CreateAclRequest, DeleteSummary, ImportSummary, PushSummary};
use crate::error::AdminResult;

/// Imports the broker's complete ACL set into the mirror.
///
/// Every binding gets a fresh mirror id. Writes fan out concurrently;
/// the first failure rejects the aggregate, and completed writes are
/// not rolled back. Appends one sync record on success.
pub async fn sync_mirror_from_broker<B, M, L>(
    broker: &B,
    mirror: &M,
    sync_log: &L,
    synced_by: &str,
) -> AdminResult<ImportSummary>
where
    B: BrokerAdmin + ?Sized,
    M: AclMirrorProvider + ?Sized,
    L: SyncLogProvider + ?Sized,
{
    let bindings = broker.describe_all_acls().await?;
    let entries: Vec<AclEntry> = bindings.into_iter().map(AclEntry::from_binding).collect();

    try_join_all(entries.iter().map(|entry| mirror.put(entry))).await?;
    sync_log.append(&SyncRecord::now(synced_by)).await?;

    info!(imported = entries.len(), "imported broker ACLs into mirror");
    Ok(ImportSummary {
        imported: entries.len(),
    })
}

/// Pushes every mirror entry to the broker.
///
/// Topics are created first (deduplicated, topic-typed resources only,
/// one batched call), then all bindings go out as one batched admin
/// call. Appends one sync record on success.
pub async fn sync_broker_from_mirror<B, M, L>(
    broker: &B,
    mirror: &M,
    sync_log: &L,
    synced_by: &str,
) -> AdminResult<PushSummary>
where
    B: BrokerAdmin + ?Sized,
    M: AclMirrorProvider + ?Sized,
    L: SyncLogProvider + ?Sized,
{
    let entries = mirror.list(None).await?;

    let topics: BTreeSet<String> = entries
        .iter()
        .filter(|entry| entry.binding.is_topic())
        .map(|entry| entry.binding.resource_name.clone())
        .collect();
    if !topics.is_empty() {
        let topics: Vec<String> = topics.into_iter().collect();
        broker.create_topics(&topics).await?;
    }

    let bindings: Vec<AclBinding> = entries.into_iter().map(|entry| entry.binding).collect();
    broker.create_acls(&bindings).await?;
    sync_log.append(&SyncRecord::now(synced_by)).await?;

    info!(pushed = bindings.len(), "pushed mirror ACLs to broker");
    Ok(PushSummary {
        pushed: bindings.len(),
    })
}

/// Creates the ACL entries for one admin-form submission.
///
/// One entry per operation of the chosen client type at pattern literal;
/// `include_prefixed` doubles the set with prefixed patterns. Order:
/// mirror writes, then idempotent topic creation for topic-typed
/// resources, then one batched broker create.
pub async fn create_acl<B, M>(
    broker: &B,
    mirror: &M,
    request: &CreateAclRequest,
) -> AdminResult<Vec<AclEntry>>
where
    B: BrokerAdmin + ?Sized,
    M: AclMirrorProvider + ?Sized,
{
    let patterns: &[AclPatternType] = if request.include_prefixed {
        &[AclPatternType::Literal, AclPatternType::Prefixed]
    } else {
        &[AclPatternType::Literal]
    };

    let mut entries = Vec::with_capacity(patterns.len() * request.client_type.operations().len());
    for &pattern in patterns {
        for &operation in request.client_type.operations() {
            entries.push(AclEntry::from_binding(AclBinding::new(
                request.resource_name.clone(),
                request.resource_type,
                pattern,
                &request.group,
                operation,
                request.permission,
            )));
        }
    }

    mirror.put_all(&entries).await?;

    if matches!(request.resource_type, AclResourceType::Topic) {
        broker
            .create_topics(std::slice::from_ref(&request.resource_name))
            .await?;
    }

    let bindings: Vec<AclBinding> = entries.iter().map(|entry| entry.binding.clone()).collect();
    broker.create_acls(&bindings).await?;

    info!(
        resource = %request.resource_name,
        client_type = %request.client_type,
        created = entries.len(),
        "created ACL entries"
    );
    Ok(entries)
}

/// Deletes ACL entries by mirror id.
///
/// Every id is resolved in the mirror first; any missing id aborts with
/// NotFound before the broker is touched. The broker delete is one
/// batched call by binding tuple, then mirror rows are removed per-row.
pub async fn delete_acls<B, M>(broker: &B, mirror: &M, ids: &[Uuid]) -> AdminResult<DeleteSummary>
where
    B: BrokerAdmin + ?Sized,
    M: AclMirrorProvider + ?Sized,
{
    let entries = mirror.get_many(ids).await?;

    let bindings: Vec<AclBinding> = entries.iter().map(|entry| entry.binding.clone()).collect();
    broker.delete_acls(&bindings).await?;

    // A crash here leaves stale mirror rows; the next broker import
    // repairs them.
    for entry in &entries {
        mirror.delete(entry.id).await?;
    }

    info!(deleted = entries.len(), "deleted ACL entries");
    Ok(DeleteSummary {
        deleted: entries.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcn_broker::InMemoryBroker;
    use gcn_model::{AclOperation, AclPermission, AclResourceType, ClientType};
    use gcn_storage::{InMemoryAclMirror, InMemorySyncLog};

    fn create_request(include_prefixed: bool) -> CreateAclRequest {
        CreateAclRequest {
            resource_name: "gcn.notices.test".to_string(),
            resource_type: AclResourceType::Topic,
            client_type: ClientType::Producer,
            group: "gcn.clients".to_string(),
            permission: AclPermission::Allow,
            include_prefixed,
        }
    }

    #[tokio::test]
    async fn create_producer_yields_three_literal_entries() {
        let broker = InMemoryBroker::new();
        let mirror = InMemoryAclMirror::new();

        let entries = create_acl(&broker, &mirror, &create_request(false))
            .await
            .unwrap();

        assert_eq!(entries.len(), 3);
        assert!(entries
            .iter()
            .all(|entry| entry.binding.pattern_type == AclPatternType::Literal));
        assert_eq!(broker.acls().await.len(), 3);
        assert_eq!(broker.topic_create_call_count(), 1);
    }

    #[tokio::test]
    async fn include_prefixed_doubles_the_set() {
        let broker = InMemoryBroker::new();
        let mirror = InMemoryAclMirror::new();

        let entries = create_acl(&broker, &mirror, &create_request(true))
            .await
            .unwrap();

        assert_eq!(entries.len(), 6);
        let prefixed = entries
            .iter()
            .filter(|entry| entry.binding.pattern_type == AclPatternType::Prefixed)
            .count();
        assert_eq!(prefixed, 3);
        assert_eq!(broker.topic_create_call_count(), 1);
    }

    #[tokio::test]
    async fn consumer_gets_read_and_describe() {
        let broker = InMemoryBroker::new();
        let mirror = InMemoryAclMirror::new();
        let mut request = create_request(false);
        request.client_type = ClientType::Consumer;
        request.resource_type = AclResourceType::Group;

        let entries = create_acl(&broker, &mirror, &request).await.unwrap();

        let operations: Vec<AclOperation> =
            entries.iter().map(|entry| entry.binding.operation).collect();
        assert_eq!(operations, vec![AclOperation::Read, AclOperation::Describe]);
        // Group-typed resources never trigger topic creation.
        assert_eq!(broker.topic_create_call_count(), 0);
    }

    #[tokio::test]
    async fn import_assigns_fresh_ids_and_logs_sync() {
        let broker = InMemoryBroker::new();
        let mirror = InMemoryAclMirror::new();
        let sync_log = InMemorySyncLog::new();
        broker
            .seed_acls([
                AclBinding::new(
                    "gcn.notices.swift",
                    AclResourceType::Topic,
                    AclPatternType::Literal,
                    "gcn.clients",
                    AclOperation::Read,
                    AclPermission::Allow,
                ),
                AclBinding::new(
                    "gcn.notices.fermi",
                    AclResourceType::Topic,
                    AclPatternType::Literal,
                    "gcn.clients",
                    AclOperation::Read,
                    AclPermission::Allow,
                ),
            ])
            .await;

        let summary = sync_mirror_from_broker(&broker, &mirror, &sync_log, "ops@example.gov")
            .await
            .unwrap();

        assert_eq!(summary.imported, 2);
        assert_eq!(mirror.list(None).await.unwrap().len(), 2);
        let records = sync_log.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].synced_by, "ops@example.gov");
    }

    #[tokio::test]
    async fn push_creates_topics_once_per_distinct_name() {
        let broker = InMemoryBroker::new();
        let mirror = InMemoryAclMirror::new();
        let sync_log = InMemorySyncLog::new();
        for operation in [AclOperation::Read, AclOperation::Describe] {
            mirror
                .put(&AclEntry::from_binding(AclBinding::new(
                    "gcn.notices.swift",
                    AclResourceType::Topic,
                    AclPatternType::Literal,
                    "gcn.clients",
                    operation,
                    AclPermission::Allow,
                )))
                .await
                .unwrap();
        }

        let summary = sync_broker_from_mirror(&broker, &mirror, &sync_log, "ops@example.gov")
            .await
            .unwrap();

        assert_eq!(summary.pushed, 2);
        assert_eq!(broker.topics().await, vec!["gcn.notices.swift".to_string()]);
        assert_eq!(broker.topic_create_call_count(), 1);
    }

    #[tokio::test]
    async fn delete_unknown_id_aborts_before_broker() {
        let broker = InMemoryBroker::new();
        let mirror = InMemoryAclMirror::new();

        let err = delete_acls(&broker, &mirror, &[Uuid::now_v7()])
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
        assert_eq!(broker.admin_call_count(), 0);
    }

    #[tokio::test]
    async fn delete_removes_broker_rule_and_mirror_row() {
        let broker = InMemoryBroker::new();
        let mirror = InMemoryAclMirror::new();
        let entries = create_acl(&broker, &mirror, &create_request(false))
            .await
            .unwrap();

        let ids: Vec<Uuid> = entries.iter().map(|entry| entry.id).collect();
        let summary = delete_acls(&broker, &mirror, &ids).await.unwrap();

        assert_eq!(summary.deleted, 3);
        assert!(broker.acls().await.is_empty());
        assert!(mirror.list(None).await.unwrap().is_empty());
    }
}
