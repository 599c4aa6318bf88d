//! In-memory broker.
//!
//! Holds a Kafka-compatible ACL set, a topic set, and a published-message
//! log behind `RwLock`s. Serves tests and sandbox deployments; a real
//! client-library-backed broker plugs in behind the same traits. Admin
//! and connection calls are counted so authorization tests can assert
//! that rejected requests reached the broker zero times.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use gcn_model::AclBinding;
use tokio::sync::RwLock;
use tracing::debug;

use crate::admin::BrokerAdmin;
use crate::error::{BrokerError, BrokerResult};
use crate::producer::{ProducerConnection, ProducerConnector};

/// In-memory broker implementing [`BrokerAdmin`] and [`ProducerConnector`].
#[derive(Debug, Default)]
pub struct InMemoryBroker {
    acls: RwLock<HashSet<AclBinding>>,
    topics: RwLock<HashSet<String>>,
    published: Arc<RwLock<Vec<(String, Vec<u8>)>>>,
    admin_calls: AtomicUsize,
    topic_create_calls: AtomicUsize,
    connects: AtomicUsize,
}

impl InMemoryBroker {
    /// Creates an empty broker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the broker with existing ACL bindings.
    pub async fn seed_acls(&self, bindings: impl IntoIterator<Item = AclBinding>) {
        self.acls.write().await.extend(bindings);
    }

    /// Seeds the broker with existing topics.
    pub async fn seed_topics(&self, topics: impl IntoIterator<Item = String>) {
        self.topics.write().await.extend(topics);
    }

    /// Returns the current ACL set.
    pub async fn acls(&self) -> Vec<AclBinding> {
        self.acls.read().await.iter().cloned().collect()
    }

    /// Returns the current topic set.
    pub async fn topics(&self) -> Vec<String> {
        self.topics.read().await.iter().cloned().collect()
    }

    /// Returns every message published through this broker.
    pub async fn published(&self) -> Vec<(String, Vec<u8>)> {
        self.published.read().await.clone()
    }

    /// Number of administrative calls performed so far.
    #[must_use]
    pub fn admin_call_count(&self) -> usize {
        self.admin_calls.load(Ordering::SeqCst)
    }

    /// Number of topic-creation calls performed so far.
    #[must_use]
    pub fn topic_create_call_count(&self) -> usize {
        self.topic_create_calls.load(Ordering::SeqCst)
    }

    /// Number of producer connections established so far.
    #[must_use]
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrokerAdmin for InMemoryBroker {
    async fn describe_all_acls(&self) -> BrokerResult<Vec<AclBinding>> {
        self.admin_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.acls.read().await.iter().cloned().collect())
    }

    async fn create_acls(&self, bindings: &[AclBinding]) -> BrokerResult<()> {
        self.admin_calls.fetch_add(1, Ordering::SeqCst);
        self.acls.write().await.extend(bindings.iter().cloned());
        Ok(())
    }

    async fn delete_acls(&self, bindings: &[AclBinding]) -> BrokerResult<()> {
        self.admin_calls.fetch_add(1, Ordering::SeqCst);
        let mut acls = self.acls.write().await;
        for binding in bindings {
            acls.remove(binding);
        }
        Ok(())
    }

    async fn create_topics(&self, topics: &[String]) -> BrokerResult<()> {
        self.admin_calls.fetch_add(1, Ordering::SeqCst);
        self.topic_create_calls.fetch_add(1, Ordering::SeqCst);
        let mut existing = self.topics.write().await;
        for topic in topics {
            // Pre-existing topics are tolerated.
            if !existing.insert(topic.clone()) {
                debug!(topic, "topic already exists");
            }
        }
        Ok(())
    }
}

/// Producer connection writing into the broker's published log.
struct InMemoryProducerConnection {
    published: Arc<RwLock<Vec<(String, Vec<u8>)>>>,
    closed: AtomicBool,
}

#[async_trait]
impl ProducerConnection for InMemoryProducerConnection {
    async fn send(&self, topic: &str, payload: &[u8]) -> BrokerResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrokerError::Disconnected);
        }
        self.published
            .write()
            .await
            .push((topic.to_string(), payload.to_vec()));
        Ok(())
    }

    async fn close(&self) -> BrokerResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ProducerConnector for InMemoryBroker {
    async fn connect(&self) -> BrokerResult<Arc<dyn ProducerConnection>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(InMemoryProducerConnection {
            published: Arc::clone(&self.published),
            closed: AtomicBool::new(false),
        }))
    }
}

#[async_trait]
impl ProducerConnector for Arc<InMemoryBroker> {
    async fn connect(&self) -> BrokerResult<Arc<dyn ProducerConnection>> {
        self.as_ref().connect().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::Publisher;
    use gcn_model::{AclOperation, AclPatternType, AclPermission, AclResourceType};

    fn binding(resource: &str, operation: AclOperation) -> AclBinding {
        AclBinding::new(
            resource,
            AclResourceType::Topic,
            AclPatternType::Literal,
            "gcn.clients",
            operation,
            AclPermission::Allow,
        )
    }

    #[tokio::test]
    async fn acl_create_describe_delete_round_trip() {
        let broker = InMemoryBroker::new();
        let bindings = vec![
            binding("gcn.notices.swift", AclOperation::Read),
            binding("gcn.notices.swift", AclOperation::Describe),
        ];

        broker.create_acls(&bindings).await.unwrap();
        assert_eq!(broker.describe_all_acls().await.unwrap().len(), 2);

        broker.delete_acls(&bindings[..1]).await.unwrap();
        let remaining = broker.describe_all_acls().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].operation, AclOperation::Describe);

        assert_eq!(broker.admin_call_count(), 4);
    }

    #[tokio::test]
    async fn duplicate_acl_creation_is_a_set_union() {
        let broker = InMemoryBroker::new();
        let b = binding("gcn.circulars", AclOperation::Write);

        broker.create_acls(&[b.clone()]).await.unwrap();
        broker.create_acls(&[b]).await.unwrap();

        assert_eq!(broker.describe_all_acls().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn topic_creation_is_idempotent() {
        let broker = InMemoryBroker::new();
        let topics = vec!["gcn.notices.test".to_string()];

        broker.create_topics(&topics).await.unwrap();
        broker.create_topics(&topics).await.unwrap();

        assert_eq!(broker.topics().await, vec!["gcn.notices.test".to_string()]);
        assert_eq!(broker.topic_create_call_count(), 2);
    }

    #[tokio::test]
    async fn publishes_land_in_the_log() {
        let broker = Arc::new(InMemoryBroker::new());
        let publisher = Publisher::persistent(Arc::new(Arc::clone(&broker)));

        publisher.publish("gcn.circulars", b"payload").await.unwrap();

        let published = broker.published().await;
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "gcn.circulars");
        assert_eq!(broker.connect_count(), 1);
    }
}
