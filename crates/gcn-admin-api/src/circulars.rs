//! Circular submission and retrieval operations.

use gcn_broker::Publisher;
use gcn_model::{Circular, CircularSubmission};
use gcn_storage::{CircularPage, CircularProvider, CircularSearchCriteria};
use tracing::warn;

use crate::error::{AdminError, AdminResult};

/// Validates and stores a circular, then publishes it to the circulars
/// topic.
///
/// The store assigns the identifier and timestamp. Publishing the stored
/// circular is best-effort: a failure is logged and the submission still
/// succeeds, since the store is the system of record for circulars.
pub async fn submit<C>(
    circulars: &C,
    publisher: &Publisher,
    topic: &str,
    submission: CircularSubmission,
) -> AdminResult<Circular>
where
    C: CircularProvider + ?Sized,
{
    submission.validate()?;
    let circular = circulars.put(submission).await?;

    match serde_json::to_vec(&circular) {
        Ok(payload) => {
            if let Err(err) = publisher.publish(topic, &payload).await {
                warn!(
                    circular_id = circular.circular_id,
                    error = %err,
                    "failed to publish circular"
                );
            }
        }
        Err(err) => {
            warn!(
                circular_id = circular.circular_id,
                error = %err,
                "failed to serialize circular for publishing"
            );
        }
    }

    Ok(circular)
}

/// Gets a circular by id.
///
/// # Errors
///
/// Returns 404 when no circular has that id.
pub async fn get<C>(circulars: &C, circular_id: u64) -> AdminResult<Circular>
where
    C: CircularProvider + ?Sized,
{
    circulars
        .get(circular_id)
        .await?
        .ok_or_else(|| AdminError::not_found("Circular", circular_id))
}

/// Searches circulars.
pub async fn search<C>(
    circulars: &C,
    criteria: &CircularSearchCriteria,
) -> AdminResult<CircularPage>
where
    C: CircularProvider + ?Sized,
{
    Ok(circulars.search(criteria).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use gcn_broker::InMemoryBroker;
    use gcn_storage::InMemoryCirculars;

    fn submission(subject: &str) -> CircularSubmission {
        CircularSubmission {
            subject: subject.to_string(),
            body: "Swift-BAT triggered at 12:34:56 UT.".to_string(),
            submitter: "observer@example.edu".to_string(),
            event_id: None,
        }
    }

    #[tokio::test]
    async fn submit_stores_and_publishes() {
        let circulars = InMemoryCirculars::new();
        let broker = Arc::new(InMemoryBroker::new());
        let publisher = Publisher::ephemeral(Arc::clone(&broker) as _);

        let stored = submit(
            &circulars,
            &publisher,
            "gcn.circulars",
            submission("GRB 240101A: Swift detection"),
        )
        .await
        .unwrap();

        assert_eq!(stored.circular_id, 1);
        let published = broker.published().await;
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "gcn.circulars");
        let payload: Circular = serde_json::from_slice(&published[0].1).unwrap();
        assert_eq!(payload, stored);
    }

    #[tokio::test]
    async fn invalid_submission_never_reaches_the_store() {
        let circulars = InMemoryCirculars::new();
        let broker = Arc::new(InMemoryBroker::new());
        let publisher = Publisher::ephemeral(Arc::clone(&broker) as _);

        let err = submit(&circulars, &publisher, "gcn.circulars", submission("  "))
            .await
            .unwrap_err();

        assert!(matches!(err, AdminError::Validation(_)));
        assert!(broker.published().await.is_empty());
        assert!(get(&circulars, 1).await.is_err());
    }

    #[tokio::test]
    async fn publish_failure_is_not_fatal() {
        let circulars = InMemoryCirculars::new();
        let broker = Arc::new(InMemoryBroker::new());
        // Persistent mode after close: every publish fails.
        let publisher = Publisher::persistent(Arc::clone(&broker) as _);
        publisher.close().await.unwrap();

        let stored = submit(
            &circulars,
            &publisher,
            "gcn.circulars",
            submission("GRB 240101A: Swift detection"),
        )
        .await
        .unwrap();

        assert_eq!(stored.circular_id, 1);
        assert_eq!(get(&circulars, 1).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn missing_circular_is_not_found() {
        let circulars = InMemoryCirculars::new();
        let err = get(&circulars, 99).await.unwrap_err();
        assert!(matches!(err, AdminError::NotFound { .. }));
    }
}
