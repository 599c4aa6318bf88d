//! Producer connection lifecycle.
//!
//! Two deployment targets have incompatible assumptions about whether
//! background cleanup can complete after a handler returns:
//!
//! - **Ephemeral** hosts (short-lived serverless invocations) get a fresh
//!   connection per publish, closed in a guaranteed-cleanup path.
//! - **Persistent** hosts establish one connection per process lifetime,
//!   memoized first-call-wins, and rely on the host's shutdown hook to
//!   invoke [`Publisher::close`]. A connection drop after startup is not
//!   recovered; there is no reconnect logic.
//!
//! The mode is selected once at process start from configuration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::{BrokerError, BrokerResult};

/// A live connection to the broker's producer API.
#[async_trait]
pub trait ProducerConnection: Send + Sync {
    /// Sends one payload to the named topic.
    async fn send(&self, topic: &str, payload: &[u8]) -> BrokerResult<()>;

    /// Disconnects. Further sends on this connection fail.
    async fn close(&self) -> BrokerResult<()>;
}

/// Factory for producer connections.
#[async_trait]
pub trait ProducerConnector: Send + Sync {
    /// Establishes a new connection.
    async fn connect(&self) -> BrokerResult<Arc<dyn ProducerConnection>>;
}

/// Connection lifecycle strategy, chosen once at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Connect, send, and close on every publish.
    Ephemeral,
    /// Connect at most once per process lifetime and reuse.
    Persistent,
}

/// Owned publish handle injected into application state.
///
/// `publish` propagates the underlying client's error; no retry is
/// performed at this layer. In persistent mode the host's shutdown hook
/// must invoke [`close`](Publisher::close).
pub struct Publisher {
    connector: Arc<dyn ProducerConnector>,
    mode: DeliveryMode,
    connection: OnceCell<Arc<dyn ProducerConnection>>,
    closed: AtomicBool,
}

impl Publisher {
    /// Creates a publisher with the given lifecycle mode.
    #[must_use]
    pub fn new(connector: Arc<dyn ProducerConnector>, mode: DeliveryMode) -> Self {
        Self {
            connector,
            mode,
            connection: OnceCell::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Creates an ephemeral-mode publisher.
    #[must_use]
    pub fn ephemeral(connector: Arc<dyn ProducerConnector>) -> Self {
        Self::new(connector, DeliveryMode::Ephemeral)
    }

    /// Creates a persistent-mode publisher.
    #[must_use]
    pub fn persistent(connector: Arc<dyn ProducerConnector>) -> Self {
        Self::new(connector, DeliveryMode::Persistent)
    }

    /// Returns the lifecycle mode.
    #[must_use]
    pub const fn mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Publishes one payload to the named topic.
    ///
    /// # Errors
    ///
    /// Propagates connection and send errors from the underlying client.
    /// In persistent mode, fails with [`BrokerError::Disconnected`] after
    /// [`close`](Publisher::close) has run.
    pub async fn publish(&self, topic: &str, payload: &[u8]) -> BrokerResult<()> {
        match self.mode {
            DeliveryMode::Ephemeral => {
                let connection = self.connector.connect().await?;
                let sent = connection.send(topic, payload).await;
                // Close runs whether or not the send succeeded.
                let closed = connection.close().await;
                sent?;
                closed
            }
            DeliveryMode::Persistent => {
                if self.closed.load(Ordering::SeqCst) {
                    return Err(BrokerError::Disconnected);
                }
                // First caller connects; concurrent early callers await the
                // same in-flight attempt instead of racing to duplicates.
                let connection = self
                    .connection
                    .get_or_try_init(|| self.connector.connect())
                    .await?;
                connection.send(topic, payload).await
            }
        }
    }

    /// Disconnects the memoized connection, if one was ever established.
    ///
    /// Invoked by the host's shutdown hook. Idempotent; a no-op in
    /// ephemeral mode.
    pub async fn close(&self) -> BrokerResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if let Some(connection) = self.connection.get() {
            debug!("closing producer connection");
            connection.close().await
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Default)]
    struct CountingConnection {
        sends: AtomicUsize,
        closes: AtomicUsize,
        fail_sends: bool,
    }

    #[async_trait]
    impl ProducerConnection for Arc<CountingConnection> {
        async fn send(&self, _topic: &str, _payload: &[u8]) -> BrokerResult<()> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            if self.fail_sends {
                Err(BrokerError::Publish("send rejected".to_string()))
            } else {
                Ok(())
            }
        }

        async fn close(&self) -> BrokerResult<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct CountingConnector {
        connection: Arc<CountingConnection>,
        connects: AtomicUsize,
        connect_delay: Duration,
    }

    impl CountingConnector {
        fn new(fail_sends: bool) -> Self {
            Self {
                connection: Arc::new(CountingConnection {
                    fail_sends,
                    ..CountingConnection::default()
                }),
                connects: AtomicUsize::new(0),
                connect_delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl ProducerConnector for CountingConnector {
        async fn connect(&self) -> BrokerResult<Arc<dyn ProducerConnection>> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if !self.connect_delay.is_zero() {
                tokio::time::sleep(self.connect_delay).await;
            }
            Ok(Arc::new(Arc::clone(&self.connection)))
        }
    }

    #[tokio::test]
    async fn ephemeral_opens_and_closes_per_publish() {
        let connector = Arc::new(CountingConnector::new(false));
        let publisher = Publisher::ephemeral(Arc::clone(&connector) as _);

        publisher.publish("gcn.circulars", b"one").await.unwrap();
        publisher.publish("gcn.circulars", b"two").await.unwrap();

        assert_eq!(connector.connects.load(Ordering::SeqCst), 2);
        assert_eq!(connector.connection.closes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn ephemeral_closes_even_when_send_fails() {
        let connector = Arc::new(CountingConnector::new(true));
        let publisher = Publisher::ephemeral(Arc::clone(&connector) as _);

        let err = publisher.publish("gcn.circulars", b"x").await.unwrap_err();
        assert!(matches!(err, BrokerError::Publish(_)));
        assert_eq!(connector.connection.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn persistent_connects_once_across_publishes() {
        let connector = Arc::new(CountingConnector::new(false));
        let publisher = Publisher::persistent(Arc::clone(&connector) as _);

        publisher.publish("gcn.circulars", b"one").await.unwrap();
        publisher.publish("gcn.circulars", b"two").await.unwrap();
        publisher.publish("gcn.circulars", b"three").await.unwrap();

        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
        assert_eq!(connector.connection.sends.load(Ordering::SeqCst), 3);
        assert_eq!(connector.connection.closes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn concurrent_first_publishes_share_one_connection_attempt() {
        let mut connector = CountingConnector::new(false);
        connector.connect_delay = Duration::from_millis(20);
        let connector = Arc::new(connector);
        let publisher = Arc::new(Publisher::persistent(Arc::clone(&connector) as _));

        let a = tokio::spawn({
            let publisher = Arc::clone(&publisher);
            async move { publisher.publish("gcn.circulars", b"a").await }
        });
        let b = tokio::spawn({
            let publisher = Arc::clone(&publisher);
            async move { publisher.publish("gcn.circulars", b"b").await }
        });

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn close_is_idempotent_and_stops_publishing() {
        let connector = Arc::new(CountingConnector::new(false));
        let publisher = Publisher::persistent(Arc::clone(&connector) as _);

        publisher.publish("gcn.circulars", b"one").await.unwrap();
        publisher.close().await.unwrap();
        publisher.close().await.unwrap();

        assert_eq!(connector.connection.closes.load(Ordering::SeqCst), 1);
        let err = publisher.publish("gcn.circulars", b"two").await.unwrap_err();
        assert!(matches!(err, BrokerError::Disconnected));
    }

    #[tokio::test]
    async fn close_without_connection_is_a_no_op() {
        let connector = Arc::new(CountingConnector::new(false));
        let publisher = Publisher::persistent(Arc::clone(&connector) as _);

        publisher.close().await.unwrap();
        assert_eq!(connector.connection.closes.load(Ordering::SeqCst), 0);
    }
}
