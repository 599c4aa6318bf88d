//! Broker error types.

use thiserror::Error;

/// Errors surfaced by broker operations.
///
/// No retry, backoff, or circuit breaking happens at this layer; errors
/// propagate to the caller as-is.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Failed to establish or maintain a broker connection.
    #[error("Broker connection error: {0}")]
    Connection(String),

    /// An administrative call was rejected.
    #[error("Broker admin error: {0}")]
    Admin(String),

    /// A topic write was rejected.
    #[error("Publish error: {0}")]
    Publish(String),

    /// The producer connection was closed by the host's shutdown hook.
    #[error("Producer connection is closed")]
    Disconnected,
}

/// Result type for broker operations.
pub type BrokerResult<T> = Result<T, BrokerError>;
