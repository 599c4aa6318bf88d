//! # gcn-broker
//!
//! Broker-facing seams for the GCN service.
//!
//! The Kafka broker and its client library are external collaborators;
//! this crate defines the administrative and producer interfaces the rest
//! of the service programs against, plus an in-memory broker used by
//! tests and sandbox deployments.
//!
//! ## Modules
//!
//! - [`admin`] - describe/create/delete ACLs and idempotent topic creation
//! - [`producer`] - publish with ephemeral or persistent connection lifecycle
//! - [`memory`] - in-memory broker implementing both seams

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod admin;
pub mod error;
pub mod memory;
pub mod producer;

pub use admin::BrokerAdmin;
pub use error::{BrokerError, BrokerResult};
pub use memory::InMemoryBroker;
pub use producer::{DeliveryMode, ProducerConnection, ProducerConnector, Publisher};
