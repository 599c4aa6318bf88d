//! # gcn-storage
//!
//! Storage abstraction traits for the GCN service.
//!
//! This crate defines the provider interfaces implemented by concrete
//! storage backends, plus in-memory providers for tests and ephemeral
//! deployments.
//!
//! ## Provider Traits
//!
//! - [`AclMirrorProvider`] - CRUD and filtered scan of the ACL mirror
//! - [`SyncLogProvider`] - append-only bulk-sync log
//! - [`CircularProvider`] - counter-assigned circulars with search

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod acl;
pub mod circular;
pub mod error;
pub mod memory;
pub mod sync;

pub use acl::AclMirrorProvider;
pub use circular::{
    resolve_fuzzy_time, CircularPage, CircularProvider, CircularSearchCriteria,
    DEFAULT_PAGE_LIMIT,
};
pub use error::{StorageError, StorageResult};
pub use memory::{InMemoryAclMirror, InMemoryCirculars, InMemorySyncLog};
pub use sync::SyncLogProvider;
