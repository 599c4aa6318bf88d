//! # gcn-model
//!
//! Domain models for the GCN Kafka admin and circulars service.
//!
//! ## Modules
//!
//! - [`acl`] - Access control bindings and mirror entries
//! - [`circular`] - Circulars (astronomy bulletins)
//! - [`sync`] - Bulk-sync log records

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod acl;
pub mod circular;
pub mod sync;

pub use acl::{
    AclBinding, AclEntry, AclOperation, AclPatternType, AclPermission, AclResourceType,
    ClientType, ParseAclFieldError, WILDCARD_HOST,
};
pub use circular::{Circular, CircularSubmission, CircularValidationError, MAX_SUBJECT_LENGTH};
pub use sync::SyncRecord;
