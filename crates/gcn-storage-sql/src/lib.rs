//! # gcn-storage-sql
//!
//! SQLx-based `PostgreSQL` storage for the GCN service.
//!
//! Provides concrete implementations of the `gcn-storage` provider traits
//! plus pool construction and schema bootstrap.

#![forbid(unsafe_code)]

pub mod acl;
pub mod circular;
pub mod entities;
pub mod error;
pub mod pool;
pub mod schema;
pub mod sync;

pub use acl::PgAclMirrorProvider;
pub use circular::PgCircularProvider;
pub use pool::{create_pool, PoolConfig};
pub use schema::init_schema;
pub use sync::PgSyncLogProvider;
