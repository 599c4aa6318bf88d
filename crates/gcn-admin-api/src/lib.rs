//! # gcn-admin-api
//!
//! Admin REST API for the GCN Kafka ACL mirror and circulars store.
//!
//! ## Modules
//!
//! - [`acl`] - Kafka ACL reconciliation operations
//! - [`auth`] - Bearer token authentication and group gates
//! - [`circulars`] - Circular submission, retrieval, and search
//! - [`dto`] - Data transfer objects for API requests/responses
//! - [`error`] - Error types and HTTP error responses
//! - [`router`] - Axum routers and HTTP handlers
//! - [`state`] - Application state management
//!
//! ## API Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/admin/kafka/acls` | Intent dispatch: `migrateFromBroker`, `migrateFromDB`, `create`, `delete` |
//! | GET | `/admin/kafka/acls` | List mirror entries, optionally filtered |
//! | GET | `/admin/kafka/acls/sync` | Most recent bulk-sync record |
//! | POST | `/circulars` | Submit a circular |
//! | GET | `/circulars/{id}` | Get a circular by id |
//! | GET | `/circulars` | Search circulars |
//!
//! The Kafka routes require the admin group; submission requires the
//! submitter group. A caller outside the required group gets a 403 with
//! an empty body before any store or broker side effect.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod acl;
pub mod auth;
pub mod circulars;
pub mod dto;
pub mod error;
pub mod router;
pub mod state;

pub use auth::{authenticate, bearer_token, GroupResolver, StaticGroupResolver, UserContext};
pub use dto::{
    AclActionForm, AclListParams, CircularSearchParams, CircularSearchResponse,
    CircularSubmitRequest, CreateAclRequest, DeleteSummary, ImportSummary, PushSummary,
};
pub use error::{AdminError, AdminResult, ErrorResponse};
pub use router::{api_router, circulars_router, kafka_admin_router};
pub use state::{AdminSettings, AdminState};
