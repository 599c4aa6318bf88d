//! Broker administrative API seam.

use async_trait::async_trait;
use gcn_model::AclBinding;

use crate::error::BrokerResult;

/// Thin wrapper over the broker's administrative API.
///
/// Batch calls are single round trips; there is no per-item retry. The
/// broker addresses rules by the full binding tuple, never by mirror id.
#[async_trait]
pub trait BrokerAdmin: Send + Sync {
    /// Fetches the complete ACL set, using wildcard filters on every
    /// dimension.
    async fn describe_all_acls(&self) -> BrokerResult<Vec<AclBinding>>;

    /// Creates the given bindings as a single batched call.
    async fn create_acls(&self, bindings: &[AclBinding]) -> BrokerResult<()>;

    /// Deletes the rules matching the given binding tuples as a single
    /// batched call.
    async fn delete_acls(&self, bindings: &[AclBinding]) -> BrokerResult<()>;

    /// Creates topics, tolerating ones that already exist.
    async fn create_topics(&self, topics: &[String]) -> BrokerResult<()>;
}
