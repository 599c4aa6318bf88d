//! Admin API state management.

use std::sync::Arc;

use gcn_broker::{BrokerAdmin, Publisher};
use gcn_storage::{AclMirrorProvider, CircularProvider, SyncLogProvider};

use crate::auth::GroupResolver;

/// Deployment-specific settings consulted by the handlers.
#[derive(Debug, Clone)]
pub struct AdminSettings {
    /// Group that gates every Kafka admin route.
    pub admin_group: String,
    /// Group that gates circular submission.
    pub submitter_group: String,
    /// Topic that stored circulars are published to.
    pub circulars_topic: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            admin_group: "gcn.nasa.gov/kafka-admin".to_string(),
            submitter_group: "gcn.nasa.gov/circular-submitter".to_string(),
            circulars_topic: "gcn.circulars".to_string(),
        }
    }
}

/// Admin API application state.
///
/// Holds every provider and seam the handlers need. Uses `Arc` for
/// thread-safe shared ownership.
pub struct AdminState<M, L, C, B, G>
where
    M: AclMirrorProvider,
    L: SyncLogProvider,
    C: CircularProvider,
    B: BrokerAdmin,
    G: GroupResolver,
{
    /// ACL mirror provider.
    pub mirror: Arc<M>,
    /// Bulk-sync log provider.
    pub sync_log: Arc<L>,
    /// Circulars provider.
    pub circulars: Arc<C>,
    /// Broker administrative seam.
    pub broker: Arc<B>,
    /// Producer publish handle.
    pub publisher: Arc<Publisher>,
    /// Bearer token resolver.
    pub groups: Arc<G>,
    /// Deployment settings.
    pub settings: Arc<AdminSettings>,
}

// Manual Clone implementation that doesn't require T: Clone for Arc<T>
impl<M, L, C, B, G> Clone for AdminState<M, L, C, B, G>
where
    M: AclMirrorProvider,
    L: SyncLogProvider,
    C: CircularProvider,
    B: BrokerAdmin,
    G: GroupResolver,
{
    fn clone(&self) -> Self {
        Self {
            mirror: Arc::clone(&self.mirror),
            sync_log: Arc::clone(&self.sync_log),
            circulars: Arc::clone(&self.circulars),
            broker: Arc::clone(&self.broker),
            publisher: Arc::clone(&self.publisher),
            groups: Arc::clone(&self.groups),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<M, L, C, B, G> AdminState<M, L, C, B, G>
where
    M: AclMirrorProvider,
    L: SyncLogProvider,
    C: CircularProvider,
    B: BrokerAdmin,
    G: GroupResolver,
{
    /// Creates a new admin state.
    pub fn new(
        mirror: Arc<M>,
        sync_log: Arc<L>,
        circulars: Arc<C>,
        broker: Arc<B>,
        publisher: Arc<Publisher>,
        groups: Arc<G>,
        settings: AdminSettings,
    ) -> Self {
        Self {
            mirror,
            sync_log,
            circulars,
            broker,
            publisher,
            groups,
            settings: Arc::new(settings),
        }
    }
}
