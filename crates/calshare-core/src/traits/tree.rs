//! Resource tree abstraction consumed by the DAV plugins.

use std::sync::Arc;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{Ace, ResourceId, ShareInvitation};

/// A node in the DAV resource tree.
#[async_trait]
pub trait DavNode: Send + Sync + std::fmt::Debug {
    /// Last path segment of the node.
    fn name(&self) -> &str;

    /// Whether the node is a collection.
    fn is_collection(&self) -> bool {
        true
    }

    /// The sharing capability, when the node supports it.
    fn as_shareable(&self) -> Option<&dyn Shareable> {
        None
    }

    /// Access control entries visible to `user_id`.
    async fn acl(&self, _user_id: &str) -> AppResult<Vec<Ace>> {
        Ok(Vec::new())
    }

    /// Child nodes, enumerated on demand.
    async fn children(&self) -> AppResult<Vec<Arc<dyn DavNode>>> {
        Ok(Vec::new())
    }
}

/// A collection whose sharee list can be edited.
#[async_trait]
pub trait Shareable: DavNode {
    /// Share storage id of the collection.
    fn resource_id(&self) -> ResourceId;

    /// Principal owning the collection.
    fn owner_principal(&self) -> &str;

    /// Apply additions and removals in order.
    ///
    /// Implementations must apply the whole call atomically; the caller never
    /// retries and never issues a second call for the same request.
    async fn update_shares(&self, additions: &[ShareInvitation], removals: &[String])
    -> AppResult<()>;
}

/// Resolves request paths to tree nodes.
#[async_trait]
pub trait NodeResolver: Send + Sync {
    /// Resolve `path` (without leading slash). An unknown path yields an
    /// error of kind `NotFound`.
    async fn resolve(&self, path: &str) -> AppResult<Arc<dyn DavNode>>;
}
