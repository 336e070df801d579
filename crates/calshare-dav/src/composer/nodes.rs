//! Nodes of the composed calendar tree.

use std::sync::Arc;

use async_trait::async_trait;

use calshare_auth::AclResolver;
use calshare_core::AppResult;
use calshare_core::error::AppError;
use calshare_core::traits::{CalendarBackend, DavNode, Shareable};
use calshare_core::types::{Ace, CalendarRecord, ResourceId, ShareInvitation};

use super::CollectionComposer;

/// The `calendars` collection.
#[derive(Debug)]
pub struct CalendarRoot {
    pub(crate) name: String,
}

impl DavNode for CalendarRoot {
    fn name(&self) -> &str {
        &self.name
    }
}

/// One principal's calendar home (`calendars/{user}`).
#[derive(Debug)]
pub struct CalendarHome {
    pub(crate) user_id: String,
    pub(crate) principal_uri: String,
    pub(crate) composer: CollectionComposer,
}

impl CalendarHome {
    /// Principal owning the home.
    pub fn principal_uri(&self) -> &str {
        &self.principal_uri
    }
}

#[async_trait]
impl DavNode for CalendarHome {
    fn name(&self) -> &str {
        &self.user_id
    }

    async fn children(&self) -> AppResult<Vec<Arc<dyn DavNode>>> {
        self.composer.compose(&self.principal_uri).await
    }
}

/// A calendar collection, owned or reached through a share.
pub struct CalendarNode {
    record: CalendarRecord,
    backend: Arc<dyn CalendarBackend>,
    acl: AclResolver,
}

impl std::fmt::Debug for CalendarNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarNode")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

impl CalendarNode {
    pub(crate) fn new(
        record: CalendarRecord,
        backend: Arc<dyn CalendarBackend>,
        acl: AclResolver,
    ) -> Self {
        Self {
            record,
            backend,
            acl,
        }
    }

    /// The backing record.
    pub fn record(&self) -> &CalendarRecord {
        &self.record
    }
}

#[async_trait]
impl DavNode for CalendarNode {
    fn name(&self) -> &str {
        &self.record.uri
    }

    fn as_shareable(&self) -> Option<&dyn Shareable> {
        Some(self)
    }

    async fn acl(&self, user_id: &str) -> AppResult<Vec<Ace>> {
        self.acl
            .resolve_for_resource(
                self.backend.as_ref(),
                self.record.id,
                self.record.owner(),
                user_id,
            )
            .await
    }
}

#[async_trait]
impl Shareable for CalendarNode {
    fn resource_id(&self) -> ResourceId {
        self.record.id
    }

    fn owner_principal(&self) -> &str {
        self.record.owner()
    }

    async fn update_shares(
        &self,
        additions: &[ShareInvitation],
        removals: &[String],
    ) -> AppResult<()> {
        if self.record.is_shared() {
            return Err(AppError::authorization(format!(
                "Only the owner may change the sharees of '{}'",
                self.record.uri
            )));
        }
        self.backend
            .update_shares(self.record.id, additions, removals)
            .await
    }
}

/// The synthetic scheduling outbox of a calendar home.
#[derive(Debug)]
pub struct OutboxNode {
    pub(crate) name: String,
}

impl DavNode for OutboxNode {
    fn name(&self) -> &str {
        &self.name
    }
}
