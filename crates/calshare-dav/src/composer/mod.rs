//! Per-principal calendar tree composition.
//!
//! `calendars` -> `calendars/{user}` -> one node per calendar record plus
//! the outbox. Composition reads from the backend and never writes grants.

pub mod nodes;
pub mod resolver;

use std::sync::Arc;

use calshare_auth::AclResolver;
use calshare_core::AppResult;
use calshare_core::config::DavConfig;
use calshare_core::traits::{CalendarBackend, DavNode};

pub use nodes::{CalendarHome, CalendarNode, CalendarRoot, OutboxNode};
pub use resolver::CalendarTreeResolver;

/// Builds calendar tree nodes on demand.
#[derive(Clone)]
pub struct CollectionComposer {
    backend: Arc<dyn CalendarBackend>,
    acl: AclResolver,
    calendar_root: String,
    outbox_name: String,
    config: DavConfig,
}

impl std::fmt::Debug for CollectionComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionComposer")
            .field("calendar_root", &self.calendar_root)
            .field("outbox_name", &self.outbox_name)
            .finish_non_exhaustive()
    }
}

impl CollectionComposer {
    /// Creates a composer over `backend`.
    pub fn new(config: &DavConfig, backend: Arc<dyn CalendarBackend>) -> Self {
        Self {
            backend,
            acl: AclResolver::new(config),
            calendar_root: config.calendar_root.trim_matches('/').to_string(),
            outbox_name: config.outbox_suffix.clone(),
            config: config.clone(),
        }
    }

    /// Name of the root collection.
    pub fn calendar_root(&self) -> &str {
        &self.calendar_root
    }

    /// The root collection node.
    pub fn root(&self) -> Arc<CalendarRoot> {
        Arc::new(CalendarRoot {
            name: self.calendar_root.clone(),
        })
    }

    /// The calendar home of `user_id`.
    pub fn home(&self, user_id: &str) -> Arc<CalendarHome> {
        Arc::new(CalendarHome {
            user_id: user_id.to_string(),
            principal_uri: self.config.principal_for(user_id),
            composer: self.clone(),
        })
    }

    /// Children of a principal's home: its calendars, then the outbox.
    pub async fn compose(&self, principal_uri: &str) -> AppResult<Vec<Arc<dyn DavNode>>> {
        let records = self.backend.calendars_for_principal(principal_uri).await?;

        let mut children: Vec<Arc<dyn DavNode>> = Vec::with_capacity(records.len() + 1);
        for record in records {
            children.push(Arc::new(CalendarNode::new(
                record,
                self.backend.clone(),
                self.acl.clone(),
            )));
        }
        children.push(Arc::new(OutboxNode {
            name: self.outbox_name.clone(),
        }));

        tracing::debug!(
            principal = %principal_uri,
            children = children.len(),
            "Composed calendar home"
        );

        Ok(children)
    }
}
