//! Share storage and calendar backend traits.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{CalendarRecord, ResourceId, ShareGrant, ShareInvitation};

/// Persists sharee records and their permission bitmasks.
#[async_trait]
pub trait ShareStorage: Send + Sync {
    /// All grants recorded for a resource.
    async fn get_grants(&self, resource_id: ResourceId) -> AppResult<Vec<ShareGrant>>;

    /// Apply additions then removals for one resource, atomically.
    ///
    /// Removing an href without a grant is not an error.
    async fn update_shares(
        &self,
        resource_id: ResourceId,
        additions: &[ShareInvitation],
        removals: &[String],
    ) -> AppResult<()>;

    /// Drop every grant of a deleted resource.
    async fn delete_grants(&self, resource_id: ResourceId) -> AppResult<()>;
}

/// Lists the calendars visible in a principal's home.
#[async_trait]
pub trait CalendarBackend: ShareStorage {
    /// Owned calendars followed by calendars shared with the principal.
    async fn calendars_for_principal(&self, principal_uri: &str)
    -> AppResult<Vec<CalendarRecord>>;
}
