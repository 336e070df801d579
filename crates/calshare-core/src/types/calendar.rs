//! Calendar records returned by the backend and search results.

use serde::{Deserialize, Serialize};

use super::id::ResourceId;

/// A calendar collection as seen from one principal's home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRecord {
    /// Share storage id of the collection.
    pub id: ResourceId,
    /// Path segment under the principal's calendar home.
    pub uri: String,
    /// Principal whose home lists this record.
    pub principal_uri: String,
    /// Display name.
    pub display_name: String,
    /// Supported component names.
    pub components: Vec<String>,
    /// Principal of the sharer when the record was reached through a share.
    pub owner_principal: Option<String>,
    /// Set on shared records the sharee may only read.
    pub read_only: bool,
}

impl CalendarRecord {
    /// Principal owning the underlying collection.
    pub fn owner(&self) -> &str {
        self.owner_principal
            .as_deref()
            .unwrap_or(&self.principal_uri)
    }

    /// Whether the record is a sharee's view of another principal's calendar.
    pub fn is_shared(&self) -> bool {
        self.owner_principal.is_some()
    }
}

/// One object matched by a calendar search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Href of the calendar object.
    pub href: String,
    /// Entity tag of the object.
    pub etag: String,
}
