//! Calendar collections and their share grants.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use calshare_core::AppResult;
use calshare_core::error::AppError;
use calshare_core::traits::{CalendarBackend, PrincipalBackend, ShareStorage};
use calshare_core::types::{CalendarRecord, ResourceId, ShareGrant, ShareInvitation};

/// A calendar collection as created by its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCalendar {
    /// Share storage id.
    pub id: ResourceId,
    /// Owning principal.
    pub owner_principal: String,
    /// Path segment under the owner's home.
    pub uri: String,
    /// Display name.
    pub display_name: String,
    /// Supported components.
    pub components: Vec<String>,
}

/// In-memory calendar backend.
///
/// Grants live in one map keyed by resource id. A share update takes the
/// entry guard of that id once and applies the whole call under it.
pub struct MemoryStore {
    calendars: DashMap<ResourceId, StoredCalendar>,
    grants: DashMap<ResourceId, Vec<ShareGrant>>,
    principals: Arc<dyn PrincipalBackend>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("calendars", &self.calendars.len())
            .field("grants", &self.grants.len())
            .finish_non_exhaustive()
    }
}

impl MemoryStore {
    /// Creates an empty store resolving sharee hrefs through `principals`.
    pub fn new(principals: Arc<dyn PrincipalBackend>) -> Self {
        Self {
            calendars: DashMap::new(),
            grants: DashMap::new(),
            principals,
            next_id: AtomicU64::new(1),
        }
    }

    /// Creates a calendar in the home of `owner_principal`.
    pub fn create_calendar(
        &self,
        owner_principal: &str,
        uri: &str,
        display_name: &str,
        components: &[&str],
    ) -> AppResult<ResourceId> {
        if uri.is_empty() || uri.contains('/') {
            return Err(AppError::validation(format!("Invalid calendar uri '{uri}'")));
        }
        let exists = self
            .calendars
            .iter()
            .any(|c| c.owner_principal == owner_principal && c.uri == uri);
        if exists {
            return Err(AppError::conflict(format!(
                "Calendar '{uri}' already exists for {owner_principal}"
            )));
        }

        let id = ResourceId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.calendars.insert(
            id,
            StoredCalendar {
                id,
                owner_principal: owner_principal.to_string(),
                uri: uri.to_string(),
                display_name: display_name.to_string(),
                components: components.iter().map(|c| c.to_string()).collect(),
            },
        );

        info!(resource_id = %id, owner = %owner_principal, uri = %uri, "Created calendar");
        Ok(id)
    }

    /// Removes a calendar together with its grants.
    pub async fn delete_calendar(&self, id: ResourceId) -> AppResult<()> {
        if self.calendars.remove(&id).is_none() {
            return Err(AppError::not_found(format!("Calendar {id} not found")));
        }
        self.delete_grants(id).await
    }

    /// A calendar by id.
    pub fn calendar(&self, id: ResourceId) -> Option<StoredCalendar> {
        self.calendars.get(&id).map(|c| c.value().clone())
    }

    /// A calendar by owner and uri.
    pub fn find_calendar(&self, owner_principal: &str, uri: &str) -> Option<StoredCalendar> {
        self.calendars
            .iter()
            .find(|c| c.owner_principal == owner_principal && c.uri == uri)
            .map(|c| c.value().clone())
    }

    async fn resolve_href(&self, href: &str) -> AppResult<Option<String>> {
        if href.is_empty() {
            return Ok(None);
        }
        self.principals.find_by_uri(href).await
    }

    fn shared_record(calendar: &StoredCalendar, grant: &ShareGrant) -> CalendarRecord {
        let owner_name = last_segment(&calendar.owner_principal);
        CalendarRecord {
            id: calendar.id,
            uri: format!("{}_shared_by_{}", calendar.uri, owner_name),
            principal_uri: grant.principal.clone(),
            display_name: format!("{} ({})", calendar.display_name, owner_name),
            components: calendar.components.clone(),
            owner_principal: Some(calendar.owner_principal.clone()),
            read_only: grant.is_read_only(),
        }
    }
}

fn last_segment(principal: &str) -> &str {
    principal
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(principal)
}

#[async_trait]
impl ShareStorage for MemoryStore {
    async fn get_grants(&self, resource_id: ResourceId) -> AppResult<Vec<ShareGrant>> {
        Ok(self
            .grants
            .get(&resource_id)
            .map(|g| g.value().clone())
            .unwrap_or_default())
    }

    async fn update_shares(
        &self,
        resource_id: ResourceId,
        additions: &[ShareInvitation],
        removals: &[String],
    ) -> AppResult<()> {
        let Some(owner) = self
            .calendars
            .get(&resource_id)
            .map(|c| c.owner_principal.clone())
        else {
            return Err(AppError::not_found(format!(
                "Calendar {resource_id} not found"
            )));
        };

        // Resolve every href before taking the entry guard.
        let mut resolved_additions = Vec::with_capacity(additions.len());
        for invitation in additions {
            match self.resolve_href(&invitation.href).await? {
                Some(principal) if principal == owner => {
                    debug!(resource_id = %resource_id, "Ignoring share with the owner");
                }
                Some(principal) => resolved_additions.push(ShareGrant::from_invitation(
                    principal, invitation,
                )),
                None => warn!(
                    resource_id = %resource_id,
                    href = %invitation.href,
                    "Skipping sharee that does not resolve to a principal"
                ),
            }
        }

        let mut resolved_removals = Vec::with_capacity(removals.len());
        for href in removals {
            let principal = self.resolve_href(href).await?;
            resolved_removals.push((href.as_str(), principal));
        }

        let mut entry = self.grants.entry(resource_id).or_default();
        let grants = entry.value_mut();

        for grant in resolved_additions {
            match grants.iter_mut().find(|g| g.principal == grant.principal) {
                Some(existing) => *existing = grant,
                None => grants.push(grant),
            }
        }

        for (href, principal) in resolved_removals {
            grants.retain(|g| g.href != href && principal.as_deref() != Some(g.principal.as_str()));
        }

        debug!(
            resource_id = %resource_id,
            additions = additions.len(),
            removals = removals.len(),
            sharees = grants.len(),
            "Applied share update"
        );
        Ok(())
    }

    async fn delete_grants(&self, resource_id: ResourceId) -> AppResult<()> {
        self.grants.remove(&resource_id);
        Ok(())
    }
}

#[async_trait]
impl CalendarBackend for MemoryStore {
    async fn calendars_for_principal(
        &self,
        principal_uri: &str,
    ) -> AppResult<Vec<CalendarRecord>> {
        let mut owned: Vec<StoredCalendar> = self
            .calendars
            .iter()
            .filter(|c| c.owner_principal == principal_uri)
            .map(|c| c.value().clone())
            .collect();
        owned.sort_by_key(|c| c.id);

        let mut shared: Vec<(StoredCalendar, ShareGrant)> = self
            .grants
            .iter()
            .filter_map(|entry| {
                let grant = entry.value().iter().find(|g| g.principal == principal_uri)?;
                let calendar = self.calendars.get(entry.key())?;
                Some((calendar.value().clone(), grant.clone()))
            })
            .collect();
        shared.sort_by_key(|(c, _)| c.id);

        let mut records: Vec<CalendarRecord> = owned
            .into_iter()
            .map(|c| CalendarRecord {
                id: c.id,
                uri: c.uri,
                principal_uri: principal_uri.to_string(),
                display_name: c.display_name,
                components: c.components,
                owner_principal: None,
                read_only: false,
            })
            .collect();
        records.extend(
            shared
                .iter()
                .map(|(calendar, grant)| Self::shared_record(calendar, grant)),
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use calshare_core::config::DavConfig;
    use calshare_core::types::SharePermissions;

    use crate::directory::{Account, Directory};

    fn store() -> (MemoryStore, ResourceId) {
        let directory = Directory::new(&DavConfig::default());
        for (id, email) in [
            ("alice", "alice@example.com"),
            ("bob", "bob@example.com"),
            ("carol", "carol@example.com"),
        ] {
            directory
                .insert(Account {
                    id: id.into(),
                    email: email.into(),
                    display_name: id.into(),
                    password_hash: String::new(),
                })
                .unwrap();
        }
        let store = MemoryStore::new(Arc::new(directory));
        let id = store
            .create_calendar("principals/alice", "personal", "Personal", &["VEVENT"])
            .unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn test_additions_resolve_hrefs() {
        let (store, id) = store();
        store
            .update_shares(
                id,
                &[
                    ShareInvitation::read_only("mailto:bob@example.com"),
                    ShareInvitation::read_write("principal:principals/carol"),
                    ShareInvitation::read_only("mailto:nobody@example.com"),
                    ShareInvitation::read_only(""),
                ],
                &[],
            )
            .await
            .unwrap();

        let grants = store.get_grants(id).await.unwrap();
        assert_eq!(grants.len(), 2);
        assert_eq!(grants[0].principal, "principals/bob");
        assert_eq!(grants[0].permissions, SharePermissions::READ);
        assert_eq!(grants[1].principal, "principals/carol");
        assert!(!grants[1].is_read_only());
    }

    #[tokio::test]
    async fn test_later_addition_for_same_principal_wins() {
        let (store, id) = store();
        store
            .update_shares(
                id,
                &[
                    ShareInvitation::read_only("mailto:bob@example.com"),
                    ShareInvitation::read_write("principal:principals/bob"),
                ],
                &[],
            )
            .await
            .unwrap();

        let grants = store.get_grants(id).await.unwrap();
        assert_eq!(grants.len(), 1);
        assert!(!grants[0].is_read_only());
    }

    #[tokio::test]
    async fn test_removals_apply_after_additions() {
        let (store, id) = store();
        store
            .update_shares(
                id,
                &[ShareInvitation::read_only("mailto:bob@example.com")],
                &["principal:principals/bob".to_string()],
            )
            .await
            .unwrap();
        assert!(store.get_grants(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_removing_absent_grant_is_noop() {
        let (store, id) = store();
        store
            .update_shares(id, &[], &["mailto:carol@example.com".to_string()])
            .await
            .unwrap();
        assert!(store.get_grants(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_owner_is_never_a_sharee() {
        let (store, id) = store();
        store
            .update_shares(id, &[ShareInvitation::read_only("mailto:alice@example.com")], &[])
            .await
            .unwrap();
        assert!(store.get_grants(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_resource() {
        let (store, _) = store();
        let err = store
            .update_shares(ResourceId(99), &[], &[])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_shared_calendar_appears_in_sharee_home() {
        let (store, id) = store();
        store
            .update_shares(id, &[ShareInvitation::read_only("mailto:bob@example.com")], &[])
            .await
            .unwrap();

        let bob = store.calendars_for_principal("principals/bob").await.unwrap();
        assert_eq!(bob.len(), 1);
        assert_eq!(bob[0].id, id);
        assert_eq!(bob[0].uri, "personal_shared_by_alice");
        assert_eq!(bob[0].display_name, "Personal (alice)");
        assert_eq!(bob[0].owner(), "principals/alice");
        assert!(bob[0].read_only);

        let alice = store.calendars_for_principal("principals/alice").await.unwrap();
        assert_eq!(alice.len(), 1);
        assert!(!alice[0].is_shared());
    }

    #[tokio::test]
    async fn test_delete_calendar_drops_grants() {
        let (store, id) = store();
        store
            .update_shares(id, &[ShareInvitation::read_only("mailto:bob@example.com")], &[])
            .await
            .unwrap();

        store.delete_calendar(id).await.unwrap();
        assert!(store.get_grants(id).await.unwrap().is_empty());
        assert!(store
            .calendars_for_principal("principals/bob")
            .await
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_duplicate_calendar_uri() {
        let (store, _) = store();
        let err = store
            .create_calendar("principals/alice", "personal", "Again", &["VEVENT"])
            .unwrap_err();
        assert_eq!(err.kind, calshare_core::error::ErrorKind::Conflict);
        assert!(store.create_calendar("principals/alice", "a/b", "x", &[]).is_err());
    }
}
