//! Effective ACL resolution for shared collections.
//!
//! Resolution order:
//! 1. Owner check: the owner always holds protected read + write.
//! 2. Share grant: the requesting principal's grant adds read and/or write.
//! 3. Delegates: every read principal is mirrored onto its proxy-read and
//!    proxy-write delegates, every write principal onto its proxy-write
//!    delegate.

use calshare_core::config::DavConfig;
use calshare_core::error::AppError;
use calshare_core::traits::ShareStorage;
use calshare_core::types::{Ace, Privilege, ResourceId, ShareGrant, SharePermissions};

/// Computes the ACE set of a collection for one requesting user.
///
/// Pure: no I/O, no shared state. Output order is deterministic (reads
/// before writes, base principal before its delegates).
#[derive(Debug, Clone)]
pub struct AclResolver {
    /// Prefix of user principal URIs.
    principal_prefix: String,
    /// Read delegate suffix.
    proxy_read_suffix: String,
    /// Read-write delegate suffix.
    proxy_write_suffix: String,
}

impl AclResolver {
    /// Creates a resolver from the DAV configuration.
    pub fn new(config: &DavConfig) -> Self {
        Self {
            principal_prefix: config.principal_prefix.trim_end_matches('/').to_string(),
            proxy_read_suffix: config.proxy_read_suffix.clone(),
            proxy_write_suffix: config.proxy_write_suffix.clone(),
        }
    }

    /// Principal URI of a user id.
    pub fn principal_for(&self, user_id: &str) -> String {
        format!("{}/{}", self.principal_prefix, user_id)
    }

    /// Resolves the ACEs `requesting_user` sees on a collection owned by
    /// `owner_principal` with the given share grants.
    pub fn resolve(
        &self,
        owner_principal: &str,
        requesting_user: &str,
        grants: &[ShareGrant],
    ) -> Vec<Ace> {
        let principal = self.principal_for(requesting_user);

        if same_principal(&principal, owner_principal) {
            return self.expand(owner_principal, true, true, true);
        }

        match grants
            .iter()
            .find(|grant| same_principal(&grant.principal, &principal))
        {
            Some(grant) => self.expand(
                &principal,
                grant.permissions.contains(SharePermissions::READ),
                grant.permissions.contains(SharePermissions::UPDATE),
                false,
            ),
            None => Vec::new(),
        }
    }

    /// Fetches the grants of `resource_id` and resolves against them.
    ///
    /// The resource id is an explicit input; it is never derived from the
    /// node's owner.
    pub async fn resolve_for_resource<S>(
        &self,
        storage: &S,
        resource_id: ResourceId,
        owner_principal: &str,
        requesting_user: &str,
    ) -> Result<Vec<Ace>, AppError>
    where
        S: ShareStorage + ?Sized,
    {
        let grants = storage.get_grants(resource_id).await?;
        let aces = self.resolve(owner_principal, requesting_user, &grants);

        tracing::trace!(
            resource_id = %resource_id,
            user = %requesting_user,
            grants = grants.len(),
            aces = aces.len(),
            "Resolved ACL"
        );

        Ok(aces)
    }

    fn expand(&self, principal: &str, read: bool, write: bool, protected: bool) -> Vec<Ace> {
        let proxy_write = format!("{principal}/{}", self.proxy_write_suffix);
        let proxy_read = format!("{principal}/{}", self.proxy_read_suffix);
        let mut aces = Vec::with_capacity(5);

        if read {
            aces.push(Ace::new(Privilege::Read, principal, protected));
            aces.push(Ace::new(Privilege::Read, proxy_write.clone(), protected));
            aces.push(Ace::new(Privilege::Read, proxy_read, protected));
        }

        if write {
            aces.push(Ace::new(Privilege::Write, principal, protected));
            aces.push(Ace::new(Privilege::Write, proxy_write, protected));
        }

        aces
    }
}

fn same_principal(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}
