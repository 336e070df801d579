//! Privilege checks over resolved ACEs.

use std::sync::Arc;

use calshare_core::error::AppError;
use calshare_core::traits::ShareStorage;
use calshare_core::types::{Ace, Privilege, ResourceId};

use super::resolver::AclResolver;

/// Checks whether a user holds a privilege on a shared collection.
#[derive(Clone)]
pub struct AclChecker {
    /// ACE resolver.
    resolver: AclResolver,
    /// Grant storage.
    storage: Arc<dyn ShareStorage>,
}

impl std::fmt::Debug for AclChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AclChecker")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl AclChecker {
    /// Creates a new ACL checker.
    pub fn new(resolver: AclResolver, storage: Arc<dyn ShareStorage>) -> Self {
        Self { resolver, storage }
    }

    /// The underlying resolver.
    pub fn resolver(&self) -> &AclResolver {
        &self.resolver
    }

    /// Checks whether `user_id` holds `privilege` on the collection
    /// `resource_id` owned by `owner_principal`.
    pub async fn check_privilege(
        &self,
        resource_id: ResourceId,
        owner_principal: &str,
        user_id: &str,
        privilege: Privilege,
    ) -> Result<bool, AppError> {
        let aces = self
            .resolver
            .resolve_for_resource(self.storage.as_ref(), resource_id, owner_principal, user_id)
            .await?;

        let principal = self.resolver.principal_for(user_id);
        let granted = has_privilege(&aces, &principal, privilege);

        tracing::debug!(
            resource_id = %resource_id,
            user = %user_id,
            privilege = %privilege,
            granted,
            "ACL privilege check"
        );

        Ok(granted)
    }
}

/// Whether `aces` grant `privilege` to `principal`.
///
/// Write implies read, matching the DAV privilege aggregation.
pub fn has_privilege(aces: &[Ace], principal: &str, privilege: Privilege) -> bool {
    let principal = principal.trim_end_matches('/');
    aces.iter().any(|ace| {
        ace.principal.trim_end_matches('/') == principal
            && (ace.privilege == privilege || ace.privilege == Privilege::Write)
    })
}
