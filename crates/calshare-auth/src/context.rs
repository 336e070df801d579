//! Auth context backed by the identity the transport middleware attaches to
//! each request.

use calshare_core::config::DavConfig;
use calshare_core::traits::AuthContext;
use calshare_core::types::{AuthMethod, DavRequest, RequestIdentity};

/// Reads [`RequestIdentity`] from request extensions.
#[derive(Debug, Clone)]
pub struct ExtensionAuthContext {
    principal_prefix: String,
}

impl ExtensionAuthContext {
    /// Creates a context using the configured principal layout.
    pub fn new(config: &DavConfig) -> Self {
        Self {
            principal_prefix: config.principal_prefix.trim_end_matches('/').to_string(),
        }
    }

    fn identity(request: &DavRequest) -> Option<&RequestIdentity> {
        request.extensions().get::<RequestIdentity>()
    }
}

impl AuthContext for ExtensionAuthContext {
    fn current_user(&self, request: &DavRequest) -> Option<String> {
        Self::identity(request).map(|identity| identity.user_id.clone())
    }

    fn is_authenticated(&self, request: &DavRequest, principal: &str) -> bool {
        let Some(identity) = Self::identity(request) else {
            return false;
        };
        matches!(identity.method, AuthMethod::Basic)
            && format!("{}/{}", self.principal_prefix, identity.user_id)
                == principal.trim_end_matches('/')
    }
}
