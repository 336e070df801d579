//! Principal directory lookups.

use async_trait::async_trait;

use crate::result::AppResult;

/// Maps sharee hrefs to principal URIs.
#[async_trait]
pub trait PrincipalBackend: Send + Sync {
    /// Resolve a `mailto:` or `principal:` href. Unknown hrefs yield `None`.
    async fn find_by_uri(&self, uri: &str) -> AppResult<Option<String>>;
}
