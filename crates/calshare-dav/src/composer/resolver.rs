//! Path resolution over the composed calendar tree.

use std::sync::Arc;

use async_trait::async_trait;

use calshare_core::AppResult;
use calshare_core::config::DavConfig;
use calshare_core::error::AppError;
use calshare_core::traits::{DavNode, NodeResolver, PrincipalBackend};

use super::CollectionComposer;

/// Resolves `calendars`, `calendars/{user}` and `calendars/{user}/{uri}`.
pub struct CalendarTreeResolver {
    composer: CollectionComposer,
    principals: Arc<dyn PrincipalBackend>,
    config: DavConfig,
}

impl CalendarTreeResolver {
    /// Creates a resolver; homes exist only for known principals.
    pub fn new(
        config: &DavConfig,
        composer: CollectionComposer,
        principals: Arc<dyn PrincipalBackend>,
    ) -> Self {
        Self {
            composer,
            principals,
            config: config.clone(),
        }
    }

    async fn principal_exists(&self, user_id: &str) -> AppResult<bool> {
        let href = format!("principal:{}", self.config.principal_for(user_id));
        Ok(self.principals.find_by_uri(&href).await?.is_some())
    }
}

#[async_trait]
impl NodeResolver for CalendarTreeResolver {
    async fn resolve(&self, path: &str) -> AppResult<Arc<dyn DavNode>> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let not_found = || AppError::not_found(format!("No node at '{path}'"));

        match segments.as_slice() {
            [root] if *root == self.composer.calendar_root() => {
                Ok(self.composer.root() as Arc<dyn DavNode>)
            }
            [root, user, rest @ ..] if *root == self.composer.calendar_root() => {
                if !self.principal_exists(user).await? {
                    return Err(not_found());
                }
                let home = self.composer.home(user);
                match rest {
                    [] => Ok(home as Arc<dyn DavNode>),
                    [name] => home
                        .children()
                        .await?
                        .into_iter()
                        .find(|child| child.name() == *name)
                        .ok_or_else(not_found),
                    _ => Err(not_found()),
                }
            }
            _ => Err(not_found()),
        }
    }
}
