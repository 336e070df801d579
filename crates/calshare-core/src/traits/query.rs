//! Calendar object query engine.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{SearchHit, SearchQuery};

/// Executes calendar searches over the object store.
#[async_trait]
pub trait CalendarQueryEngine: Send + Sync {
    /// Objects visible to `principal_uri` matching `query`.
    async fn search(&self, principal_uri: &str, query: &SearchQuery) -> AppResult<Vec<SearchHit>>;
}
