//! Calendar objects and the search engine over them.
//!
//! Objects are stored pre-parsed: a component name plus its properties and
//! their parameters. The engine matches the search term as a
//! case-insensitive substring.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use calshare_core::AppResult;
use calshare_core::config::DavConfig;
use calshare_core::error::AppError;
use calshare_core::traits::{CalendarBackend, CalendarQueryEngine};
use calshare_core::types::{CalendarRecord, ResourceId, SearchHit, SearchQuery};

use crate::calendars::MemoryStore;

/// One property of a calendar object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectProperty {
    /// Property name, e.g. `SUMMARY`.
    pub name: String,
    /// Property value.
    pub value: String,
    /// Parameters as `(name, value)` pairs.
    #[serde(default)]
    pub params: Vec<(String, String)>,
}

impl ObjectProperty {
    /// A property without parameters.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            params: Vec::new(),
        }
    }

    /// Adds a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }
}

/// A stored calendar object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarObject {
    /// Object name inside its calendar, e.g. `standup.ics`.
    pub uri: String,
    /// Component name, e.g. `VEVENT`.
    pub component: String,
    /// Properties of the component.
    pub properties: Vec<ObjectProperty>,
    /// Entity tag, assigned on write.
    pub etag: String,
}

/// Object storage and the search engine over a [`MemoryStore`].
pub struct MemoryQueryEngine {
    store: Arc<MemoryStore>,
    objects: DashMap<ResourceId, Vec<CalendarObject>>,
    etag_seq: AtomicU64,
    calendar_root: String,
}

impl std::fmt::Debug for MemoryQueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryQueryEngine")
            .field("calendars_with_objects", &self.objects.len())
            .finish_non_exhaustive()
    }
}

impl MemoryQueryEngine {
    /// Creates an engine over `store`.
    pub fn new(config: &DavConfig, store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            objects: DashMap::new(),
            etag_seq: AtomicU64::new(1),
            calendar_root: config.calendar_root.trim_matches('/').to_string(),
        }
    }

    /// Stores or replaces an object and returns its new etag.
    pub fn put_object(
        &self,
        calendar: ResourceId,
        uri: &str,
        component: &str,
        properties: Vec<ObjectProperty>,
    ) -> AppResult<String> {
        if self.store.calendar(calendar).is_none() {
            return Err(AppError::not_found(format!("Calendar {calendar} not found")));
        }

        let etag = format!("\"{}\"", self.etag_seq.fetch_add(1, Ordering::SeqCst));
        let object = CalendarObject {
            uri: uri.to_string(),
            component: component.to_uppercase(),
            properties,
            etag: etag.clone(),
        };

        let mut entry = self.objects.entry(calendar).or_default();
        match entry.iter_mut().find(|o| o.uri == uri) {
            Some(existing) => *existing = object,
            None => entry.push(object),
        }

        debug!(resource_id = %calendar, uri = %uri, etag = %etag, "Stored calendar object");
        Ok(etag)
    }

    /// Number of objects in a calendar.
    pub fn object_count(&self, calendar: ResourceId) -> usize {
        self.objects.get(&calendar).map(|o| o.len()).unwrap_or(0)
    }

    fn href(&self, record: &CalendarRecord, object: &CalendarObject) -> String {
        let user = record
            .principal_uri
            .rsplit('/')
            .next()
            .unwrap_or(&record.principal_uri);
        format!(
            "/{}/{}/{}/{}",
            self.calendar_root, user, record.uri, object.uri
        )
    }
}

/// Whether `object` satisfies the non-paging parts of `query`.
fn matches(object: &CalendarObject, query: &SearchQuery, term: &str) -> bool {
    if !query.comps.is_empty()
        && !query
            .comps
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&object.component))
    {
        return false;
    }

    let contains = |text: &str| text.to_lowercase().contains(term);
    let unrestricted = query.props.is_empty() && query.params.is_empty();

    object.properties.iter().any(|prop| {
        let in_prop = (unrestricted
            || query.props.iter().any(|p| p.eq_ignore_ascii_case(&prop.name)))
            && contains(&prop.value);

        let in_param = query
            .params
            .iter()
            .filter(|p| p.property.eq_ignore_ascii_case(&prop.name))
            .any(|p| {
                prop.params
                    .iter()
                    .any(|(name, value)| name.eq_ignore_ascii_case(&p.parameter) && contains(value))
            });

        in_prop || in_param
    })
}

#[async_trait]
impl CalendarQueryEngine for MemoryQueryEngine {
    async fn search(&self, principal_uri: &str, query: &SearchQuery) -> AppResult<Vec<SearchHit>> {
        let term = query
            .search_term
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();
        let records = self.store.calendars_for_principal(principal_uri).await?;

        let mut hits = Vec::new();
        for record in &records {
            let Some(objects) = self.objects.get(&record.id) else {
                continue;
            };
            for object in objects.iter().filter(|o| matches(o, query, &term)) {
                hits.push(SearchHit {
                    href: self.href(record, object),
                    etag: object.etag.clone(),
                });
            }
        }

        let total = hits.len();
        let offset = usize::try_from(query.offset.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = query
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);
        let page: Vec<SearchHit> = hits.into_iter().skip(offset).take(limit).collect();

        debug!(
            principal = %principal_uri,
            calendars = records.len(),
            matched = total,
            returned = page.len(),
            "Executed calendar search"
        );
        Ok(page)
    }
}
