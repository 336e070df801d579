//! The `calendar-search` REPORT document.
//!
//! ```xml
//! <nc:calendar-search xmlns:nc="http://nextcloud.com/ns" xmlns:d="DAV:">
//!   <d:prop><d:getetag/></d:prop>
//!   <nc:filter>
//!     <nc:comp-filter name="VEVENT"/>
//!     <nc:prop-filter name="SUMMARY"/>
//!     <nc:search-term>standup</nc:search-term>
//!   </nc:filter>
//!   <nc:limit>10</nc:limit>
//!   <nc:offset>0</nc:offset>
//! </nc:calendar-search>
//! ```

use calshare_core::types::SearchQuery;

use crate::error::DavError;
use crate::namespace::DavNamespaces;
use crate::xml::{XmlCursor, XmlError};

use super::parser::parse_filter;

/// Parser for complete calendar-search documents.
#[derive(Debug, Clone, Copy)]
pub struct CalendarSearchReport;

impl CalendarSearchReport {
    /// Local name of the report's root element.
    pub const ROOT: &'static str = "calendar-search";

    /// Parse a report body into a [`SearchQuery`].
    pub fn parse(body: &[u8], namespaces: &DavNamespaces) -> Result<SearchQuery, DavError> {
        let document = std::str::from_utf8(body)
            .map_err(|_| DavError::MalformedFilter("Report body is not valid UTF-8".to_string()))?;

        let mut cursor = XmlCursor::new(document);
        let root = cursor.root().map_err(syntax)?;
        if !root.is(&namespaces.search, Self::ROOT) {
            return Err(DavError::MalformedFilter(format!(
                "Expected a {} document, found {}",
                DavNamespaces::clark(&namespaces.search, Self::ROOT),
                root.clark()
            )));
        }

        let mut query = SearchQuery::default();
        if !root.is_empty {
            while let Some(child) = cursor.next_child().map_err(syntax)? {
                if child.is(&namespaces.search, "filter") {
                    if child.is_empty {
                        continue;
                    }
                    while let Some(filter) = cursor.next_child().map_err(syntax)? {
                        if let Some(node) = parse_filter(&mut cursor, &filter, namespaces)? {
                            query.push(node);
                        }
                    }
                } else if let Some(node) = parse_filter(&mut cursor, &child, namespaces)? {
                    query.push(node);
                }
            }
        }
        cursor.finish().map_err(syntax)?;

        if query.comps.is_empty() {
            return Err(DavError::MalformedFilter(format!(
                "At least one {} is required",
                DavNamespaces::clark(&namespaces.search, "comp-filter")
            )));
        }

        if query.search_term.as_deref().is_none_or(str::is_empty) {
            return Err(DavError::MalformedFilter(format!(
                "A {} is required",
                DavNamespaces::clark(&namespaces.search, "search-term")
            )));
        }

        tracing::debug!(
            comps = query.comps.len(),
            props = query.props.len(),
            params = query.params.len(),
            limit = ?query.limit,
            offset = ?query.offset,
            "Parsed calendar-search report"
        );

        Ok(query)
    }
}

fn syntax(error: XmlError) -> DavError {
    DavError::MalformedFilter(format!("Malformed calendar-search document: {error}"))
}
