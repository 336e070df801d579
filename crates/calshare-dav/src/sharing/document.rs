//! Share document parsing.
//!
//! ```xml
//! <o:share xmlns:o="http://owncloud.org/ns" xmlns:d="DAV:">
//!   <o:set>
//!     <d:href>mailto:bob@example.com</d:href>
//!     <o:common-name>Bob</o:common-name>
//!     <o:summary>Team calendar</o:summary>
//!     <o:read/>
//!   </o:set>
//!   <o:remove>
//!     <d:href>mailto:eve@example.com</d:href>
//!   </o:remove>
//! </o:share>
//! ```

use calshare_core::types::{ShareInvitation, ShareMutation};

use crate::error::DavError;
use crate::namespace::DavNamespaces;
use crate::xml::{XmlCursor, XmlElement, XmlError};

/// Converts share documents into [`ShareMutation`]s.
#[derive(Debug, Clone)]
pub struct ShareMutationParser {
    namespaces: DavNamespaces,
}

impl ShareMutationParser {
    /// Creates a parser for the given namespace table.
    pub fn new(namespaces: DavNamespaces) -> Self {
        Self { namespaces }
    }

    /// Parse a complete share document.
    pub fn parse(&self, body: &[u8]) -> Result<ShareMutation, DavError> {
        let document = std::str::from_utf8(body).map_err(|_| {
            DavError::MalformedShareDocument("body is not valid UTF-8".to_string())
        })?;

        let mut cursor = XmlCursor::new(document);
        let root = cursor.root().map_err(malformed)?;
        if !root.is(&self.namespaces.sharing, "share") {
            return Err(DavError::MalformedShareDocument(format!(
                "expected {}, found {}",
                DavNamespaces::clark(&self.namespaces.sharing, "share"),
                root.clark()
            )));
        }

        let mut mutation = ShareMutation::default();
        if !root.is_empty {
            while let Some(child) = cursor.next_child().map_err(malformed)? {
                if child.is(&self.namespaces.sharing, "set") {
                    mutation.additions.push(self.parse_set(&mut cursor, &child)?);
                } else if child.is(&self.namespaces.sharing, "remove") {
                    mutation.removals.push(self.parse_remove(&mut cursor, &child)?);
                } else {
                    cursor.skip(&child).map_err(malformed)?;
                }
            }
        }
        cursor.finish().map_err(malformed)?;

        Ok(mutation)
    }

    fn parse_set(
        &self,
        cursor: &mut XmlCursor<'_>,
        element: &XmlElement,
    ) -> Result<ShareInvitation, DavError> {
        let mut invitation = ShareInvitation::read_write(String::new());
        if element.is_empty {
            return Ok(invitation);
        }

        while let Some(child) = cursor.next_child().map_err(malformed)? {
            if self.is_href(&child) {
                invitation.href = cursor.read_text(&child).map_err(malformed)?;
            } else if child.is(&self.namespaces.sharing, "common-name") {
                invitation.common_name = non_empty(cursor.read_text(&child).map_err(malformed)?);
            } else if child.is(&self.namespaces.sharing, "summary") {
                invitation.summary = non_empty(cursor.read_text(&child).map_err(malformed)?);
            } else if child.is(&self.namespaces.sharing, "read") {
                invitation.read_only = true;
                cursor.skip(&child).map_err(malformed)?;
            } else {
                // read-write and unknown extensions
                cursor.skip(&child).map_err(malformed)?;
            }
        }

        Ok(invitation)
    }

    fn parse_remove(
        &self,
        cursor: &mut XmlCursor<'_>,
        element: &XmlElement,
    ) -> Result<String, DavError> {
        let mut href = String::new();
        if element.is_empty {
            return Ok(href);
        }

        while let Some(child) = cursor.next_child().map_err(malformed)? {
            if self.is_href(&child) {
                href = cursor.read_text(&child).map_err(malformed)?;
            } else {
                cursor.skip(&child).map_err(malformed)?;
            }
        }

        Ok(href)
    }

    fn is_href(&self, element: &XmlElement) -> bool {
        element.is(&self.namespaces.dav, "href") || element.is(&self.namespaces.sharing, "href")
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

fn malformed(error: XmlError) -> DavError {
    DavError::MalformedShareDocument(error.to_string())
}
