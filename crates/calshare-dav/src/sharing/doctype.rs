//! Document-type sniffing from the root element.

use std::fmt;

use crate::namespace::DavNamespaces;
use crate::xml::XmlCursor;

/// Request body kinds the plugins recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    /// `{sharing-ns}share`
    Share,
    /// `{search-ns}calendar-search`
    CalendarSearch,
    /// Anything else, including unparseable bodies.
    Unknown,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Share => write!(f, "share"),
            Self::CalendarSearch => write!(f, "calendar-search"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classify a body by its root element's namespace and local name.
///
/// Only the root start tag is read; the rest of the body is not validated.
pub fn sniff_document(body: &[u8], namespaces: &DavNamespaces) -> DocumentType {
    let Ok(text) = std::str::from_utf8(body) else {
        return DocumentType::Unknown;
    };

    let Ok(root) = XmlCursor::new(text).root() else {
        return DocumentType::Unknown;
    };

    if root.is(&namespaces.sharing, "share") {
        DocumentType::Share
    } else if root.is(&namespaces.search, "calendar-search") {
        DocumentType::CalendarSearch
    } else {
        DocumentType::Unknown
    }
}
