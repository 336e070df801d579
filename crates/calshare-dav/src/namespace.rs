//! Namespace table handed to the XML parsers.

use calshare_core::config::NamespaceConfig;

/// The XML namespaces the parsers match element names against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavNamespaces {
    /// Core WebDAV namespace (`DAV:`).
    pub dav: String,
    /// Namespace of share documents.
    pub sharing: String,
    /// Namespace of calendar-search reports.
    pub search: String,
}

impl DavNamespaces {
    /// Clark notation of a name: `{namespace}local`.
    pub fn clark(namespace: &str, local: &str) -> String {
        format!("{{{namespace}}}{local}")
    }
}

impl From<&NamespaceConfig> for DavNamespaces {
    fn from(config: &NamespaceConfig) -> Self {
        Self {
            dav: config.dav.clone(),
            sharing: config.sharing.clone(),
            search: config.search.clone(),
        }
    }
}

impl Default for DavNamespaces {
    fn default() -> Self {
        Self::from(&NamespaceConfig::default())
    }
}
