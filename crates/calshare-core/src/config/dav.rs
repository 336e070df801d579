//! DAV protocol configuration: XML namespaces, principal layout, and the
//! sharing plugin's response marker.

use serde::{Deserialize, Serialize};

/// XML namespaces recognised by the sharing and search parsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// Core WebDAV namespace.
    #[serde(default = "default_dav_ns")]
    pub dav: String,
    /// Namespace of the `share` document and its `set` / `remove` children.
    #[serde(default = "default_sharing_ns")]
    pub sharing: String,
    /// Namespace of the `calendar-search` report and its filter elements.
    #[serde(default = "default_search_ns")]
    pub search: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            dav: default_dav_ns(),
            sharing: default_sharing_ns(),
            search: default_search_ns(),
        }
    }
}

/// DAV layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DavConfig {
    /// Namespace table.
    #[serde(default)]
    pub namespaces: NamespaceConfig,
    /// Prefix of user principal URIs (`{prefix}/{user}`).
    #[serde(default = "default_principal_prefix")]
    pub principal_prefix: String,
    /// Name of the root calendar collection.
    #[serde(default = "default_calendar_root")]
    pub calendar_root: String,
    /// Child name of the synthetic scheduling outbox under each calendar home.
    #[serde(default = "default_outbox_suffix")]
    pub outbox_suffix: String,
    /// Suffix of the read delegate principal.
    #[serde(default = "default_proxy_read")]
    pub proxy_read_suffix: String,
    /// Suffix of the read-write delegate principal.
    #[serde(default = "default_proxy_write")]
    pub proxy_write_suffix: String,
    /// Header set on responses fully handled by the sharing plugin.
    #[serde(default = "default_marker_header")]
    pub sharing_marker_header: String,
    /// Whether the ACL subsystem is mounted. When disabled every caller may
    /// mutate shares.
    #[serde(default = "default_true")]
    pub acl_enabled: bool,
}

impl Default for DavConfig {
    fn default() -> Self {
        Self {
            namespaces: NamespaceConfig::default(),
            principal_prefix: default_principal_prefix(),
            calendar_root: default_calendar_root(),
            outbox_suffix: default_outbox_suffix(),
            proxy_read_suffix: default_proxy_read(),
            proxy_write_suffix: default_proxy_write(),
            sharing_marker_header: default_marker_header(),
            acl_enabled: true,
        }
    }
}

impl DavConfig {
    /// Principal URI of a user id.
    pub fn principal_for(&self, user_id: &str) -> String {
        format!("{}/{}", self.principal_prefix.trim_end_matches('/'), user_id)
    }
}

fn default_dav_ns() -> String {
    "DAV:".to_string()
}

fn default_sharing_ns() -> String {
    "http://owncloud.org/ns".to_string()
}

fn default_search_ns() -> String {
    "http://nextcloud.com/ns".to_string()
}

fn default_principal_prefix() -> String {
    "principals".to_string()
}

fn default_calendar_root() -> String {
    "calendars".to_string()
}

fn default_outbox_suffix() -> String {
    "outbox".to_string()
}

fn default_proxy_read() -> String {
    "calendar-proxy-read".to_string()
}

fn default_proxy_write() -> String {
    "calendar-proxy-write".to_string()
}

fn default_marker_header() -> String {
    "X-Dav-Sharing".to_string()
}

fn default_true() -> bool {
    true
}
