//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication, session, and CSRF configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Realm announced in `WWW-Authenticate` challenges.
    #[serde(default = "default_realm")]
    pub realm: String,
    /// Name of the browser session cookie.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// Session lifetime in minutes.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: u64,
    /// Request header carrying the CSRF token for session-authenticated requests.
    #[serde(default = "default_csrf_header")]
    pub csrf_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            realm: default_realm(),
            session_cookie: default_session_cookie(),
            session_ttl_minutes: default_session_ttl(),
            csrf_header: default_csrf_header(),
        }
    }
}

fn default_realm() -> String {
    "calshare".to_string()
}

fn default_session_cookie() -> String {
    "calshare_session".to_string()
}

fn default_session_ttl() -> u64 {
    60
}

fn default_csrf_header() -> String {
    "requesttoken".to_string()
}
