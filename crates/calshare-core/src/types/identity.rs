//! Per-request identity established by the transport layer.

use bytes::Bytes;

/// A fully buffered DAV request as seen by the protocol plugins.
pub type DavRequest = http::Request<Bytes>;

/// How the transport layer authenticated the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// HTTP Basic credentials validated on this very request.
    Basic,
    /// A browser session cookie; requests need a CSRF token.
    Session {
        /// The session id the cookie refers to.
        session_id: String,
    },
}

/// Identity attached to a request's extensions by the authentication
/// middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    /// Authenticated user id.
    pub user_id: String,
    /// How the user was authenticated.
    pub method: AuthMethod,
}

impl RequestIdentity {
    /// Identity established with Basic credentials.
    pub fn basic(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            method: AuthMethod::Basic,
        }
    }

    /// Identity established with a session cookie.
    pub fn session(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            method: AuthMethod::Session {
                session_id: session_id.into(),
            },
        }
    }

    /// Session id, when the request was session-authenticated.
    pub fn session_id(&self) -> Option<&str> {
        match &self.method {
            AuthMethod::Session { session_id } => Some(session_id),
            AuthMethod::Basic => None,
        }
    }
}
