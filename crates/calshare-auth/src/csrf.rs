//! Anti-forgery tokens for session-authenticated requests.
//!
//! Requests authenticated with protocol credentials (Basic) never need a
//! token. Browser sessions must echo the token issued for their session in
//! the configured request header.

use std::sync::Arc;

use dashmap::DashMap;

use calshare_core::config::AuthConfig;
use calshare_core::traits::CsrfValidator;
use calshare_core::types::{AuthMethod, DavRequest, RequestIdentity};

use crate::session::{SessionStore, generate_token};

/// Issues and validates per-session CSRF tokens.
///
/// Tokens live only as long as their session in `sessions`.
#[derive(Debug, Clone)]
pub struct CsrfTokenManager {
    tokens: Arc<DashMap<String, String>>,
    sessions: Arc<SessionStore>,
    header: String,
}

impl CsrfTokenManager {
    /// Creates a manager reading tokens from the configured header.
    pub fn new(config: &AuthConfig, sessions: Arc<SessionStore>) -> Self {
        Self {
            tokens: Arc::new(DashMap::new()),
            sessions,
            header: config.csrf_header.clone(),
        }
    }

    /// Name of the request header carrying the token.
    pub fn header_name(&self) -> &str {
        &self.header
    }

    /// Returns the token of a session, issuing one on first use.
    pub fn token_for(&self, session_id: &str) -> String {
        self.tokens
            .entry(session_id.to_string())
            .or_insert_with(generate_token)
            .clone()
    }

    /// Forgets the token of a terminated session.
    pub fn revoke(&self, session_id: &str) {
        self.tokens.remove(session_id);
    }

    /// Whether `token` is the one issued for the live session `session_id`.
    pub fn verify(&self, session_id: &str, token: &str) -> bool {
        if !self.sessions.is_live(session_id) {
            self.revoke(session_id);
            return false;
        }
        self.tokens
            .get(session_id)
            .is_some_and(|expected| constant_time_eq(expected.as_bytes(), token.as_bytes()))
    }

    /// Purges expired sessions together with their tokens.
    ///
    /// Returns the number of sessions removed.
    pub fn sweep(&self) -> usize {
        let purged = self.sessions.purge_expired();
        for session_id in &purged {
            self.revoke(session_id);
        }
        purged.len()
    }

    /// Number of tokens currently held.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no token is held.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl CsrfValidator for CsrfTokenManager {
    fn check(&self, request: &DavRequest) -> bool {
        let Some(identity) = request.extensions().get::<RequestIdentity>() else {
            tracing::debug!("CSRF check without identity");
            return false;
        };

        let session_id = match &identity.method {
            AuthMethod::Basic => return true,
            AuthMethod::Session { session_id } => session_id,
        };

        let Some(token) = request
            .headers()
            .get(self.header.as_str())
            .and_then(|v| v.to_str().ok())
        else {
            tracing::debug!(user = %identity.user_id, "CSRF token missing");
            return false;
        };

        self.verify(session_id, token)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn request(identity: Option<RequestIdentity>, token: Option<&str>) -> DavRequest {
        let mut builder = http::Request::builder()
            .method("POST")
            .uri("/calendars/alice/personal");
        if let Some(token) = token {
            builder = builder.header("requesttoken", token);
        }
        let mut req = builder.body(Bytes::new()).unwrap();
        if let Some(identity) = identity {
            req.extensions_mut().insert(identity);
        }
        req
    }

    fn manager_with_ttl(minutes: u64) -> CsrfTokenManager {
        let config = AuthConfig {
            session_ttl_minutes: minutes,
            ..AuthConfig::default()
        };
        let sessions = Arc::new(SessionStore::new(&config).unwrap());
        CsrfTokenManager::new(&config, sessions)
    }

    #[test]
    fn test_basic_auth_needs_no_token() {
        let manager = manager_with_ttl(60);
        assert!(manager.check(&request(Some(RequestIdentity::basic("alice")), None)));
    }

    #[test]
    fn test_session_requires_matching_token() {
        let manager = manager_with_ttl(60);
        let session = manager.sessions.create("alice");
        let token = manager.token_for(&session.id);
        let identity = RequestIdentity::session("alice", session.id.clone());

        assert!(manager.check(&request(Some(identity.clone()), Some(&token))));
        assert!(!manager.check(&request(Some(identity.clone()), Some("forged"))));
        assert!(!manager.check(&request(Some(identity), None)));
    }

    #[test]
    fn test_token_is_stable_per_session() {
        let manager = manager_with_ttl(60);
        let s1 = manager.sessions.create("alice");
        let s2 = manager.sessions.create("alice");
        assert_eq!(manager.token_for(&s1.id), manager.token_for(&s1.id));
        assert_ne!(manager.token_for(&s1.id), manager.token_for(&s2.id));

        let token = manager.token_for(&s1.id);
        manager.revoke(&s1.id);
        assert!(!manager.verify(&s1.id, &token));
    }

    #[test]
    fn test_token_of_ended_session_is_rejected() {
        let manager = manager_with_ttl(60);
        let session = manager.sessions.create("alice");
        let token = manager.token_for(&session.id);

        manager.sessions.remove(&session.id);
        assert!(!manager.verify(&session.id, &token));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_sweep_drops_tokens_of_expired_sessions() {
        let manager = manager_with_ttl(0);
        let ids: Vec<String> = (0..100)
            .map(|_| {
                let session = manager.sessions.create("alice");
                manager.token_for(&session.id);
                session.id
            })
            .collect();
        assert_eq!(manager.len(), 100);

        assert_eq!(manager.sweep(), 100);
        assert!(manager.is_empty());
        assert!(ids.iter().all(|id| !manager.verify(id, "anything")));
    }

    #[test]
    fn test_anonymous_request_fails() {
        let manager = manager_with_ttl(60);
        assert!(!manager.check(&request(None, None)));
    }
}
