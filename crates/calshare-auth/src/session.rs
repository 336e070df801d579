//! In-memory browser session store.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use calshare_core::AppResult;
use calshare_core::config::AuthConfig;
use calshare_core::error::AppError;

/// One browser session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Opaque session id stored in the cookie.
    pub id: String,
    /// User the session belongs to.
    pub user_id: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Whether the session has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Session storage keyed by session id.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, SessionRecord>>,
    ttl: Duration,
}

impl SessionStore {
    /// Creates a store with the configured lifetime.
    ///
    /// Fails when `session_ttl_minutes` does not fit a [`Duration`].
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let ttl = i64::try_from(config.session_ttl_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "auth.session_ttl_minutes out of range: {}",
                    config.session_ttl_minutes
                ))
            })?;

        Ok(Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        })
    }

    /// How often expired sessions should be swept: the TTL, at least one minute.
    pub fn sweep_interval(&self) -> std::time::Duration {
        let minute = std::time::Duration::from_secs(60);
        self.ttl.to_std().map_or(minute, |ttl| ttl.max(minute))
    }

    /// Opens a new session for `user_id`.
    pub fn create(&self, user_id: &str) -> SessionRecord {
        let now = Utc::now();
        let record = SessionRecord {
            id: generate_token(),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        self.sessions.insert(record.id.clone(), record.clone());
        tracing::debug!(user = %user_id, "Session created");
        record
    }

    /// Looks up a live session. Expired sessions are evicted on access.
    pub fn get(&self, session_id: &str) -> Option<SessionRecord> {
        let record = self.sessions.get(session_id)?.clone();
        if record.is_expired_at(Utc::now()) {
            self.sessions.remove(session_id);
            tracing::debug!(user = %record.user_id, "Session expired");
            return None;
        }
        Some(record)
    }

    /// Terminates a session.
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Whether `session_id` names a live session.
    pub fn is_live(&self, session_id: &str) -> bool {
        self.get(session_id).is_some()
    }

    /// Drops every expired session and returns the ids that were removed.
    pub fn purge_expired(&self) -> Vec<String> {
        let now = Utc::now();
        let mut purged = Vec::new();
        self.sessions.retain(|id, record| {
            let expired = record.is_expired_at(now);
            if expired {
                purged.push(id.clone());
            }
            !expired
        });
        purged
    }
}

/// 32 random bytes, URL-safe base64 without padding.
pub(crate) fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}
