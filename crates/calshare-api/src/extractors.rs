//! `SessionUser` extractor: resolves the session cookie to a live session.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use calshare_auth::SessionRecord;
use calshare_core::error::AppError;

use crate::error::ApiError;
use crate::middleware::auth::session_cookie;
use crate::state::AppState;

/// The caller's browser session.
#[derive(Debug, Clone)]
pub struct SessionUser(pub SessionRecord);

impl std::ops::Deref for SessionUser {
    type Target = SessionRecord;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session_id = session_cookie(state, &parts.headers)
            .ok_or_else(|| AppError::authentication("Missing session cookie"))?;

        let session = state
            .sessions
            .get(&session_id)
            .ok_or_else(|| AppError::authentication("Session expired or unknown"))?;

        Ok(SessionUser(session))
    }
}
