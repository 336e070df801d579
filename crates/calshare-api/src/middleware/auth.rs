//! Authentication middleware for DAV routes.
//!
//! Accepts HTTP Basic credentials or the session cookie issued by
//! `POST /login` and records the outcome as a [`RequestIdentity`] request
//! extension. Requests with neither are challenged with `401`.

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Basic;
use axum_extra::headers::{Authorization, Cookie, HeaderMapExt};
use tracing::debug;

use calshare_core::AppResult;
use calshare_core::error::AppError;
use calshare_core::types::RequestIdentity;

use crate::error::ApiError;
use crate::state::AppState;

/// Verifies a user id and password against the directory.
pub fn verify_credentials(state: &AppState, user_id: &str, password: &str) -> AppResult<()> {
    let account = state
        .backend
        .directory
        .get(user_id)
        .ok_or_else(|| AppError::authentication("Invalid credentials"))?;

    if !state
        .password_hasher
        .verify_password(password, &account.password_hash)?
    {
        return Err(AppError::authentication("Invalid credentials"));
    }
    Ok(())
}

/// Session id carried by the configured cookie, if any.
pub fn session_cookie(state: &AppState, headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(&state.config.auth.session_cookie).map(String::from))
}

/// Establishes the caller's identity.
///
/// Basic credentials are checked first and must be valid when present. A
/// session cookie is only consulted without an `Authorization` header.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let realm = state.config.auth.realm.clone();

    let identity = if let Some(Authorization(basic)) =
        request.headers().typed_get::<Authorization<Basic>>()
    {
        match verify_credentials(&state, basic.username(), basic.password()) {
            Ok(()) => Some(RequestIdentity::basic(basic.username())),
            Err(e) => {
                debug!(user = %basic.username(), error = %e, "Basic authentication failed");
                return ApiError::from(e).with_challenge(&realm).into_response();
            }
        }
    } else {
        session_cookie(&state, request.headers()).and_then(|session_id| {
            state
                .sessions
                .get(&session_id)
                .map(|session| RequestIdentity::session(session.user_id, session.id))
        })
    };

    let Some(identity) = identity else {
        return ApiError::from(AppError::authentication("Authentication required"))
            .with_challenge(&realm)
            .into_response();
    };

    debug!(user = %identity.user_id, method = ?identity.method, "Request authenticated");
    request.extensions_mut().insert(identity);
    next.run(request).await
}
