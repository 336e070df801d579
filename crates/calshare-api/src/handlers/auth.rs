//! Auth handlers: login, CSRF token, logout.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Basic;
use axum_extra::headers::{Authorization, HeaderMapExt};

use calshare_core::error::AppError;

use crate::dto::{ApiResponse, CsrfTokenResponse, LoginResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::SessionUser;
use crate::middleware::auth::verify_credentials;
use crate::state::AppState;

/// POST /login
///
/// Exchanges Basic credentials for a session cookie and its CSRF token.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let realm = state.config.auth.realm.clone();

    let Some(Authorization(basic)) = headers.typed_get::<Authorization<Basic>>() else {
        return Err(ApiError::from(AppError::authentication("Credentials required"))
            .with_challenge(&realm));
    };

    verify_credentials(&state, basic.username(), basic.password())
        .map_err(|e| ApiError::from(e).with_challenge(&realm))?;

    let session = state.sessions.create(basic.username());
    let csrf_token = state.csrf.token_for(&session.id);

    let max_age = (session.expires_at - session.created_at).num_seconds().max(0);
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        state.config.auth.session_cookie, session.id, max_age
    );
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::internal(format!("Invalid session cookie: {e}")))?;

    tracing::info!(user = %session.user_id, "User logged in");

    let body = ApiResponse::ok(LoginResponse {
        principal: state.config.dav.principal_for(&session.user_id),
        user_id: session.user_id,
        csrf_token,
        expires_at: session.expires_at,
    });

    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// GET /csrftoken
pub async fn csrf_token(
    State(state): State<AppState>,
    session: SessionUser,
) -> Json<ApiResponse<CsrfTokenResponse>> {
    Json(ApiResponse::ok(CsrfTokenResponse {
        token: state.csrf.token_for(&session.id),
        header: state.csrf.header_name().to_string(),
    }))
}

/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    session: SessionUser,
) -> Json<ApiResponse<MessageResponse>> {
    state.sessions.remove(&session.id);
    state.csrf.revoke(&session.id);

    tracing::info!(user = %session.user_id, "User logged out");

    Json(ApiResponse::ok(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}
