//! Bridge from axum requests to the DAV plugin chain.

use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};

use calshare_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Fallback route: buffers the body and hands the request to the DAV handler.
pub async fn dav(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match to_bytes(body, state.config.server.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read DAV request body");
            return ApiError::from(AppError::validation(format!(
                "Request body could not be read: {e}"
            )))
            .into_response();
        }
    };

    let method = parts.method.clone();
    let path = parts.uri.path().to_string();
    let request = axum::http::Request::from_parts(parts, bytes);

    let limit = Duration::from_secs(state.config.server.request_timeout_seconds);
    match tokio::time::timeout(limit, state.dav.handle(request)).await {
        Ok(response) => response.map(Body::from),
        Err(_) => {
            tracing::error!(method = %method, path = %path, "DAV request timed out");
            ApiError::from(AppError::service_unavailable("Request timed out")).into_response()
        }
    }
}
