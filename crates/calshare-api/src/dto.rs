//! Response DTOs of the JSON endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Returned by `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Authenticated user.
    pub user_id: String,
    /// Principal URI of the user.
    pub principal: String,
    /// Token to send in the CSRF header with session requests.
    pub csrf_token: String,
    /// Session expiry.
    pub expires_at: DateTime<Utc>,
}

/// Returned by `GET /csrftoken`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfTokenResponse {
    /// The session's token.
    pub token: String,
    /// Header the token belongs in.
    pub header: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Registered accounts.
    pub accounts: usize,
}

/// Plain confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}
