//! Per-request authentication state and CSRF validation.

use crate::types::DavRequest;

/// Answers who is calling and how they were authenticated.
pub trait AuthContext: Send + Sync {
    /// User id of the caller, if any.
    fn current_user(&self, request: &DavRequest) -> Option<String>;

    /// Whether `principal` was authenticated by the protocol itself on this
    /// request (Basic/Digest), as opposed to a browser session.
    fn is_authenticated(&self, request: &DavRequest, principal: &str) -> bool;
}

/// Validates the anti-forgery token of a request.
pub trait CsrfValidator: Send + Sync {
    /// Whether the request carries a valid token.
    fn check(&self, request: &DavRequest) -> bool;
}
