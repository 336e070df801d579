//! Protocol error taxonomy of the DAV layer.

use http::{Response, StatusCode};

use calshare_core::error::{AppError, ErrorKind};
use calshare_core::types::Privilege;

use crate::properties::build_error_xml;

/// Errors a DAV plugin may end a request with.
#[derive(Debug, thiserror::Error)]
pub enum DavError {
    /// Bad or missing attribute, or wrong value shape, in a filter element.
    #[error("{0}")]
    MalformedFilter(String),

    /// Share document that is not well-formed or has the wrong root.
    #[error("Malformed share document: {0}")]
    MalformedShareDocument(String),

    /// Session-authenticated request without a valid anti-forgery token.
    #[error("CSRF check failed")]
    CsrfCheckFailed,

    /// Caller lacks a privilege on the target.
    #[error("Missing {privilege} privilege on '{path}'")]
    NeedPrivileges {
        /// Request path.
        path: String,
        /// The privilege that was required.
        privilege: Privilege,
    },

    /// Collaborator failure.
    #[error(transparent)]
    Backend(#[from] AppError),
}

impl DavError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedFilter(_) | Self::MalformedShareDocument(_) | Self::CsrfCheckFailed => {
                StatusCode::BAD_REQUEST
            }
            Self::NeedPrivileges { .. } => StatusCode::FORBIDDEN,
            Self::Backend(e) => match e.kind {
                ErrorKind::Authorization => StatusCode::FORBIDDEN,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Whether the error is the client's fault.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    /// Local name of the `DAV:` error element describing this error.
    fn condition(&self) -> &'static str {
        match self {
            Self::MalformedFilter(_) => "valid-filter",
            Self::MalformedShareDocument(_) => "valid-share-document",
            Self::CsrfCheckFailed => "forbidden",
            Self::NeedPrivileges { .. } => "need-privileges",
            Self::Backend(_) => "internal-error",
        }
    }

    /// Render a `{DAV:}error` body.
    pub fn to_xml(&self, dav_ns: &str) -> String {
        let description = match self {
            Self::Backend(_) if !self.is_client_error() => "Internal server error".to_string(),
            other => other.to_string(),
        };
        build_error_xml(dav_ns, self.condition(), &description)
    }

    /// Convert into an XML error response.
    pub fn into_response(self, dav_ns: &str) -> Response<String> {
        let status = self.status();
        let body = self.to_xml(dav_ns);

        Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(body)
            .unwrap_or_else(|_| {
                let mut r = Response::new(String::new());
                *r.status_mut() = status;
                r
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            DavError::MalformedFilter("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(DavError::CsrfCheckFailed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            DavError::NeedPrivileges {
                path: "calendars/a/b".into(),
                privilege: Privilege::Write
            }
            .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            DavError::Backend(AppError::storage("down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            DavError::Backend(AppError::authorization("no")).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_error_body_hides_backend_detail() {
        let xml = DavError::Backend(AppError::storage("secret dsn")).to_xml("DAV:");
        assert!(xml.contains("internal-error"));
        assert!(!xml.contains("secret dsn"));
    }

    #[test]
    fn test_forbidden_body_for_csrf() {
        let response = DavError::CsrfCheckFailed.into_response("DAV:");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.body().contains("<D:forbidden/>"));
    }
}
