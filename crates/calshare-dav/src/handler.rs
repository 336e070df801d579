//! DAV request handler: offers each request to the plugin chain in order.

use std::sync::Arc;

use http::{Response, StatusCode};
use tracing::{debug, error, warn};

use calshare_core::types::DavRequest;

use crate::error::DavError;
use crate::plugin::{PluginOutcome, ServerPlugin, request_path};
use crate::properties::build_error_xml;

/// Methods announced in `Allow` for OPTIONS.
const ALLOWED_METHODS: &str = "OPTIONS, POST, PROPFIND, REPORT";

/// Plugin chain with a final fallback.
#[derive(Clone)]
pub struct DavHandler {
    /// Plugins in registration order.
    plugins: Vec<Arc<dyn ServerPlugin>>,
    /// `DAV:` namespace for error bodies.
    dav_ns: String,
}

impl std::fmt::Debug for DavHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("DavHandler")
            .field("plugins", &names)
            .finish()
    }
}

impl DavHandler {
    /// Creates an empty chain.
    pub fn new(dav_ns: impl Into<String>) -> Self {
        Self {
            plugins: Vec::new(),
            dav_ns: dav_ns.into(),
        }
    }

    /// Appends a plugin to the chain.
    pub fn with_plugin(mut self, plugin: Arc<dyn ServerPlugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Handle a DAV request.
    pub async fn handle(&self, request: DavRequest) -> Response<String> {
        let mut request = request;

        for plugin in &self.plugins {
            match plugin.handle(request).await {
                Ok(PluginOutcome::Handled(response)) => {
                    debug!(
                        plugin = plugin.name(),
                        status = response.status().as_u16(),
                        "Request handled by plugin"
                    );
                    return response;
                }
                Ok(PluginOutcome::Unhandled(next)) => request = next,
                Err(e) => return self.error_response(plugin.name(), e),
            }
        }

        self.fallback(&request)
    }

    fn error_response(&self, plugin: &str, error: DavError) -> Response<String> {
        if error.is_client_error() {
            warn!(plugin, error = %error, "DAV request rejected");
        } else {
            error!(plugin, error = %error, "DAV request failed");
        }
        error.into_response(&self.dav_ns)
    }

    /// Answer for requests no plugin claimed.
    fn fallback(&self, request: &DavRequest) -> Response<String> {
        let method = request.method().clone();

        if method == http::Method::OPTIONS {
            return Response::builder()
                .status(StatusCode::OK)
                .header("Allow", ALLOWED_METHODS)
                .header("DAV", "1, 3, access-control, calendar-access")
                .body(String::new())
                .unwrap_or_else(|_| Response::new(String::new()));
        }

        debug!(
            method = %method,
            path = %request_path(request),
            "No plugin claimed the request"
        );

        let status = StatusCode::NOT_IMPLEMENTED;
        Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(build_error_xml(
                &self.dav_ns,
                "not-implemented",
                &format!("{method} is not supported on this resource"),
            ))
            .unwrap_or_else(|_| {
                let mut r = Response::new(String::new());
                *r.status_mut() = status;
                r
            })
    }
}
