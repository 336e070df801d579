//! ACL discovery: `PROPFIND` (Depth 0) for `{DAV:}acl`.

use std::sync::Arc;

use async_trait::async_trait;
use http::{Response, StatusCode};

use calshare_core::error::AppError;
use calshare_core::traits::{AuthContext, NodeResolver};
use calshare_core::types::DavRequest;

use crate::error::DavError;
use crate::namespace::DavNamespaces;
use crate::plugin::{PluginOutcome, ServerPlugin, request_path};
use crate::properties::build_acl_multistatus;
use crate::xml::{XmlCursor, XmlError};

/// Answers `{DAV:}acl` property requests with the node's resolved ACEs.
pub struct AclDiscoveryPlugin {
    resolver: Arc<dyn NodeResolver>,
    auth: Arc<dyn AuthContext>,
    namespaces: DavNamespaces,
}

impl AclDiscoveryPlugin {
    /// Creates the plugin.
    pub fn new(
        namespaces: DavNamespaces,
        resolver: Arc<dyn NodeResolver>,
        auth: Arc<dyn AuthContext>,
    ) -> Self {
        Self {
            resolver,
            auth,
            namespaces,
        }
    }
}

#[async_trait]
impl ServerPlugin for AclDiscoveryPlugin {
    fn name(&self) -> &'static str {
        "acl-discovery"
    }

    async fn handle(&self, request: DavRequest) -> Result<PluginOutcome, DavError> {
        if request.method().as_str() != "PROPFIND" {
            return Ok(PluginOutcome::Unhandled(request));
        }

        let depth_zero = request
            .headers()
            .get("Depth")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0");
        if !depth_zero || !requests_acl(request.body(), &self.namespaces) {
            return Ok(PluginOutcome::Unhandled(request));
        }

        let Some(user) = self.auth.current_user(&request) else {
            return Ok(PluginOutcome::Unhandled(request));
        };

        let path = request_path(&request);
        let node = match self.resolver.resolve(&path).await {
            Ok(node) => node,
            Err(e) if e.is_not_found() => return Ok(PluginOutcome::Unhandled(request)),
            Err(e) => return Err(DavError::Backend(e)),
        };

        let aces = node.acl(&user).await?;
        tracing::debug!(path = %path, user = %user, aces = aces.len(), "ACL discovery");

        let href = format!("/{path}/");
        let response = Response::builder()
            .status(StatusCode::MULTI_STATUS)
            .header(http::header::CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(build_acl_multistatus(&self.namespaces.dav, &href, &aces))
            .map_err(|e| AppError::internal(format!("Failed to build response: {e}")))?;

        Ok(PluginOutcome::Handled(response))
    }
}

/// Whether a PROPFIND body asks for `{DAV:}acl` inside `<prop>`.
pub fn requests_acl(body: &[u8], namespaces: &DavNamespaces) -> bool {
    let Ok(text) = std::str::from_utf8(body) else {
        return false;
    };
    scan_for_acl(text, &namespaces.dav).unwrap_or(false)
}

fn scan_for_acl(text: &str, dav: &str) -> Result<bool, XmlError> {
    let mut cursor = XmlCursor::new(text);
    let root = cursor.root()?;
    if !root.is(dav, "propfind") || root.is_empty {
        return Ok(false);
    }

    while let Some(child) = cursor.next_child()? {
        if !child.is(dav, "prop") || child.is_empty {
            cursor.skip(&child)?;
            continue;
        }
        while let Some(prop) = cursor.next_child()? {
            if prop.is(dav, "acl") {
                return Ok(true);
            }
            cursor.skip(&prop)?;
        }
    }
    Ok(false)
}
