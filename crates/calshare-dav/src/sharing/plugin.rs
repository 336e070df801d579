//! POST interception for share documents.
//!
//! A request moves through these gates in order; failing a gate before the
//! mutation either hands the request back ([`PluginOutcome::Unhandled`]) or
//! ends it with a client error:
//!
//! 1. `POST` with an XML content type
//! 2. path resolves to a node
//! 3. body is a share document (sniffed, then re-injected)
//! 4. CSRF token, unless protocol-authenticated
//! 5. node is shareable and the caller holds write
//! 6. mutation parsed and applied with a single `update_shares` call

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use http::{HeaderName, HeaderValue, Method, Response, StatusCode};
use tracing::{debug, info, warn};

use calshare_auth::AclChecker;
use calshare_core::config::DavConfig;
use calshare_core::error::AppError;
use calshare_core::traits::{AuthContext, CsrfValidator, NodeResolver};
use calshare_core::types::{DavRequest, Privilege};

use crate::error::DavError;
use crate::namespace::DavNamespaces;
use crate::plugin::{PluginOutcome, ServerPlugin, has_xml_content_type, request_path};

use super::doctype::{DocumentType, sniff_document};
use super::document::ShareMutationParser;

/// Value of the marker header on handled responses.
pub const SHARING_MARKER_VALUE: &str = "applied";

/// Progress of one request through the sharing gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharingState {
    /// Nothing checked yet.
    Init,
    /// Method and content type accepted.
    ContentTypeChecked,
    /// Path resolved and body identified as a share document.
    NodeResolved,
    /// Anti-forgery check passed or not required.
    CsrfVerified,
    /// Caller may edit the sharee list.
    AclChecked,
    /// `update_shares` returned successfully.
    MutationApplied,
    /// Response built.
    Responded,
}

impl fmt::Display for SharingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::ContentTypeChecked => "content-type-checked",
            Self::NodeResolved => "node-resolved",
            Self::CsrfVerified => "csrf-verified",
            Self::AclChecked => "acl-checked",
            Self::MutationApplied => "mutation-applied",
            Self::Responded => "responded",
        };
        f.write_str(name)
    }
}

/// Sharing plugin: applies share documents POSTed to shareable collections.
pub struct SharingPlugin {
    /// Path to node lookup.
    resolver: Arc<dyn NodeResolver>,
    /// Caller identity.
    auth: Arc<dyn AuthContext>,
    /// Anti-forgery validation.
    csrf: Arc<dyn CsrfValidator>,
    /// Privilege checks; `None` lets every caller through.
    acl: Option<Arc<AclChecker>>,
    /// Share document parser.
    parser: ShareMutationParser,
    /// Namespace table for sniffing.
    namespaces: DavNamespaces,
    /// DAV settings (principal layout).
    config: DavConfig,
    /// Header marking handled responses.
    marker_header: HeaderName,
}

impl SharingPlugin {
    /// Creates a plugin without an ACL subsystem.
    pub fn new(
        config: &DavConfig,
        resolver: Arc<dyn NodeResolver>,
        auth: Arc<dyn AuthContext>,
        csrf: Arc<dyn CsrfValidator>,
    ) -> Result<Self, AppError> {
        let marker_header = HeaderName::from_bytes(config.sharing_marker_header.as_bytes())
            .map_err(|e| {
                AppError::configuration(format!(
                    "Invalid sharing marker header '{}': {e}",
                    config.sharing_marker_header
                ))
            })?;
        let namespaces = DavNamespaces::from(&config.namespaces);

        Ok(Self {
            resolver,
            auth,
            csrf,
            acl: None,
            parser: ShareMutationParser::new(namespaces.clone()),
            namespaces,
            config: config.clone(),
            marker_header,
        })
    }

    /// Mounts an ACL checker; callers then need write on the node.
    pub fn with_acl(mut self, checker: Arc<AclChecker>) -> Self {
        self.acl = Some(checker);
        self
    }

    fn advance(state: &mut SharingState, next: SharingState, path: &str) {
        debug!(path = %path, from = %state, to = %next, "Sharing state transition");
        *state = next;
    }

    fn unhandled(
        state: SharingState,
        path: &str,
        reason: &str,
        request: DavRequest,
    ) -> PluginOutcome {
        debug!(path = %path, state = %state, reason, "Sharing plugin passing request on");
        PluginOutcome::Unhandled(request)
    }
}

#[async_trait]
impl ServerPlugin for SharingPlugin {
    fn name(&self) -> &'static str {
        "sharing"
    }

    async fn handle(&self, mut request: DavRequest) -> Result<PluginOutcome, DavError> {
        let path = request_path(&request);
        let mut state = SharingState::Init;

        if request.method() != Method::POST || !has_xml_content_type(&request) {
            return Ok(Self::unhandled(state, &path, "not an XML POST", request));
        }
        Self::advance(&mut state, SharingState::ContentTypeChecked, &path);

        let node = match self.resolver.resolve(&path).await {
            Ok(node) => node,
            Err(e) if e.is_not_found() => {
                return Ok(Self::unhandled(state, &path, "path not found", request));
            }
            Err(e) => return Err(DavError::Backend(e)),
        };

        let body = std::mem::take(request.body_mut());
        let document = sniff_document(&body, &self.namespaces);
        *request.body_mut() = body;

        if document != DocumentType::Share {
            debug!(path = %path, document = %document, "Not a share document");
            return Ok(Self::unhandled(state, &path, "not a share document", request));
        }
        Self::advance(&mut state, SharingState::NodeResolved, &path);

        let user = self.auth.current_user(&request);
        let protocol_authenticated = user.as_deref().is_some_and(|user| {
            self.auth
                .is_authenticated(&request, &self.config.principal_for(user))
        });
        if !protocol_authenticated && !self.csrf.check(&request) {
            warn!(path = %path, user = ?user, "Rejected share request: CSRF check failed");
            return Err(DavError::CsrfCheckFailed);
        }
        Self::advance(&mut state, SharingState::CsrfVerified, &path);

        let Some(shareable) = node.as_shareable() else {
            return Ok(Self::unhandled(state, &path, "node is not shareable", request));
        };

        if let Some(acl) = &self.acl {
            let allowed = match user.as_deref() {
                Some(user) => {
                    acl.check_privilege(
                        shareable.resource_id(),
                        shareable.owner_principal(),
                        user,
                        Privilege::Write,
                    )
                    .await?
                }
                None => false,
            };
            if !allowed {
                warn!(
                    path = %path,
                    user = ?user,
                    "Rejected share request: missing write privilege"
                );
                return Err(DavError::NeedPrivileges {
                    path,
                    privilege: Privilege::Write,
                });
            }
        }
        Self::advance(&mut state, SharingState::AclChecked, &path);

        let mutation = self.parser.parse(request.body())?;
        shareable
            .update_shares(&mutation.additions, &mutation.removals)
            .await?;
        Self::advance(&mut state, SharingState::MutationApplied, &path);

        info!(
            path = %path,
            resource_id = %shareable.resource_id(),
            additions = mutation.additions.len(),
            removals = mutation.removals.len(),
            "Applied share mutation"
        );

        let response = Response::builder()
            .status(StatusCode::OK)
            .header(
                self.marker_header.clone(),
                HeaderValue::from_static(SHARING_MARKER_VALUE),
            )
            .body(String::new())
            .map_err(|e| AppError::internal(format!("Failed to build response: {e}")))?;
        Self::advance(&mut state, SharingState::Responded, &path);

        Ok(PluginOutcome::Handled(response))
    }
}
