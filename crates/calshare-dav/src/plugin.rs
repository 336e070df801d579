//! Server plugin contract and request helpers shared by the plugins.

use async_trait::async_trait;
use http::Response;
use percent_encoding::percent_decode_str;

use calshare_core::types::DavRequest;

use crate::error::DavError;

/// What a plugin did with a request.
#[derive(Debug)]
pub enum PluginOutcome {
    /// The plugin does not own the request. The request is handed back
    /// unmodified, body included, for the next plugin.
    Unhandled(DavRequest),
    /// The plugin fully answered the request; chaining stops.
    Handled(Response<String>),
}

impl PluginOutcome {
    /// Whether the request was claimed.
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

/// A request interceptor in the DAV handler chain.
#[async_trait]
pub trait ServerPlugin: Send + Sync {
    /// Plugin name used in log fields.
    fn name(&self) -> &'static str;

    /// Offer a request to the plugin.
    ///
    /// An error ends the request with the error's protocol response.
    async fn handle(&self, request: DavRequest) -> Result<PluginOutcome, DavError>;
}

/// Decoded request path without leading or trailing slashes.
pub fn request_path(request: &DavRequest) -> String {
    percent_decode_str(request.uri().path())
        .decode_utf8_lossy()
        .trim_matches('/')
        .to_string()
}

/// Whether the request declares an XML body (`application/xml` or
/// `text/xml`, parameters ignored).
pub fn has_xml_content_type(request: &DavRequest) -> bool {
    request
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .is_some_and(|mime| {
            mime.eq_ignore_ascii_case("application/xml") || mime.eq_ignore_ascii_case("text/xml")
        })
}
