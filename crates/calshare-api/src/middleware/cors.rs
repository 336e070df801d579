//! CORS layer configuration.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};

use calshare_core::config::{AuthConfig, CorsConfig};

/// Builds a CORS tower layer from configuration.
///
/// DAV clients send `Depth` and the CSRF header besides the usual ones, so
/// those are always allowed.
pub fn build_cors_layer(config: &CorsConfig, auth: &AuthConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    if config.allowed_origins.iter().any(|o| o == "*") {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
        .collect();
    layer = layer.allow_methods(methods);

    let mut headers = vec![
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        HeaderName::from_static("depth"),
    ];
    if let Ok(csrf) = HeaderName::from_bytes(auth.csrf_header.as_bytes()) {
        headers.push(csrf);
    }
    layer = layer.allow_headers(headers);

    layer.max_age(Duration::from_secs(config.max_age_seconds))
}
