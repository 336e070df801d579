//! Route definitions for the calshare HTTP API.
//!
//! The JSON endpoints are plain routes. Every other request is a DAV request
//! and goes through the authentication middleware to the DAV fallback.

use axum::handler::Handler;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors, &state.config.auth);

    let dav = ServiceBuilder::new()
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ))
        .service(handlers::dav::dav.with_state(state.clone()));

    Router::new()
        .merge(auth_routes())
        .merge(health_routes())
        .fallback_service(dav)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Session endpoints: login, CSRF token, logout
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/csrftoken", get(handlers::auth::csrf_token))
        .route("/logout", post(handlers::auth::logout))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
