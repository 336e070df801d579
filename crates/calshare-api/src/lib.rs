//! # calshare-api
//!
//! HTTP layer for calshare built on Axum.
//!
//! Serves the login, CSRF token, and health endpoints, authenticates DAV
//! requests (Basic or session cookie), and bridges them into the
//! `calshare-dav` plugin chain.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use error::ApiError;
pub use state::AppState;
