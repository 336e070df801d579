//! Request handlers.

pub mod auth;
pub mod dav;
pub mod health;
