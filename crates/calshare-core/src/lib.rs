//! # calshare-core
//!
//! Core crate for calshare. Contains the collaborator traits consumed by the
//! sharing and search layers, configuration schemas, the share / ACL / filter
//! domain types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other calshare crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
