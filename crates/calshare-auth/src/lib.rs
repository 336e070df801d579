//! # calshare-auth
//!
//! Authorization and authentication building blocks for calshare.
//!
//! ## Modules
//!
//! - `acl` — pure ACE computation from ownership and share grants, plus
//!   privilege checks
//! - `context` — request identity lookups for the DAV plugins
//! - `csrf` — anti-forgery tokens bound to browser sessions
//! - `password` — Argon2id password hashing
//! - `session` — in-memory browser session store

pub mod acl;
pub mod context;
pub mod csrf;
pub mod password;
pub mod session;

pub use acl::{AclChecker, AclResolver};
pub use context::ExtensionAuthContext;
pub use csrf::CsrfTokenManager;
pub use password::PasswordHasher;
pub use session::{SessionRecord, SessionStore};
