//! Collaborator traits defined in `calshare-core` and implemented by other
//! crates (the composed calendar tree, the in-memory store, the auth layer).

pub mod auth;
pub mod principal;
pub mod query;
pub mod storage;
pub mod tree;

pub use auth::{AuthContext, CsrfValidator};
pub use principal::PrincipalBackend;
pub use query::CalendarQueryEngine;
pub use storage::{CalendarBackend, ShareStorage};
pub use tree::{DavNode, NodeResolver, Shareable};
