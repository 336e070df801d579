//! DAV protocol layer for calshare.
//!
//! Requests reach this crate fully buffered as [`DavRequest`] values and
//! are offered to a chain of [`ServerPlugin`]s by [`DavHandler`]. Each
//! plugin either claims the request or hands it back untouched.
//!
//! [`DavRequest`]: calshare_core::types::DavRequest

pub mod acl_propfind;
pub mod composer;
pub mod error;
pub mod filter;
pub mod handler;
pub mod namespace;
pub mod plugin;
pub mod properties;
pub mod search;
pub mod sharing;
pub mod xml;

pub use acl_propfind::AclDiscoveryPlugin;
pub use composer::{CalendarTreeResolver, CollectionComposer};
pub use error::DavError;
pub use handler::DavHandler;
pub use namespace::DavNamespaces;
pub use plugin::{PluginOutcome, ServerPlugin};
pub use search::SearchReportPlugin;
pub use sharing::SharingPlugin;
