//! Domain types shared by the sharing, search, and ACL layers.

pub mod acl;
pub mod calendar;
pub mod filter;
pub mod id;
pub mod identity;
pub mod share;

pub use acl::{Ace, Privilege};
pub use calendar::{CalendarRecord, SearchHit};
pub use filter::{FilterNode, ParamRef, SearchQuery};
pub use id::ResourceId;
pub use identity::{AuthMethod, DavRequest, RequestIdentity};
pub use share::{ShareGrant, ShareInvitation, ShareMutation, SharePermissions};
