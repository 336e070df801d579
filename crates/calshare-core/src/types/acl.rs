//! Access control entries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Privileges the sharing layer reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    /// `{DAV:}read`
    Read,
    /// `{DAV:}write`
    Write,
}

impl Privilege {
    /// Local name of the privilege element in the `DAV:` namespace.
    pub fn local_name(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{DAV:}}{}", self.local_name())
    }
}

/// One `(privilege, principal, protected)` grant.
///
/// Never persisted: recomputed from ownership and share grants on every
/// ACL query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ace {
    /// Granted privilege.
    pub privilege: Privilege,
    /// Principal URI the privilege is granted to.
    pub principal: String,
    /// Protected entries cannot be removed by share edits.
    pub protected: bool,
}

impl Ace {
    /// Construct an entry.
    pub fn new(privilege: Privilege, principal: impl Into<String>, protected: bool) -> Self {
        Self {
            privilege,
            principal: principal.into(),
            protected,
        }
    }
}
