//! Share invitations, mutations, and persisted grants.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// One `<set>` entry of a share document: invite or update a sharee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareInvitation {
    /// Sharee href, usually `mailto:` or `principal:` form. Empty when the
    /// document omitted it.
    pub href: String,
    /// Display name supplied by the client.
    pub common_name: Option<String>,
    /// Free-form summary supplied by the client.
    pub summary: Option<String>,
    /// Whether the sharee gets read access only.
    pub read_only: bool,
}

impl ShareInvitation {
    /// Read-only invitation for `href`.
    pub fn read_only(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            common_name: None,
            summary: None,
            read_only: true,
        }
    }

    /// Read-write invitation for `href`.
    pub fn read_write(href: impl Into<String>) -> Self {
        Self {
            read_only: false,
            ..Self::read_only(href)
        }
    }

    /// Permissions a grant created from this invitation carries.
    pub fn permissions(&self) -> SharePermissions {
        if self.read_only {
            SharePermissions::READ
        } else {
            SharePermissions::READ_WRITE
        }
    }
}

/// Additions and removals parsed from one share document.
///
/// Both lists keep document order; a backend applying them sequentially
/// lets later entries for the same href win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareMutation {
    /// Sharees to add or update.
    pub additions: Vec<ShareInvitation>,
    /// Hrefs of sharees to remove.
    pub removals: Vec<String>,
}

impl ShareMutation {
    /// A mutation with neither additions nor removals.
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}

/// Permission bitmask of a share grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharePermissions(u8);

impl SharePermissions {
    /// No permissions.
    pub const NONE: Self = Self(0);
    /// Read objects in the collection.
    pub const READ: Self = Self(1);
    /// Modify existing objects.
    pub const UPDATE: Self = Self(1 << 1);
    /// Create new objects.
    pub const CREATE: Self = Self(1 << 2);
    /// Delete objects.
    pub const DELETE: Self = Self(1 << 3);
    /// Everything a read-write sharee receives.
    pub const READ_WRITE: Self =
        Self(Self::READ.0 | Self::UPDATE.0 | Self::CREATE.0 | Self::DELETE.0);

    /// Raw bit value.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, dropping unknown ones.
    pub fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::READ_WRITE.0)
    }

    /// Whether every bit of `other` is set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no bit is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for SharePermissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SharePermissions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for SharePermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Self::READ, "read"),
            (Self::UPDATE, "update"),
            (Self::CREATE, "create"),
            (Self::DELETE, "delete"),
        ]
        .iter()
        .filter(|(bit, _)| self.contains(*bit))
        .map(|(_, name)| *name)
        .collect();

        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

/// A persisted permission record linking a principal to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareGrant {
    /// Principal URI of the sharee (`principals/{user}`).
    pub principal: String,
    /// Granted permissions.
    pub permissions: SharePermissions,
    /// Href the sharee was invited with.
    pub href: String,
    /// Display name from the invitation.
    pub common_name: Option<String>,
    /// Summary from the invitation.
    pub summary: Option<String>,
}

impl ShareGrant {
    /// Grant derived from an invitation whose href resolved to `principal`.
    pub fn from_invitation(principal: impl Into<String>, invitation: &ShareInvitation) -> Self {
        Self {
            principal: principal.into(),
            permissions: invitation.permissions(),
            href: invitation.href.clone(),
            common_name: invitation.common_name.clone(),
            summary: invitation.summary.clone(),
        }
    }

    /// Whether the grant only allows reading.
    pub fn is_read_only(&self) -> bool {
        !self.permissions.contains(SharePermissions::UPDATE)
    }
}
