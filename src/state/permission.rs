//! Capability evaluation over the held identity.
//!
//! DESIGN
//! ======
//! The capability set is closed. Anything that does not parse into a
//! [`Capability`] is denied, and an anonymous session is denied everything,
//! `read` included.

#[cfg(test)]
#[path = "permission_test.rs"]
mod permission_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::net::types::User;

/// A named permission a route or UI action can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Read,
    Create,
    Edit,
    Delete,
    Upload,
    Admin,
}

impl Capability {
    pub const ALL: [Capability; 6] = [Self::Read, Self::Create, Self::Edit, Self::Delete, Self::Upload, Self::Admin];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Upload => "upload",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown capability: {0}")]
pub struct UnknownCapability(pub String);

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|cap| cap.as_str() == s)
            .ok_or_else(|| UnknownCapability(s.to_owned()))
    }
}

/// Whether an authenticated user holds `capability`.
///
/// `read` is implied by being authenticated; administrators additionally
/// hold `delete` and `admin` regardless of their explicit flags.
#[must_use]
pub fn grants(user: &User, capability: Capability) -> bool {
    let perms = &user.permissions;
    match capability {
        Capability::Read => true,
        Capability::Create => perms.can_create,
        Capability::Edit => perms.can_edit,
        Capability::Delete => perms.can_delete || user.is_admin,
        Capability::Upload => perms.can_upload,
        Capability::Admin => user.is_admin,
    }
}

/// Evaluate a capability by name against an optional identity. Fail-closed.
#[must_use]
pub fn evaluate(identity: Option<&User>, capability: &str) -> bool {
    let Some(user) = identity else {
        return false;
    };
    capability
        .parse::<Capability>()
        .is_ok_and(|cap| grants(user, cap))
}
