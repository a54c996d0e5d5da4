//! Account role types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account role.
///
/// Wire format: `"ADMIN"`, `"KADER"` (health worker), `"ORANG_TUA"` (parent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Kader,
    OrangTua,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Kader => "KADER",
            Self::OrangTua => "ORANG_TUA",
        }
    }

    /// Every role except `ADMIN` is scoped to exactly one health post.
    pub fn requires_health_post(self) -> bool {
        !matches!(self, Self::Admin)
    }

    /// Whether an account holding `self` may provision an account with `target`.
    pub fn may_provision(self, target: Role) -> bool {
        match self {
            Self::Admin => true,
            Self::Kader => target == Self::OrangTua,
            Self::OrangTua => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "KADER" => Ok(Self::Kader),
            "ORANG_TUA" => Ok(Self::OrangTua),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}
