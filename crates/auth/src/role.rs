//! Typed workflow roles.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use procura_core::ApprovalLevel;

/// A capability granted by the identity provider.
///
/// Provider role names follow the patterns `staff`, `finance` and
/// `approver-level-<n>` (n >= 1). They are parsed into this enum exactly once
/// at the authentication boundary; the structured value travels from there.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// May create and edit own pending requests and submit receipts.
    Staff,
    /// May approve/reject at the carried ladder level.
    ApproverLevel(ApprovalLevel),
    /// Read-only view of approved requests; may submit receipts on behalf
    /// of others.
    Finance,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoleParseError {
    #[error("unrecognized role name: {0}")]
    Unrecognized(String),

    #[error("invalid approver level in role name: {0}")]
    InvalidLevel(String),
}

const APPROVER_PREFIX: &str = "approver-level-";

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staff" => Ok(Role::Staff),
            "finance" => Ok(Role::Finance),
            other => {
                let Some(suffix) = other.strip_prefix(APPROVER_PREFIX) else {
                    return Err(RoleParseError::Unrecognized(other.to_string()));
                };
                let n: u32 = suffix
                    .parse()
                    .map_err(|_| RoleParseError::InvalidLevel(other.to_string()))?;
                let level = ApprovalLevel::new(n)
                    .map_err(|_| RoleParseError::InvalidLevel(other.to_string()))?;
                Ok(Role::ApproverLevel(level))
            }
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Role::Staff => f.write_str("staff"),
            Role::Finance => f.write_str("finance"),
            Role::ApproverLevel(level) => write!(f, "{APPROVER_PREFIX}{level}"),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = RoleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.to_string()
    }
}
