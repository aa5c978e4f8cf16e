//! Role hierarchy.
//!
//! Three roles in a strict total order: `USER < EDITOR < ADMIN`.
//! A role satisfies a requirement when it is greater than or equal to it,
//! so `ADMIN` satisfies everything and `USER` satisfies only `USER`.
//!
//! # Example
//!
//! ```
//! use setsisaw_core::Role;
//!
//! let role: Role = "editor".parse().unwrap();
//! assert!(role.satisfies(Role::User));
//! assert!(role.satisfies(Role::Editor));
//! assert!(!role.satisfies(Role::Admin));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a role name is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: '{value}'")]
pub struct ParseRoleError {
    /// The rejected input.
    pub value: String,
}

/// Account role.
///
/// Variant declaration order defines the hierarchy; `Ord` is derived from it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular account: reads shared data, manages its own sets.
    #[default]
    User,
    /// May manage artists, locations and other users' data.
    Editor,
    /// Full access.
    Admin,
}

impl Role {
    /// All roles, lowest first.
    pub const ALL: [Role; 3] = [Role::User, Role::Editor, Role::Admin];

    /// Check whether this role meets `required`.
    #[must_use]
    pub fn satisfies(self, required: Role) -> bool {
        self >= required
    }

    /// Canonical upper-case name, as stored and as carried in tokens.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Editor => "EDITOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "EDITOR" => Ok(Role::Editor),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(ParseRoleError {
                value: s.to_string(),
            }),
        }
    }
}
