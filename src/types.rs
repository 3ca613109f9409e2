/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access tiers an operation can require
/// The authorization service decides how tiers relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum PermissionLevel {
    None = 0,
    Read = 1,
    Write = 2,
    Admin = 3,  // Everything up to altering clients
}

impl PermissionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::None => "NONE",
            PermissionLevel::Read => "READ",
            PermissionLevel::Write => "WRITE",
            PermissionLevel::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" | "0" => Ok(PermissionLevel::None),
            "READ" | "1" => Ok(PermissionLevel::Read),
            "WRITE" | "2" => Ok(PermissionLevel::Write),
            "ADMIN" | "3" => Ok(PermissionLevel::Admin),
            other => Err(format!("unknown permission level '{}'", other)),
        }
    }
}
