//! Domain types shared across the auth and session modules.

use serde::{Deserialize, Serialize};

/// Authorization role carried inside a validated credential.
///
/// The backend encodes the role as a lowercase string in the `/api/auth/me`
/// response. Unrecognized values deserialize to `Unknown` rather than failing,
/// so a new backend role never breaks token validation - it is simply treated
/// as not-admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Display name for UI surfaces (access-denied panel, status line).
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Staff => "Staff",
            Role::Unknown => "Unknown",
        }
    }
}

/// Identity returned by the `/api/auth/me` endpoint for a valid credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub name: Option<String>,
}
