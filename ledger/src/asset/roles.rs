//! Ledger Role System
//!
//! Role-based access control for governance operations.

use serde::{Deserialize, Serialize};

/// Role identifier (32 bytes for flexibility)
pub type RoleId = [u8; 32];

// Predefined roles - ASCII name followed by a discriminator byte

/// Admin role - can grant and revoke all other roles
pub const ADMIN_ROLE: RoleId = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Issuer role - can mint new supply within the issuance cap
pub const ISSUER_ROLE: RoleId = [
    0x49, 0x53, 0x53, 0x55, 0x45, 0x52, 0x5f, 0x52, // ISSUER_R
    0x4f, 0x4c, 0x45, 0x00, 0x00, 0x00, 0x00, 0x00, // OLE
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
];

/// Cap manager role - can replace the per-second issuance cap
pub const CAP_MANAGER_ROLE: RoleId = [
    0x43, 0x41, 0x50, 0x5f, 0x4d, 0x41, 0x4e, 0x41, // CAP_MANA
    0x47, 0x45, 0x52, 0x5f, 0x52, 0x4f, 0x4c, 0x45, // GER_ROLE
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02,
];

/// Override revoker role - can flip the global delegate override
pub const OVERRIDE_REVOKER_ROLE: RoleId = [
    0x4f, 0x56, 0x45, 0x52, 0x52, 0x49, 0x44, 0x45, // OVERRIDE
    0x5f, 0x52, 0x45, 0x56, 0x4f, 0x4b, 0x45, 0x52, // _REVOKER
    0x5f, 0x52, 0x4f, 0x4c, 0x45, 0x00, 0x00, 0x00, // _ROLE
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03,
];

/// Role configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    /// The admin role that can grant/revoke this role
    pub admin_role: RoleId,
    /// Number of members with this role
    pub member_count: u32,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            admin_role: ADMIN_ROLE,
            member_count: 0,
        }
    }
}

/// Get the name of a predefined role
pub fn predefined_role_name(role: &RoleId) -> Option<&'static str> {
    if *role == ADMIN_ROLE {
        Some("ADMIN")
    } else if *role == ISSUER_ROLE {
        Some("ISSUER")
    } else if *role == CAP_MANAGER_ROLE {
        Some("CAP_MANAGER")
    } else if *role == OVERRIDE_REVOKER_ROLE {
        Some("OVERRIDE_REVOKER")
    } else {
        None
    }
}

/// Human readable label: the predefined name, or the hex encoded id
pub fn role_label(role: &RoleId) -> String {
    match predefined_role_name(role) {
        Some(name) => name.to_string(),
        None => hex::encode(role),
    }
}
