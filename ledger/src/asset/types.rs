//! Ledger Types
//!
//! Core data structures shared by the base ledger, the consent registry,
//! the allowance resolver and the issuance limiter.

use serde::{Deserialize, Serialize};

use super::roles::RoleId;
use crate::time::TimestampSeconds;

/// Opaque account identifier
pub type Account = [u8; 32];

/// The null account, never a valid owner, recipient or role holder
pub const ZERO_ACCOUNT: Account = [0u8; 32];

// ===== Allowance =====

/// Allowance record (owner -> spender -> amount)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    /// Remaining allowance
    pub amount: u64,
    /// Timestamp of the last update
    pub updated_at: TimestampSeconds,
}

/// Allowance reported to callers after consent resolution
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectiveAllowance {
    /// Standing authority granted through consent, never consumed
    Unlimited,
    /// Stored allowance, consumed by each transfer-on-behalf
    Finite(u64),
}

impl EffectiveAllowance {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// Whether a transfer of `amount` is authorized
    pub fn covers(&self, amount: u64) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Finite(allowance) => *allowance >= amount,
        }
    }

    /// Numeric view: `Unlimited` maps to `u64::MAX`
    pub fn as_u64(&self) -> u64 {
        match self {
            Self::Unlimited => u64::MAX,
            Self::Finite(allowance) => *allowance,
        }
    }
}

// ===== Notifications =====

/// Append-only notification emitted by a committed operation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    ConsentChanged {
        #[serde(with = "hex::serde")]
        account: Account,
        previous: bool,
        enabled: bool,
    },
    GlobalOverrideChanged {
        #[serde(with = "hex::serde")]
        revoker: Account,
        previous: bool,
        enabled: bool,
    },
    CapUpdated {
        #[serde(with = "hex::serde")]
        manager: Account,
        previous_cap: u64,
        new_cap: u64,
    },
    Minted {
        #[serde(with = "hex::serde")]
        issuer: Account,
        #[serde(with = "hex::serde")]
        to: Account,
        amount: u64,
        previous_issuance: TimestampSeconds,
        issued_at: TimestampSeconds,
    },
    Transfer {
        #[serde(with = "hex::serde")]
        from: Account,
        #[serde(with = "hex::serde")]
        to: Account,
        amount: u64,
    },
    Approval {
        #[serde(with = "hex::serde")]
        owner: Account,
        #[serde(with = "hex::serde")]
        spender: Account,
        amount: u64,
    },
    RoleGranted {
        #[serde(with = "hex::serde")]
        role: RoleId,
        #[serde(with = "hex::serde")]
        account: Account,
        #[serde(with = "hex::serde")]
        sender: Account,
    },
    RoleRevoked {
        #[serde(with = "hex::serde")]
        role: RoleId,
        #[serde(with = "hex::serde")]
        account: Account,
        #[serde(with = "hex::serde")]
        sender: Account,
    },
}
