use crate::asset::{Account, Allowance, LedgerError, RoleConfig, RoleId};
use crate::storage::LedgerProvider;
use crate::time::TimestampSeconds;
use indexmap::IndexMap;

/// Key types for overlay storage
///
/// Each variant represents a unique storage key in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LedgerKey {
    // ===== Ledger-level keys =====
    /// Total issued supply
    Supply,
    /// Global delegate override flag
    GlobalOverride,
    /// Per-second issuance cap
    IssuanceCap,
    /// Timestamp of the last successful issuance
    LastIssuance,

    // ===== Account-level keys =====
    /// Balance for account
    Balance(Account),
    /// Allowance from owner to spender
    Allowance { owner: Account, spender: Account },
    /// Delegate consent flag for account
    Consent(Account),

    // ===== Role keys =====
    /// Role configuration
    RoleConfig(RoleId),
    /// Role membership (account has role)
    RoleMember { role: RoleId, account: Account },
}

/// Value types for overlay storage
///
/// The `Deleted` variant marks a key as deleted (tombstone).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerValue {
    Supply(u64),
    GlobalOverride(bool),
    IssuanceCap(u64),
    LastIssuance(TimestampSeconds),
    Balance(u64),
    Allowance(Allowance),
    Consent(bool),
    RoleConfig(RoleConfig),
    /// Granted timestamp for role membership
    RoleMemberGrantedAt(TimestampSeconds),

    /// Marks a key as deleted
    Deleted,
}

/// Overlay cache for ledger operations
///
/// Accumulates writes during a single operation. On success the changes are
/// applied to the provider in first-write order, on failure they are dropped.
#[derive(Debug, Clone, Default)]
pub struct LedgerOverlay {
    /// Changes to be applied (key → value)
    changes: IndexMap<LedgerKey, LedgerValue>,
}

impl LedgerOverlay {
    pub fn new() -> Self {
        Self {
            changes: IndexMap::new(),
        }
    }

    /// Get a value from the overlay (returns None if not in overlay)
    pub fn get(&self, key: &LedgerKey) -> Option<&LedgerValue> {
        self.changes.get(key)
    }

    pub fn set(&mut self, key: LedgerKey, value: LedgerValue) {
        self.changes.insert(key, value);
    }

    pub fn delete(&mut self, key: LedgerKey) {
        self.changes.insert(key, LedgerValue::Deleted);
    }

    /// Write every change into the provider, consuming the overlay
    pub fn apply<P: LedgerProvider + ?Sized>(self, provider: &mut P) -> Result<(), LedgerError> {
        for (key, value) in self.changes {
            match (key, value) {
                (LedgerKey::Supply, LedgerValue::Supply(v)) => provider.set_supply(v)?,
                (LedgerKey::GlobalOverride, LedgerValue::GlobalOverride(v)) => {
                    provider.set_global_override(v)?
                }
                (LedgerKey::IssuanceCap, LedgerValue::IssuanceCap(v)) => {
                    provider.set_issuance_cap(v)?
                }
                (LedgerKey::LastIssuance, LedgerValue::LastIssuance(v)) => {
                    provider.set_last_issuance(v)?
                }
                (LedgerKey::Balance(account), LedgerValue::Balance(v)) => {
                    provider.set_balance(&account, v)?
                }
                (LedgerKey::Allowance { owner, spender }, LedgerValue::Allowance(v)) => {
                    provider.set_allowance(&owner, &spender, &v)?
                }
                (LedgerKey::Allowance { owner, spender }, LedgerValue::Deleted) => {
                    provider.delete_allowance(&owner, &spender)?
                }
                (LedgerKey::Consent(account), LedgerValue::Consent(v)) => {
                    provider.set_consent(&account, v)?
                }
                (LedgerKey::RoleConfig(role), LedgerValue::RoleConfig(v)) => {
                    provider.set_role_config(&role, &v)?
                }
                (LedgerKey::RoleMember { role, account }, LedgerValue::RoleMemberGrantedAt(at)) => {
                    provider.set_role_member(&role, &account, at)?
                }
                (LedgerKey::RoleMember { role, account }, LedgerValue::Deleted) => {
                    provider.delete_role_member(&role, &account)?
                }
                (key, value) => {
                    return Err(LedgerError::Storage(format!(
                        "overlay value {:?} does not match key {:?}",
                        value, key
                    )))
                }
            }
        }
        Ok(())
    }
}
