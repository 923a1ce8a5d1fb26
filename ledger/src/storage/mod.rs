//! Ledger Provider
//!
//! Persisted-state surface of the ledger. Every value is conceptually a
//! key-value entry; unknown keys read as zero, `false` or empty.

mod memory;

pub use memory::{LedgerSnapshot, MemoryStorage};

use crate::asset::{Account, Allowance, LedgerError, LedgerOverlay, RoleConfig, RoleId};
use crate::time::TimestampSeconds;

// ===== Ledger Provider Trait =====

pub trait LedgerProvider {
    // ===== Supply Operations =====

    /// Get total issued supply
    fn get_supply(&self) -> Result<u64, LedgerError>;

    /// Set total issued supply
    fn set_supply(&mut self, supply: u64) -> Result<(), LedgerError>;

    // ===== Balance Operations =====

    /// Get balance for account
    fn get_balance(&self, account: &Account) -> Result<u64, LedgerError>;

    /// Set balance for account
    fn set_balance(&mut self, account: &Account, balance: u64) -> Result<(), LedgerError>;

    // ===== Allowance Operations =====

    /// Get stored allowance for owner-spender pair
    fn get_allowance(&self, owner: &Account, spender: &Account)
        -> Result<Allowance, LedgerError>;

    /// Set stored allowance for owner-spender pair
    fn set_allowance(
        &mut self,
        owner: &Account,
        spender: &Account,
        allowance: &Allowance,
    ) -> Result<(), LedgerError>;

    /// Delete stored allowance for owner-spender pair
    fn delete_allowance(&mut self, owner: &Account, spender: &Account)
        -> Result<(), LedgerError>;

    // ===== Consent Operations =====

    /// Get delegate consent flag for account
    fn get_consent(&self, account: &Account) -> Result<bool, LedgerError>;

    /// Set delegate consent flag for account
    fn set_consent(&mut self, account: &Account, enabled: bool) -> Result<(), LedgerError>;

    // ===== Governance State =====

    /// Get global delegate override flag
    fn get_global_override(&self) -> Result<bool, LedgerError>;

    /// Set global delegate override flag
    fn set_global_override(&mut self, enabled: bool) -> Result<(), LedgerError>;

    /// Get per-second issuance cap
    fn get_issuance_cap(&self) -> Result<u64, LedgerError>;

    /// Set per-second issuance cap
    fn set_issuance_cap(&mut self, cap: u64) -> Result<(), LedgerError>;

    /// Get timestamp of the last successful issuance
    fn get_last_issuance(&self) -> Result<TimestampSeconds, LedgerError>;

    /// Set timestamp of the last successful issuance
    fn set_last_issuance(&mut self, timestamp: TimestampSeconds) -> Result<(), LedgerError>;

    // ===== Role Operations =====

    /// Get role configuration
    fn get_role_config(&self, role: &RoleId) -> Result<RoleConfig, LedgerError>;

    /// Set role configuration
    fn set_role_config(&mut self, role: &RoleId, config: &RoleConfig) -> Result<(), LedgerError>;

    /// Get the grant timestamp if account holds role
    fn get_role_member(
        &self,
        role: &RoleId,
        account: &Account,
    ) -> Result<Option<TimestampSeconds>, LedgerError>;

    /// Record account as holder of role
    fn set_role_member(
        &mut self,
        role: &RoleId,
        account: &Account,
        granted_at: TimestampSeconds,
    ) -> Result<(), LedgerError>;

    /// Remove account from role
    fn delete_role_member(&mut self, role: &RoleId, account: &Account)
        -> Result<(), LedgerError>;

    /// Check if account has role
    fn has_role(&self, role: &RoleId, account: &Account) -> Result<bool, LedgerError> {
        Ok(self.get_role_member(role, account)?.is_some())
    }

    // ===== Commit =====

    /// Persist every change of a committed operation
    ///
    /// Must be all-or-nothing: on error no change of the overlay may remain
    /// visible. The default writes key by key and is only correct for
    /// providers whose setters cannot fail; fallible backends override it
    /// with a batched write.
    fn apply_overlay(&mut self, overlay: LedgerOverlay) -> Result<(), LedgerError> {
        overlay.apply(self)
    }
}
