//! In-memory Ledger Provider Implementation

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use log::trace;
use serde::{Deserialize, Serialize};

use super::LedgerProvider;
use crate::asset::{
    role_label, Account, Allowance, LedgerError, LedgerOverlay, RoleConfig, RoleId,
};
use crate::time::TimestampSeconds;

#[derive(Debug, Clone)]
pub struct MemoryStorage {
    supply: u64,
    balances: HashMap<Account, u64>,
    allowances: HashMap<(Account, Account), Allowance>,
    consents: HashMap<Account, bool>,
    global_override: bool,
    issuance_cap: u64,
    last_issuance: TimestampSeconds,
    role_configs: HashMap<RoleId, RoleConfig>,
    // Members kept in grant order
    role_members: HashMap<RoleId, IndexMap<Account, TimestampSeconds>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self {
            supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            consents: HashMap::new(),
            global_override: true,
            issuance_cap: 0,
            last_issuance: 0,
            role_configs: HashMap::new(),
            role_members: HashMap::new(),
        }
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts holding role, in grant order
    pub fn role_members(&self, role: &RoleId) -> Vec<Account> {
        self.role_members
            .get(role)
            .map(|members| members.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Sorted view of the whole persisted state for audit
    pub fn snapshot(&self) -> LedgerSnapshot {
        let balances = self
            .balances
            .iter()
            .filter(|(_, balance)| **balance > 0)
            .map(|(account, balance)| (hex::encode(account), *balance))
            .collect();

        let allowances = self
            .allowances
            .iter()
            .map(|((owner, spender), allowance)| {
                (
                    format!("{}:{}", hex::encode(owner), hex::encode(spender)),
                    allowance.amount,
                )
            })
            .collect();

        let consents = self
            .consents
            .iter()
            .map(|(account, enabled)| (hex::encode(account), *enabled))
            .collect();

        let roles = self
            .role_members
            .iter()
            .filter(|(_, members)| !members.is_empty())
            .map(|(role, members)| {
                (
                    role_label(role),
                    members.keys().map(hex::encode).collect::<Vec<_>>(),
                )
            })
            .collect();

        LedgerSnapshot {
            total_supply: self.supply,
            global_override_enabled: self.global_override,
            issuance_cap_per_second: self.issuance_cap,
            last_issuance: self.last_issuance,
            balances,
            allowances,
            consents,
            roles,
        }
    }
}

impl LedgerProvider for MemoryStorage {
    fn get_supply(&self) -> Result<u64, LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("get supply");
        }
        Ok(self.supply)
    }

    fn set_supply(&mut self, supply: u64) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("set supply = {}", supply);
        }
        self.supply = supply;
        Ok(())
    }

    fn get_balance(&self, account: &Account) -> Result<u64, LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("get balance for {}", hex::encode(account));
        }
        Ok(self.balances.get(account).copied().unwrap_or(0))
    }

    fn set_balance(&mut self, account: &Account, balance: u64) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("set balance for {} = {}", hex::encode(account), balance);
        }
        if balance == 0 {
            self.balances.remove(account);
        } else {
            self.balances.insert(*account, balance);
        }
        Ok(())
    }

    fn get_allowance(
        &self,
        owner: &Account,
        spender: &Account,
    ) -> Result<Allowance, LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!(
                "get allowance {} -> {}",
                hex::encode(owner),
                hex::encode(spender)
            );
        }
        Ok(self
            .allowances
            .get(&(*owner, *spender))
            .cloned()
            .unwrap_or_default())
    }

    fn set_allowance(
        &mut self,
        owner: &Account,
        spender: &Account,
        allowance: &Allowance,
    ) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!(
                "set allowance {} -> {} = {}",
                hex::encode(owner),
                hex::encode(spender),
                allowance.amount
            );
        }
        self.allowances
            .insert((*owner, *spender), allowance.clone());
        Ok(())
    }

    fn delete_allowance(
        &mut self,
        owner: &Account,
        spender: &Account,
    ) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!(
                "delete allowance {} -> {}",
                hex::encode(owner),
                hex::encode(spender)
            );
        }
        self.allowances.remove(&(*owner, *spender));
        Ok(())
    }

    fn get_consent(&self, account: &Account) -> Result<bool, LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("get consent for {}", hex::encode(account));
        }
        Ok(self.consents.get(account).copied().unwrap_or(false))
    }

    fn set_consent(&mut self, account: &Account, enabled: bool) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("set consent for {} = {}", hex::encode(account), enabled);
        }
        self.consents.insert(*account, enabled);
        Ok(())
    }

    fn get_global_override(&self) -> Result<bool, LedgerError> {
        Ok(self.global_override)
    }

    fn set_global_override(&mut self, enabled: bool) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("set global override = {}", enabled);
        }
        self.global_override = enabled;
        Ok(())
    }

    fn get_issuance_cap(&self) -> Result<u64, LedgerError> {
        Ok(self.issuance_cap)
    }

    fn set_issuance_cap(&mut self, cap: u64) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("set issuance cap = {}", cap);
        }
        self.issuance_cap = cap;
        Ok(())
    }

    fn get_last_issuance(&self) -> Result<TimestampSeconds, LedgerError> {
        Ok(self.last_issuance)
    }

    fn set_last_issuance(&mut self, timestamp: TimestampSeconds) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("set last issuance = {}", timestamp);
        }
        self.last_issuance = timestamp;
        Ok(())
    }

    fn get_role_config(&self, role: &RoleId) -> Result<RoleConfig, LedgerError> {
        Ok(self.role_configs.get(role).cloned().unwrap_or_default())
    }

    fn set_role_config(&mut self, role: &RoleId, config: &RoleConfig) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!(
                "set role config {} members = {}",
                role_label(role),
                config.member_count
            );
        }
        self.role_configs.insert(*role, config.clone());
        Ok(())
    }

    fn get_role_member(
        &self,
        role: &RoleId,
        account: &Account,
    ) -> Result<Option<TimestampSeconds>, LedgerError> {
        Ok(self
            .role_members
            .get(role)
            .and_then(|members| members.get(account))
            .copied())
    }

    fn set_role_member(
        &mut self,
        role: &RoleId,
        account: &Account,
        granted_at: TimestampSeconds,
    ) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("grant role {} to {}", role_label(role), hex::encode(account));
        }
        self.role_members
            .entry(*role)
            .or_default()
            .insert(*account, granted_at);
        Ok(())
    }

    fn delete_role_member(
        &mut self,
        role: &RoleId,
        account: &Account,
    ) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!(
                "revoke role {} from {}",
                role_label(role),
                hex::encode(account)
            );
        }
        if let Some(members) = self.role_members.get_mut(role) {
            members.shift_remove(account);
        }
        Ok(())
    }

    // Stage on a copy and swap, so a failed write leaves self untouched
    fn apply_overlay(&mut self, overlay: LedgerOverlay) -> Result<(), LedgerError> {
        let mut staged = self.clone();
        overlay.apply(&mut staged)?;
        *self = staged;
        Ok(())
    }
}

/// Audit view of the persisted state, keyed by hex encoded accounts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub total_supply: u64,
    pub global_override_enabled: bool,
    pub issuance_cap_per_second: u64,
    pub last_issuance: TimestampSeconds,
    pub balances: BTreeMap<String, u64>,
    /// Keyed by `owner:spender`
    pub allowances: BTreeMap<String, u64>,
    pub consents: BTreeMap<String, bool>,
    /// Role label to members in grant order
    pub roles: BTreeMap<String, Vec<String>>,
}

impl LedgerSnapshot {
    /// blake3 fingerprint of the canonical JSON encoding
    pub fn digest(&self) -> Result<[u8; 32], LedgerError> {
        let bytes =
            serde_json::to_vec(self).map_err(|e| LedgerError::Storage(e.to_string()))?;
        Ok(*blake3::hash(&bytes).as_bytes())
    }
}
