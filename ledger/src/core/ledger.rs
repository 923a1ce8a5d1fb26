//! Delegate Ledger
//!
//! Entry point for every caller-facing operation.
//!
//! # Architecture
//!
//! ```text
//! caller operation (e.g., mint)
//!     ↓
//! DelegateLedger::execute()      reads `now` once from the Clock
//!     ↓
//! LedgerTransaction              overlay over the committed provider
//!     ↓
//! component logic                base / consent / issuance / governance
//!     ↓
//! commit: apply_overlay()        or drop everything on error
//! ```
//!
//! # Atomicity
//!
//! Mutating operations take `&mut self`, so at most one runs at a time.
//! An operation either commits all of its writes and notifications, or
//! fails and leaves the provider and the event log untouched. The commit
//! goes through `LedgerProvider::apply_overlay`, which every provider must
//! implement as a single all-or-nothing write. Hosts that share a ledger
//! across threads wrap it in a mutex.

use log::{debug, info};

use super::{base, consent, governance, issuance, resolver};
use super::transaction::LedgerTransaction;
use crate::asset::{
    Account, EffectiveAllowance, LedgerError, LedgerEvent, RoleId, ADMIN_ROLE, CAP_MANAGER_ROLE,
    ISSUER_ROLE, OVERRIDE_REVOKER_ROLE, ZERO_ACCOUNT,
};
use crate::config::{LedgerConfig, VERSION};
use crate::storage::LedgerProvider;
use crate::time::{Clock, TimestampSeconds};

pub struct DelegateLedger<P: LedgerProvider, C: Clock> {
    provider: P,
    clock: C,
    delegate_agent: Account,
    events: Vec<LedgerEvent>,
}

impl<P: LedgerProvider, C: Clock> DelegateLedger<P, C> {
    /// Initialize a fresh ledger from `config`
    ///
    /// The last issuance timestamp starts at the creation time, so no mint
    /// can draw on a window that never elapsed.
    pub fn new(config: LedgerConfig, provider: P, clock: C) -> Result<Self, LedgerError> {
        config.validate()?;

        let mut ledger = Self {
            provider,
            clock,
            delegate_agent: config.delegate_agent,
            events: Vec::new(),
        };

        ledger.execute("initialize", |tx| {
            let role_holders = [
                (ADMIN_ROLE, &config.admins),
                (ISSUER_ROLE, &config.issuers),
                (CAP_MANAGER_ROLE, &config.cap_managers),
                (OVERRIDE_REVOKER_ROLE, &config.override_revokers),
            ];
            for (role, accounts) in role_holders {
                for account in accounts {
                    governance::assign_role(tx, &role, account)?;
                }
            }

            tx.set_issuance_cap(config.issuance_cap_per_second)?;
            tx.set_global_override(config.global_override_enabled)?;
            let created_at = tx.timestamp();
            tx.set_last_issuance(created_at)?;

            for allocation in &config.genesis_allocations {
                base::credit(tx, &allocation.account, allocation.amount)?;
            }
            Ok(())
        })?;

        info!(
            "Ledger {} initialized with delegate agent {}",
            VERSION,
            hex::encode(ledger.delegate_agent)
        );
        Ok(ledger)
    }

    /// Attach to a provider that already holds initialized state
    pub fn open(delegate_agent: Account, provider: P, clock: C) -> Result<Self, LedgerError> {
        if delegate_agent == ZERO_ACCOUNT {
            return Err(LedgerError::InvalidConfiguration(
                "delegate agent cannot be the zero account".to_string(),
            ));
        }
        Ok(Self {
            provider,
            clock,
            delegate_agent,
            events: Vec::new(),
        })
    }

    /// Run `operation` in a transaction; commit on success, discard on error
    fn execute<T, F>(&mut self, name: &str, operation: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut LedgerTransaction<'_, P>) -> Result<T, LedgerError>,
    {
        let timestamp = self.clock.now();
        let mut tx = LedgerTransaction::new(&self.provider, timestamp);
        let value = match operation(&mut tx) {
            Ok(value) => value,
            Err(e) => {
                if log::log_enabled!(log::Level::Debug) {
                    debug!("{} aborted at {}: {}", name, timestamp, e);
                }
                return Err(e);
            }
        };

        let (overlay, events) = tx.into_parts();
        self.provider.apply_overlay(overlay)?;

        for event in events {
            if log::log_enabled!(log::Level::Info) {
                if let Ok(json) = serde_json::to_string(&event) {
                    info!("{}: {}", name, json);
                }
            }
            self.events.push(event);
        }
        Ok(value)
    }

    // ===== Metadata =====

    pub fn version(&self) -> &'static str {
        VERSION
    }

    pub fn delegate_agent(&self) -> &Account {
        &self.delegate_agent
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ===== Notifications =====

    /// Committed notifications, oldest first
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Hand the committed notifications to the caller and clear the log
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== Allowance Resolver =====

    pub fn effective_allowance(
        &self,
        owner: &Account,
        spender: &Account,
    ) -> Result<EffectiveAllowance, LedgerError> {
        resolver::effective_allowance(&self.provider, &self.delegate_agent, owner, spender)
    }

    // ===== Consent Registry =====

    pub fn set_consent(&mut self, caller: &Account, enabled: bool) -> Result<(), LedgerError> {
        self.execute("set_consent", |tx| consent::set_consent(tx, caller, enabled))
    }

    pub fn get_consent(&self, account: &Account) -> Result<bool, LedgerError> {
        consent::get_consent(&self.provider, account)
    }

    // ===== Issuance Limiter =====

    pub fn mint(&mut self, caller: &Account, to: &Account, amount: u64) -> Result<(), LedgerError> {
        self.execute("mint", |tx| issuance::mint(tx, caller, to, amount))
    }

    /// Units a mint executed now could create
    pub fn available_issuance(&self) -> Result<u64, LedgerError> {
        issuance::available_issuance(&self.provider, self.clock.now())
    }

    pub fn issuance_cap(&self) -> Result<u64, LedgerError> {
        self.provider.get_issuance_cap()
    }

    pub fn last_issuance(&self) -> Result<TimestampSeconds, LedgerError> {
        self.provider.get_last_issuance()
    }

    // ===== Governance Control =====

    pub fn update_cap(&mut self, caller: &Account, new_cap: u64) -> Result<(), LedgerError> {
        self.execute("update_cap", |tx| governance::update_cap(tx, caller, new_cap))
    }

    pub fn set_global_override(
        &mut self,
        caller: &Account,
        enabled: bool,
    ) -> Result<(), LedgerError> {
        self.execute("set_global_override", |tx| {
            governance::set_global_override(tx, caller, enabled)
        })
    }

    pub fn global_override_enabled(&self) -> Result<bool, LedgerError> {
        self.provider.get_global_override()
    }

    pub fn grant_role(
        &mut self,
        caller: &Account,
        role: &RoleId,
        account: &Account,
    ) -> Result<(), LedgerError> {
        self.execute("grant_role", |tx| {
            governance::grant_role(tx, caller, role, account)
        })
    }

    pub fn revoke_role(
        &mut self,
        caller: &Account,
        role: &RoleId,
        account: &Account,
    ) -> Result<(), LedgerError> {
        self.execute("revoke_role", |tx| {
            governance::revoke_role(tx, caller, role, account)
        })
    }

    pub fn renounce_role(&mut self, caller: &Account, role: &RoleId) -> Result<(), LedgerError> {
        self.execute("renounce_role", |tx| governance::renounce_role(tx, caller, role))
    }

    pub fn has_role(&self, role: &RoleId, account: &Account) -> Result<bool, LedgerError> {
        self.provider.has_role(role, account)
    }

    // ===== Base Ledger =====

    pub fn balance_of(&self, account: &Account) -> Result<u64, LedgerError> {
        base::balance_of(&self.provider, account)
    }

    pub fn total_supply(&self) -> Result<u64, LedgerError> {
        self.provider.get_supply()
    }

    pub fn stored_allowance(&self, owner: &Account, spender: &Account) -> Result<u64, LedgerError> {
        base::stored_allowance(&self.provider, owner, spender)
    }

    pub fn transfer(&mut self, caller: &Account, to: &Account, amount: u64) -> Result<(), LedgerError> {
        self.execute("transfer", |tx| base::transfer(tx, caller, to, amount))
    }

    pub fn approve(
        &mut self,
        owner: &Account,
        spender: &Account,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.execute("approve", |tx| base::approve(tx, owner, spender, amount))
    }

    pub fn increase_allowance(
        &mut self,
        owner: &Account,
        spender: &Account,
        added: u64,
    ) -> Result<(), LedgerError> {
        self.execute("increase_allowance", |tx| {
            base::increase_allowance(tx, owner, spender, added)
        })
    }

    pub fn decrease_allowance(
        &mut self,
        owner: &Account,
        spender: &Account,
        subtracted: u64,
    ) -> Result<(), LedgerError> {
        self.execute("decrease_allowance", |tx| {
            base::decrease_allowance(tx, owner, spender, subtracted)
        })
    }

    /// Move `amount` of `owner`'s funds to `to` on behalf of `spender`
    pub fn transfer_from(
        &mut self,
        spender: &Account,
        owner: &Account,
        to: &Account,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let delegate_agent = self.delegate_agent;
        self.execute("transfer_from", |tx| {
            base::transfer_from(tx, &delegate_agent, spender, owner, to, amount)
        })
    }
}
