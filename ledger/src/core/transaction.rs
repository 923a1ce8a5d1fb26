// Ledger Transaction: overlay-backed view over a LedgerProvider
//
// Every mutating ledger operation runs against a LedgerTransaction. Reads
// consult the overlay first and fall through to the committed provider;
// writes and notifications are buffered until the facade commits them.
// Dropping the transaction discards everything it wrote.

use crate::asset::{
    Account, Allowance, LedgerError, LedgerEvent, LedgerKey, LedgerOverlay, LedgerValue,
    RoleConfig, RoleId,
};
use crate::storage::LedgerProvider;
use crate::time::TimestampSeconds;

pub struct LedgerTransaction<'a, P: LedgerProvider + ?Sized> {
    provider: &'a P,
    overlay: LedgerOverlay,
    events: Vec<LedgerEvent>,
    timestamp: TimestampSeconds,
}

impl<'a, P: LedgerProvider + ?Sized> LedgerTransaction<'a, P> {
    pub fn new(provider: &'a P, timestamp: TimestampSeconds) -> Self {
        Self {
            provider,
            overlay: LedgerOverlay::new(),
            events: Vec::new(),
            timestamp,
        }
    }

    /// Time at which this transaction executes; fixed for its whole run
    pub fn timestamp(&self) -> TimestampSeconds {
        self.timestamp
    }

    /// Buffer a notification, published only if the transaction commits
    pub fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn into_parts(self) -> (LedgerOverlay, Vec<LedgerEvent>) {
        (self.overlay, self.events)
    }

    fn mismatch(key: &LedgerKey) -> LedgerError {
        LedgerError::Storage(format!("unexpected overlay value for {:?}", key))
    }
}

impl<P: LedgerProvider + ?Sized> LedgerProvider for LedgerTransaction<'_, P> {
    fn get_supply(&self) -> Result<u64, LedgerError> {
        match self.overlay.get(&LedgerKey::Supply) {
            Some(LedgerValue::Supply(v)) => Ok(*v),
            Some(_) => Err(Self::mismatch(&LedgerKey::Supply)),
            None => self.provider.get_supply(),
        }
    }

    fn set_supply(&mut self, supply: u64) -> Result<(), LedgerError> {
        self.overlay
            .set(LedgerKey::Supply, LedgerValue::Supply(supply));
        Ok(())
    }

    fn get_balance(&self, account: &Account) -> Result<u64, LedgerError> {
        let key = LedgerKey::Balance(*account);
        match self.overlay.get(&key) {
            Some(LedgerValue::Balance(v)) => Ok(*v),
            Some(_) => Err(Self::mismatch(&key)),
            None => self.provider.get_balance(account),
        }
    }

    fn set_balance(&mut self, account: &Account, balance: u64) -> Result<(), LedgerError> {
        self.overlay
            .set(LedgerKey::Balance(*account), LedgerValue::Balance(balance));
        Ok(())
    }

    fn get_allowance(
        &self,
        owner: &Account,
        spender: &Account,
    ) -> Result<Allowance, LedgerError> {
        let key = LedgerKey::Allowance {
            owner: *owner,
            spender: *spender,
        };
        match self.overlay.get(&key) {
            Some(LedgerValue::Allowance(v)) => Ok(v.clone()),
            Some(LedgerValue::Deleted) => Ok(Allowance::default()),
            Some(_) => Err(Self::mismatch(&key)),
            None => self.provider.get_allowance(owner, spender),
        }
    }

    fn set_allowance(
        &mut self,
        owner: &Account,
        spender: &Account,
        allowance: &Allowance,
    ) -> Result<(), LedgerError> {
        self.overlay.set(
            LedgerKey::Allowance {
                owner: *owner,
                spender: *spender,
            },
            LedgerValue::Allowance(allowance.clone()),
        );
        Ok(())
    }

    fn delete_allowance(
        &mut self,
        owner: &Account,
        spender: &Account,
    ) -> Result<(), LedgerError> {
        self.overlay.delete(LedgerKey::Allowance {
            owner: *owner,
            spender: *spender,
        });
        Ok(())
    }

    fn get_consent(&self, account: &Account) -> Result<bool, LedgerError> {
        let key = LedgerKey::Consent(*account);
        match self.overlay.get(&key) {
            Some(LedgerValue::Consent(v)) => Ok(*v),
            Some(_) => Err(Self::mismatch(&key)),
            None => self.provider.get_consent(account),
        }
    }

    fn set_consent(&mut self, account: &Account, enabled: bool) -> Result<(), LedgerError> {
        self.overlay
            .set(LedgerKey::Consent(*account), LedgerValue::Consent(enabled));
        Ok(())
    }

    fn get_global_override(&self) -> Result<bool, LedgerError> {
        match self.overlay.get(&LedgerKey::GlobalOverride) {
            Some(LedgerValue::GlobalOverride(v)) => Ok(*v),
            Some(_) => Err(Self::mismatch(&LedgerKey::GlobalOverride)),
            None => self.provider.get_global_override(),
        }
    }

    fn set_global_override(&mut self, enabled: bool) -> Result<(), LedgerError> {
        self.overlay.set(
            LedgerKey::GlobalOverride,
            LedgerValue::GlobalOverride(enabled),
        );
        Ok(())
    }

    fn get_issuance_cap(&self) -> Result<u64, LedgerError> {
        match self.overlay.get(&LedgerKey::IssuanceCap) {
            Some(LedgerValue::IssuanceCap(v)) => Ok(*v),
            Some(_) => Err(Self::mismatch(&LedgerKey::IssuanceCap)),
            None => self.provider.get_issuance_cap(),
        }
    }

    fn set_issuance_cap(&mut self, cap: u64) -> Result<(), LedgerError> {
        self.overlay
            .set(LedgerKey::IssuanceCap, LedgerValue::IssuanceCap(cap));
        Ok(())
    }

    fn get_last_issuance(&self) -> Result<TimestampSeconds, LedgerError> {
        match self.overlay.get(&LedgerKey::LastIssuance) {
            Some(LedgerValue::LastIssuance(v)) => Ok(*v),
            Some(_) => Err(Self::mismatch(&LedgerKey::LastIssuance)),
            None => self.provider.get_last_issuance(),
        }
    }

    fn set_last_issuance(&mut self, timestamp: TimestampSeconds) -> Result<(), LedgerError> {
        self.overlay
            .set(LedgerKey::LastIssuance, LedgerValue::LastIssuance(timestamp));
        Ok(())
    }

    fn get_role_config(&self, role: &RoleId) -> Result<RoleConfig, LedgerError> {
        let key = LedgerKey::RoleConfig(*role);
        match self.overlay.get(&key) {
            Some(LedgerValue::RoleConfig(v)) => Ok(v.clone()),
            Some(_) => Err(Self::mismatch(&key)),
            None => self.provider.get_role_config(role),
        }
    }

    fn set_role_config(&mut self, role: &RoleId, config: &RoleConfig) -> Result<(), LedgerError> {
        self.overlay.set(
            LedgerKey::RoleConfig(*role),
            LedgerValue::RoleConfig(config.clone()),
        );
        Ok(())
    }

    fn get_role_member(
        &self,
        role: &RoleId,
        account: &Account,
    ) -> Result<Option<TimestampSeconds>, LedgerError> {
        let key = LedgerKey::RoleMember {
            role: *role,
            account: *account,
        };
        match self.overlay.get(&key) {
            Some(LedgerValue::RoleMemberGrantedAt(at)) => Ok(Some(*at)),
            Some(LedgerValue::Deleted) => Ok(None),
            Some(_) => Err(Self::mismatch(&key)),
            None => self.provider.get_role_member(role, account),
        }
    }

    fn set_role_member(
        &mut self,
        role: &RoleId,
        account: &Account,
        granted_at: TimestampSeconds,
    ) -> Result<(), LedgerError> {
        self.overlay.set(
            LedgerKey::RoleMember {
                role: *role,
                account: *account,
            },
            LedgerValue::RoleMemberGrantedAt(granted_at),
        );
        Ok(())
    }

    fn delete_role_member(
        &mut self,
        role: &RoleId,
        account: &Account,
    ) -> Result<(), LedgerError> {
        self.overlay.delete(LedgerKey::RoleMember {
            role: *role,
            account: *account,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_reads_see_own_writes() {
        let mut storage = MemoryStorage::new();
        storage.set_balance(&[1; 32], 100).unwrap();

        let mut tx = LedgerTransaction::new(&storage, 10);
        assert_eq!(tx.get_balance(&[1; 32]).unwrap(), 100);
        tx.set_balance(&[1; 32], 40).unwrap();
        assert_eq!(tx.get_balance(&[1; 32]).unwrap(), 40);
        // Committed state untouched until apply
        assert_eq!(storage.get_balance(&[1; 32]).unwrap(), 100);
    }

    #[test]
    fn test_deleted_allowance_reads_zero() {
        let mut storage = MemoryStorage::new();
        let allowance = Allowance {
            amount: 9,
            updated_at: 1,
        };
        storage.set_allowance(&[1; 32], &[2; 32], &allowance).unwrap();

        let mut tx = LedgerTransaction::new(&storage, 10);
        tx.delete_allowance(&[1; 32], &[2; 32]).unwrap();
        assert_eq!(tx.get_allowance(&[1; 32], &[2; 32]).unwrap().amount, 0);
    }

    #[test]
    fn test_dropped_transaction_leaves_no_trace() {
        let storage = MemoryStorage::new();
        let before = storage.snapshot();
        {
            let mut tx = LedgerTransaction::new(&storage, 10);
            tx.set_consent(&[1; 32], true).unwrap();
            tx.set_issuance_cap(500).unwrap();
        }
        assert_eq!(storage.snapshot(), before);
    }
}
