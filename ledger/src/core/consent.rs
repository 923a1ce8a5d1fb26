// Consent Registry
//
// Each account owns exactly one flag: its own. `set_consent` only ever
// writes the caller's flag, so no account can opt another one in or out.

use super::transaction::LedgerTransaction;
use crate::asset::{Account, LedgerError, LedgerEvent};
use crate::storage::LedgerProvider;

pub fn get_consent<S: LedgerProvider + ?Sized>(
    store: &S,
    account: &Account,
) -> Result<bool, LedgerError> {
    store.get_consent(account)
}

/// Record the caller's opt-in (or opt-out) for the delegate agent
pub fn set_consent<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    caller: &Account,
    enabled: bool,
) -> Result<(), LedgerError> {
    let previous = tx.get_consent(caller)?;
    tx.set_consent(caller, enabled)?;
    tx.emit(LedgerEvent::ConsentChanged {
        account: *caller,
        previous,
        enabled,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_set_consent_only_touches_caller() {
        let storage = MemoryStorage::new();
        let mut tx = LedgerTransaction::new(&storage, 1);
        set_consent(&mut tx, &[1; 32], true).unwrap();
        assert!(get_consent(&tx, &[1; 32]).unwrap());
        assert!(!get_consent(&tx, &[2; 32]).unwrap());
    }

    #[test]
    fn test_notification_carries_previous_value() {
        let storage = MemoryStorage::new();
        let mut tx = LedgerTransaction::new(&storage, 1);
        set_consent(&mut tx, &[1; 32], true).unwrap();
        set_consent(&mut tx, &[1; 32], false).unwrap();
        assert_eq!(
            tx.events(),
            &[
                LedgerEvent::ConsentChanged {
                    account: [1; 32],
                    previous: false,
                    enabled: true,
                },
                LedgerEvent::ConsentChanged {
                    account: [1; 32],
                    previous: true,
                    enabled: false,
                },
            ]
        );
    }
}
