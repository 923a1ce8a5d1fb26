// Governance Control
//
// Role-gated mutators. Authorization is checked first, before any state is
// read or written, through the role registry (`has_role`).

use log::debug;

use super::transaction::LedgerTransaction;
use crate::asset::{
    role_label, Account, LedgerError, LedgerEvent, RoleId, ADMIN_ROLE, CAP_MANAGER_ROLE,
    OVERRIDE_REVOKER_ROLE, ZERO_ACCOUNT,
};
use crate::storage::LedgerProvider;

/// Fail with `Unauthorized` unless `caller` holds `role`
pub fn require_role<S: LedgerProvider + ?Sized>(
    store: &S,
    role: &RoleId,
    caller: &Account,
) -> Result<(), LedgerError> {
    if store.has_role(role, caller)? {
        return Ok(());
    }
    if log::log_enabled!(log::Level::Debug) {
        debug!(
            "{} is missing role {}",
            hex::encode(caller),
            role_label(role)
        );
    }
    Err(LedgerError::Unauthorized { role: *role })
}

/// Replace the per-second issuance cap; zero halts issuance
pub fn update_cap<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    caller: &Account,
    new_cap: u64,
) -> Result<(), LedgerError> {
    require_role(&*tx, &CAP_MANAGER_ROLE, caller)?;

    let previous_cap = tx.get_issuance_cap()?;
    tx.set_issuance_cap(new_cap)?;
    tx.emit(LedgerEvent::CapUpdated {
        manager: *caller,
        previous_cap,
        new_cap,
    });
    Ok(())
}

/// Flip the global gate of the delegate override
pub fn set_global_override<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    caller: &Account,
    enabled: bool,
) -> Result<(), LedgerError> {
    require_role(&*tx, &OVERRIDE_REVOKER_ROLE, caller)?;

    let previous = tx.get_global_override()?;
    tx.set_global_override(enabled)?;
    tx.emit(LedgerEvent::GlobalOverrideChanged {
        revoker: *caller,
        previous,
        enabled,
    });
    Ok(())
}

/// Add `account` to `role` without authorization; returns false if already held
pub(crate) fn assign_role<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    role: &RoleId,
    account: &Account,
) -> Result<bool, LedgerError> {
    if *account == ZERO_ACCOUNT {
        return Err(LedgerError::ZeroAddress);
    }
    if tx.has_role(role, account)? {
        return Ok(false);
    }

    let mut config = tx.get_role_config(role)?;
    config.member_count = config
        .member_count
        .checked_add(1)
        .ok_or(LedgerError::Overflow)?;

    let granted_at = tx.timestamp();
    tx.set_role_member(role, account, granted_at)?;
    tx.set_role_config(role, &config)?;
    Ok(true)
}

fn remove_role<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    role: &RoleId,
    account: &Account,
) -> Result<bool, LedgerError> {
    if !tx.has_role(role, account)? {
        return Ok(false);
    }

    let mut config = tx.get_role_config(role)?;
    if *role == ADMIN_ROLE && config.member_count <= 1 {
        return Err(LedgerError::CannotRevokeLastAdmin);
    }
    config.member_count = config.member_count.saturating_sub(1);

    tx.delete_role_member(role, account)?;
    tx.set_role_config(role, &config)?;
    Ok(true)
}

pub fn grant_role<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    caller: &Account,
    role: &RoleId,
    account: &Account,
) -> Result<(), LedgerError> {
    let admin_role = tx.get_role_config(role)?.admin_role;
    require_role(&*tx, &admin_role, caller)?;

    if assign_role(tx, role, account)? {
        tx.emit(LedgerEvent::RoleGranted {
            role: *role,
            account: *account,
            sender: *caller,
        });
    }
    Ok(())
}

pub fn revoke_role<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    caller: &Account,
    role: &RoleId,
    account: &Account,
) -> Result<(), LedgerError> {
    let admin_role = tx.get_role_config(role)?.admin_role;
    require_role(&*tx, &admin_role, caller)?;

    if remove_role(tx, role, account)? {
        tx.emit(LedgerEvent::RoleRevoked {
            role: *role,
            account: *account,
            sender: *caller,
        });
    }
    Ok(())
}

/// Self-service removal of one of the caller's own roles
pub fn renounce_role<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    caller: &Account,
    role: &RoleId,
) -> Result<(), LedgerError> {
    if remove_role(tx, role, caller)? {
        tx.emit(LedgerEvent::RoleRevoked {
            role: *role,
            account: *caller,
            sender: *caller,
        });
    }
    Ok(())
}
