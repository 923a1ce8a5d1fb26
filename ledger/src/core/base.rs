// Base ledger: balances, supply and the stored owner -> spender allowances
//
// Operations follow a phased approach: validate and compute every new value
// first, then write. The surrounding transaction still discards all writes
// if a later step fails.

use log::debug;

use super::resolver;
use super::transaction::LedgerTransaction;
use crate::asset::{Account, Allowance, EffectiveAllowance, LedgerError, LedgerEvent, ZERO_ACCOUNT};
use crate::storage::LedgerProvider;

pub fn balance_of<S: LedgerProvider + ?Sized>(
    store: &S,
    account: &Account,
) -> Result<u64, LedgerError> {
    store.get_balance(account)
}

pub fn stored_allowance<S: LedgerProvider + ?Sized>(
    store: &S,
    owner: &Account,
    spender: &Account,
) -> Result<u64, LedgerError> {
    Ok(store.get_allowance(owner, spender)?.amount)
}

/// Move `amount` from `from` to `to`
pub fn transfer<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    from: &Account,
    to: &Account,
    amount: u64,
) -> Result<(), LedgerError> {
    if *from == ZERO_ACCOUNT || *to == ZERO_ACCOUNT {
        return Err(LedgerError::ZeroAddress);
    }

    // Phase 1: Validation
    let from_balance = tx.get_balance(from)?;
    let new_from = from_balance
        .checked_sub(amount)
        .ok_or(LedgerError::InsufficientBalance {
            need: amount,
            have: from_balance,
        })?;

    // Phase 2: Update balances
    tx.set_balance(from, new_from)?;
    // Read after the debit so a self-transfer nets out
    let to_balance = tx.get_balance(to)?;
    let new_to = to_balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
    tx.set_balance(to, new_to)?;

    tx.emit(LedgerEvent::Transfer {
        from: *from,
        to: *to,
        amount,
    });
    Ok(())
}

/// Create new units for `to`, keeping supply equal to the sum of balances
pub fn credit<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    to: &Account,
    amount: u64,
) -> Result<(), LedgerError> {
    if *to == ZERO_ACCOUNT {
        return Err(LedgerError::ZeroAddress);
    }

    let new_supply = tx
        .get_supply()?
        .checked_add(amount)
        .ok_or(LedgerError::Overflow)?;
    let new_balance = tx
        .get_balance(to)?
        .checked_add(amount)
        .ok_or(LedgerError::Overflow)?;

    tx.set_balance(to, new_balance)?;
    tx.set_supply(new_supply)
}

pub fn approve<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    owner: &Account,
    spender: &Account,
    amount: u64,
) -> Result<(), LedgerError> {
    if *owner == ZERO_ACCOUNT || *spender == ZERO_ACCOUNT {
        return Err(LedgerError::ZeroAddress);
    }

    write_allowance(tx, owner, spender, amount)?;
    tx.emit(LedgerEvent::Approval {
        owner: *owner,
        spender: *spender,
        amount,
    });
    Ok(())
}

pub fn increase_allowance<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    owner: &Account,
    spender: &Account,
    added: u64,
) -> Result<(), LedgerError> {
    let current = stored_allowance(&*tx, owner, spender)?;
    let amount = current.checked_add(added).ok_or(LedgerError::Overflow)?;
    approve(tx, owner, spender, amount)
}

pub fn decrease_allowance<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    owner: &Account,
    spender: &Account,
    subtracted: u64,
) -> Result<(), LedgerError> {
    let current = stored_allowance(&*tx, owner, spender)?;
    let amount = current
        .checked_sub(subtracted)
        .ok_or(LedgerError::InsufficientAllowance {
            allowance: current,
            requested: subtracted,
        })?;
    approve(tx, owner, spender, amount)
}

/// Transfer-on-behalf, authorized by the effective allowance
pub fn transfer_from<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    delegate_agent: &Account,
    spender: &Account,
    owner: &Account,
    to: &Account,
    amount: u64,
) -> Result<(), LedgerError> {
    let effective = resolver::effective_allowance(&*tx, delegate_agent, owner, spender)?;
    if !effective.covers(amount) {
        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "transfer_from rejected: {} may move {} of {}, requested {}",
                hex::encode(spender),
                effective.as_u64(),
                hex::encode(owner),
                amount
            );
        }
        return Err(LedgerError::InsufficientAllowance {
            allowance: effective.as_u64(),
            requested: amount,
        });
    }

    transfer(tx, owner, to, amount)?;

    // Consent grants a standing right: only finite allowances are consumed
    if let EffectiveAllowance::Finite(current) = effective {
        write_allowance(tx, owner, spender, current - amount)?;
    }
    Ok(())
}

fn write_allowance<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    owner: &Account,
    spender: &Account,
    amount: u64,
) -> Result<(), LedgerError> {
    if amount == 0 {
        tx.delete_allowance(owner, spender)
    } else {
        let allowance = Allowance {
            amount,
            updated_at: tx.timestamp(),
        };
        tx.set_allowance(owner, spender, &allowance)
    }
}
