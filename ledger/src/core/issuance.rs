// Issuance Limiter
//
// A mint may create at most `(now - last_issuance) * cap_per_second` units.
// The budget check, the timestamp refresh and the credit all run inside the
// same transaction with a single `now`, so no other mint can observe the
// window between check and refresh. The window start never moves backwards,
// even when the clock does.

use log::debug;

use super::base;
use super::governance::require_role;
use super::transaction::LedgerTransaction;
use crate::asset::{Account, LedgerError, LedgerEvent, ISSUER_ROLE};
use crate::storage::LedgerProvider;
use crate::time::TimestampSeconds;

/// Budget accrued since the last issuance
///
/// A clock that moved backwards yields no budget; the product saturates.
pub fn max_issuance(
    cap_per_second: u64,
    last_issuance: TimestampSeconds,
    now: TimestampSeconds,
) -> u64 {
    now.saturating_sub(last_issuance)
        .saturating_mul(cap_per_second)
}

/// Budget available to a mint executed at `now`
pub fn available_issuance<S: LedgerProvider + ?Sized>(
    store: &S,
    now: TimestampSeconds,
) -> Result<u64, LedgerError> {
    Ok(max_issuance(
        store.get_issuance_cap()?,
        store.get_last_issuance()?,
        now,
    ))
}

pub fn mint<P: LedgerProvider + ?Sized>(
    tx: &mut LedgerTransaction<'_, P>,
    caller: &Account,
    to: &Account,
    amount: u64,
) -> Result<(), LedgerError> {
    require_role(&*tx, &ISSUER_ROLE, caller)?;

    let now = tx.timestamp();
    let previous_issuance = tx.get_last_issuance()?;
    let max_allowed = available_issuance(&*tx, now)?;
    if amount > max_allowed {
        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "mint of {} rejected: {} available since {}",
                amount, max_allowed, previous_issuance
            );
        }
        return Err(LedgerError::CapExceeded {
            limit: max_allowed,
            requested: amount,
        });
    }

    let issued_at = now.max(previous_issuance);
    tx.set_last_issuance(issued_at)?;
    base::credit(tx, to, amount)?;

    tx.emit(LedgerEvent::Minted {
        issuer: *caller,
        to: *to,
        amount,
        previous_issuance,
        issued_at,
    });
    Ok(())
}
