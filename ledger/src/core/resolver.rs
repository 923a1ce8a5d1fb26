// Allowance Resolver
//
// The delegate agent is treated as holding unlimited authority over an
// owner's balance only when three independent gates all agree:
//   1. the spender is the configured delegate agent
//   2. the global override flag is enabled
//   3. the owner has opted in through the consent registry
// Any other combination reports the stored allowance unchanged.

use crate::asset::{Account, EffectiveAllowance, LedgerError};
use crate::storage::LedgerProvider;

/// Pure read; never mutates state
pub fn effective_allowance<S: LedgerProvider + ?Sized>(
    store: &S,
    delegate_agent: &Account,
    owner: &Account,
    spender: &Account,
) -> Result<EffectiveAllowance, LedgerError> {
    let is_delegate = spender == delegate_agent;
    let global_enabled = store.get_global_override()?;
    let consent = store.get_consent(owner)?;

    if is_delegate && global_enabled && consent {
        return Ok(EffectiveAllowance::Unlimited);
    }

    let stored = store.get_allowance(owner, spender)?;
    Ok(EffectiveAllowance::Finite(stored.amount))
}
