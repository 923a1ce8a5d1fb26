//! Governance and Issuance Integration Tests
//!
//! Covers:
//! - Role-gated mutators (cap, global override, mint)
//! - Role administration (grant, revoke, renounce, last admin)
//! - Issuance window accounting across clock advances
//! - Genesis initialization and audit snapshots

#![allow(clippy::disallowed_methods)]

mod common;

use common::*;
use consent_ledger::{
    LedgerError, LedgerEvent, ADMIN_ROLE, CAP_MANAGER_ROLE, ISSUER_ROLE, OVERRIDE_REVOKER_ROLE,
};

// ============================================================================
// Genesis
// ============================================================================

#[test]
fn test_genesis_state() {
    let (ledger, _clock) = create_ledger(
        base_config()
            .with_issuance_cap(5)
            .with_allocation(VICTIM, 1_000)
            .with_allocation(BYSTANDER, 24),
    );

    assert_eq!(ledger.total_supply().unwrap(), 1_024);
    assert_eq!(ledger.balance_of(&VICTIM).unwrap(), 1_000);
    assert_eq!(ledger.issuance_cap().unwrap(), 5);
    assert_eq!(ledger.last_issuance().unwrap(), GENESIS_TIME);
    assert!(ledger.global_override_enabled().unwrap());
    assert_eq!(ledger.delegate_agent(), &DELEGATE);

    assert!(ledger.has_role(&ADMIN_ROLE, &ADMIN).unwrap());
    assert!(ledger.has_role(&ISSUER_ROLE, &ISSUER).unwrap());
    assert!(ledger.has_role(&CAP_MANAGER_ROLE, &CAP_MANAGER).unwrap());
    assert!(ledger.has_role(&OVERRIDE_REVOKER_ROLE, &REVOKER).unwrap());
    assert!(!ledger.has_role(&ISSUER_ROLE, &ADMIN).unwrap());

    // Genesis is silent
    assert!(ledger.events().is_empty());
}

#[test]
fn test_genesis_with_global_override_disabled() {
    let mut config = base_config().with_allocation(VICTIM, 10);
    config.global_override_enabled = false;
    let (mut ledger, _clock) = create_ledger(config);

    ledger.set_consent(&VICTIM, true).unwrap();
    assert!(ledger
        .transfer_from(&DELEGATE, &VICTIM, &ATTACKER, 10)
        .is_err());
}

#[test]
fn test_genesis_keeps_role_grant_order() {
    let (ledger, _clock) = create_ledger(
        base_config()
            .with_issuer(BYSTANDER)
            .with_issuer(ATTACKER)
            .with_issuer(VICTIM),
    );
    assert_eq!(
        ledger.provider().role_members(&ISSUER_ROLE),
        vec![ISSUER, BYSTANDER, ATTACKER, VICTIM]
    );
}

#[test]
fn test_snapshot_lists_roles_and_balances() {
    let (ledger, _clock) = ledger_with_victim_funds();
    let snapshot = ledger.provider().snapshot();

    assert_eq!(snapshot.total_supply, 1_000);
    assert_eq!(snapshot.balances.get(&hex::encode(VICTIM)), Some(&1_000));
    assert_eq!(
        snapshot.roles.get("ISSUER"),
        Some(&vec![hex::encode(ISSUER)])
    );
    assert_eq!(snapshot.roles.get("ADMIN"), Some(&vec![hex::encode(ADMIN)]));
}

// ============================================================================
// Issuance Limiter
// ============================================================================

#[test]
fn test_mint_budget_accrues_with_time() {
    let (mut ledger, clock) = create_ledger(base_config().with_issuance_cap(10));

    // Nothing has elapsed since creation
    assert_eq!(
        ledger.mint(&ISSUER, &VICTIM, 1),
        Err(LedgerError::CapExceeded {
            limit: 0,
            requested: 1
        })
    );

    clock.advance(5);
    assert_eq!(ledger.available_issuance().unwrap(), 50);
    assert_eq!(
        ledger.mint(&ISSUER, &VICTIM, 51),
        Err(LedgerError::CapExceeded {
            limit: 50,
            requested: 51
        })
    );
    ledger.mint(&ISSUER, &VICTIM, 50).unwrap();
    assert_eq!(ledger.balance_of(&VICTIM).unwrap(), 50);
    assert_eq!(ledger.total_supply().unwrap(), 50);
    assert_eq!(ledger.last_issuance().unwrap(), GENESIS_TIME + 5);

    // The window restarts at the last mint
    assert_eq!(ledger.available_issuance().unwrap(), 0);
    clock.advance(1);
    ledger.mint(&ISSUER, &BYSTANDER, 10).unwrap();
}

#[test]
fn test_partial_mint_forfeits_remaining_budget() {
    let (mut ledger, clock) = create_ledger(base_config().with_issuance_cap(10));
    clock.advance(10);

    ledger.mint(&ISSUER, &VICTIM, 1).unwrap();
    assert_eq!(
        ledger.mint(&ISSUER, &VICTIM, 1),
        Err(LedgerError::CapExceeded {
            limit: 0,
            requested: 1
        })
    );
}

#[test]
fn test_failed_mint_keeps_window() {
    let (mut ledger, clock) = create_ledger(base_config().with_issuance_cap(10));
    clock.advance(3);

    assert!(ledger.mint(&ISSUER, &VICTIM, 31).is_err());
    assert_eq!(ledger.last_issuance().unwrap(), GENESIS_TIME);
    ledger.mint(&ISSUER, &VICTIM, 30).unwrap();
}

#[test]
fn test_zero_mint_refreshes_window() {
    let (mut ledger, clock) = create_ledger(base_config().with_issuance_cap(10));
    clock.advance(7);

    ledger.mint(&ISSUER, &VICTIM, 0).unwrap();
    assert_eq!(ledger.last_issuance().unwrap(), GENESIS_TIME + 7);
    assert_eq!(ledger.available_issuance().unwrap(), 0);
    assert_eq!(ledger.total_supply().unwrap(), 0);
}

#[test]
fn test_clock_behind_last_issuance_has_no_budget() {
    let (mut ledger, clock) = create_ledger(base_config().with_issuance_cap(10));
    clock.set(GENESIS_TIME - 100);

    assert_eq!(ledger.available_issuance().unwrap(), 0);
    assert!(matches!(
        ledger.mint(&ISSUER, &VICTIM, 1),
        Err(LedgerError::CapExceeded { limit: 0, .. })
    ));
}

#[test]
fn test_clock_regression_cannot_reopen_spent_window() {
    let (mut ledger, clock) = create_ledger(base_config().with_issuance_cap(1));

    clock.set(GENESIS_TIME + 1_000);
    ledger.mint(&ISSUER, &VICTIM, 1_000).unwrap();

    // Zero mint while the clock lags keeps the window start
    clock.set(GENESIS_TIME + 900);
    ledger.mint(&ISSUER, &VICTIM, 0).unwrap();
    assert_eq!(ledger.last_issuance().unwrap(), GENESIS_TIME + 1_000);

    clock.set(GENESIS_TIME + 1_000);
    assert_eq!(
        ledger.mint(&ISSUER, &VICTIM, 100),
        Err(LedgerError::CapExceeded {
            limit: 0,
            requested: 100
        })
    );
    assert_eq!(ledger.total_supply().unwrap(), 1_000);
}

#[test]
fn test_mint_requires_issuer_before_budget() {
    let (mut ledger, clock) = create_ledger(base_config().with_issuance_cap(10));
    clock.advance(100);

    for caller in [ADMIN, CAP_MANAGER, REVOKER, VICTIM] {
        assert_eq!(
            ledger.mint(&caller, &VICTIM, 1),
            Err(LedgerError::Unauthorized { role: ISSUER_ROLE })
        );
    }
    assert_eq!(ledger.last_issuance().unwrap(), GENESIS_TIME);
}

#[test]
fn test_mint_to_zero_account_rejected() {
    let (mut ledger, clock) = create_ledger(base_config().with_issuance_cap(10));
    clock.advance(1);

    assert_eq!(
        ledger.mint(&ISSUER, &consent_ledger::ZERO_ACCOUNT, 1),
        Err(LedgerError::ZeroAddress)
    );
    assert_eq!(ledger.last_issuance().unwrap(), GENESIS_TIME);
}

#[test]
fn test_mint_event() {
    let (mut ledger, clock) = create_ledger(base_config().with_issuance_cap(2));
    clock.advance(4);
    ledger.mint(&ISSUER, &VICTIM, 8).unwrap();

    assert_eq!(
        ledger.take_events(),
        vec![LedgerEvent::Minted {
            issuer: ISSUER,
            to: VICTIM,
            amount: 8,
            previous_issuance: GENESIS_TIME,
            issued_at: GENESIS_TIME + 4,
        }]
    );
    assert!(ledger.events().is_empty());
}

// ============================================================================
// Cap Management
// ============================================================================

#[test]
fn test_update_cap() {
    let (mut ledger, clock) = create_ledger(base_config());

    assert_eq!(
        ledger.update_cap(&ISSUER, 100),
        Err(LedgerError::Unauthorized {
            role: CAP_MANAGER_ROLE
        })
    );

    ledger.update_cap(&CAP_MANAGER, 100).unwrap();
    assert_eq!(ledger.issuance_cap().unwrap(), 100);
    clock.advance(2);
    ledger.mint(&ISSUER, &VICTIM, 200).unwrap();

    // Zero halts issuance
    ledger.update_cap(&CAP_MANAGER, 0).unwrap();
    clock.advance(1_000);
    assert_eq!(ledger.available_issuance().unwrap(), 0);

    let events = ledger.take_events();
    assert_eq!(
        events.last(),
        Some(&LedgerEvent::CapUpdated {
            manager: CAP_MANAGER,
            previous_cap: 100,
            new_cap: 0,
        })
    );
}

#[test]
fn test_cap_change_applies_to_whole_pending_window() {
    let (mut ledger, clock) = create_ledger(base_config().with_issuance_cap(1));
    clock.advance(10);
    ledger.update_cap(&CAP_MANAGER, 3).unwrap();
    assert_eq!(ledger.available_issuance().unwrap(), 30);
}

// ============================================================================
// Global Override
// ============================================================================

#[test]
fn test_global_override_requires_revoker() {
    let (mut ledger, _clock) = create_ledger(base_config());

    assert_eq!(
        ledger.set_global_override(&ADMIN, false),
        Err(LedgerError::Unauthorized {
            role: OVERRIDE_REVOKER_ROLE
        })
    );
    assert!(ledger.global_override_enabled().unwrap());

    ledger.set_global_override(&REVOKER, false).unwrap();
    assert!(!ledger.global_override_enabled().unwrap());
}

// ============================================================================
// Role Administration
// ============================================================================

#[test]
fn test_admin_grants_and_revokes_issuer() {
    let (mut ledger, clock) = create_ledger(base_config().with_issuance_cap(1));
    clock.advance(10);

    assert!(ledger.mint(&BYSTANDER, &BYSTANDER, 1).is_err());
    ledger
        .grant_role(&ADMIN, &ISSUER_ROLE, &BYSTANDER)
        .unwrap();
    ledger.mint(&BYSTANDER, &BYSTANDER, 1).unwrap();

    ledger
        .revoke_role(&ADMIN, &ISSUER_ROLE, &BYSTANDER)
        .unwrap();
    clock.advance(10);
    assert_eq!(
        ledger.mint(&BYSTANDER, &BYSTANDER, 1),
        Err(LedgerError::Unauthorized { role: ISSUER_ROLE })
    );

    assert_eq!(
        ledger.provider().role_members(&ISSUER_ROLE),
        vec![ISSUER]
    );
}

#[test]
fn test_only_admin_manages_roles() {
    let (mut ledger, _clock) = create_ledger(base_config());

    assert_eq!(
        ledger.grant_role(&ISSUER, &ISSUER_ROLE, &ATTACKER),
        Err(LedgerError::Unauthorized { role: ADMIN_ROLE })
    );
    assert_eq!(
        ledger.revoke_role(&REVOKER, &ISSUER_ROLE, &ISSUER),
        Err(LedgerError::Unauthorized { role: ADMIN_ROLE })
    );
    assert!(ledger.has_role(&ISSUER_ROLE, &ISSUER).unwrap());
}

#[test]
fn test_renounce_role() {
    let (mut ledger, _clock) = create_ledger(base_config());

    ledger.renounce_role(&REVOKER, &OVERRIDE_REVOKER_ROLE).unwrap();
    assert!(!ledger.has_role(&OVERRIDE_REVOKER_ROLE, &REVOKER).unwrap());
    assert!(ledger.set_global_override(&REVOKER, false).is_err());

    assert_eq!(
        ledger.take_events(),
        vec![LedgerEvent::RoleRevoked {
            role: OVERRIDE_REVOKER_ROLE,
            account: REVOKER,
            sender: REVOKER,
        }]
    );
}

#[test]
fn test_last_admin_cannot_leave() {
    let (mut ledger, _clock) = create_ledger(base_config());

    assert_eq!(
        ledger.renounce_role(&ADMIN, &ADMIN_ROLE),
        Err(LedgerError::CannotRevokeLastAdmin)
    );

    ledger.grant_role(&ADMIN, &ADMIN_ROLE, &BYSTANDER).unwrap();
    ledger.renounce_role(&ADMIN, &ADMIN_ROLE).unwrap();
    assert!(ledger.has_role(&ADMIN_ROLE, &BYSTANDER).unwrap());
    assert_eq!(
        ledger.revoke_role(&BYSTANDER, &ADMIN_ROLE, &BYSTANDER),
        Err(LedgerError::CannotRevokeLastAdmin)
    );
}

#[test]
fn test_error_codes_are_stable() {
    let (mut ledger, _clock) = create_ledger(base_config());
    let err = ledger.update_cap(&VICTIM, 1).unwrap_err();
    assert_eq!(err.to_code(), 0x0320);
}
