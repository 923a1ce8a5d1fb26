//! Shared fixtures for ledger integration tests

#![allow(dead_code)]

use consent_ledger::{Account, DelegateLedger, LedgerConfig, ManualClock, MemoryStorage};

pub const DELEGATE: Account = [0xD0; 32];
pub const ADMIN: Account = [0x01; 32];
pub const ISSUER: Account = [0x02; 32];
pub const CAP_MANAGER: Account = [0x03; 32];
pub const REVOKER: Account = [0x04; 32];
pub const VICTIM: Account = [0x10; 32];
pub const ATTACKER: Account = [0x20; 32];
pub const BYSTANDER: Account = [0x30; 32];

pub const GENESIS_TIME: u64 = 1_700_000_000;

pub type TestLedger = DelegateLedger<MemoryStorage, ManualClock>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Config with one holder per role and no allocations
pub fn base_config() -> LedgerConfig {
    LedgerConfig::new(DELEGATE, ADMIN)
        .with_issuer(ISSUER)
        .with_cap_manager(CAP_MANAGER)
        .with_override_revoker(REVOKER)
}

pub fn create_ledger(config: LedgerConfig) -> (TestLedger, ManualClock) {
    init_logger();
    let clock = ManualClock::new(GENESIS_TIME);
    let ledger = DelegateLedger::new(config, MemoryStorage::new(), clock.clone())
        .expect("Failed to create ledger");
    (ledger, clock)
}

/// Fresh ledger where VICTIM holds 1000 units
pub fn ledger_with_victim_funds() -> (TestLedger, ManualClock) {
    create_ledger(base_config().with_allocation(VICTIM, 1_000))
}
