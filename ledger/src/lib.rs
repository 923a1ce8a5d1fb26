// Allow some clippy lints
#![allow(clippy::module_inception)]
#![allow(clippy::too_many_arguments)]

pub mod asset;
pub mod config;
pub mod core;
pub mod logger;
pub mod storage;
pub mod time;

pub use asset::{
    Account, EffectiveAllowance, LedgerError, LedgerEvent, RoleId, ADMIN_ROLE, CAP_MANAGER_ROLE,
    ISSUER_ROLE, OVERRIDE_REVOKER_ROLE, ZERO_ACCOUNT,
};
pub use config::{GenesisAllocation, LedgerConfig, VERSION};
pub use self::core::{DelegateLedger, LedgerTransaction};
pub use storage::{LedgerProvider, LedgerSnapshot, MemoryStorage};
pub use time::{Clock, ManualClock, SystemClock, TimestampSeconds};
