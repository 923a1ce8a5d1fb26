//! Ledger components and the transactional facade over them
//!
//! Component functions operate on a [`LedgerTransaction`]; the
//! [`DelegateLedger`] opens one per caller operation and commits it only
//! when the whole operation succeeded.

pub mod base;
pub mod consent;
pub mod governance;
pub mod issuance;
pub mod ledger;
pub mod resolver;
pub mod transaction;

pub use ledger::DelegateLedger;
pub use transaction::LedgerTransaction;
