//! Ledger Asset Module
//!
//! Data model shared by every ledger component.
//!
//! # Features
//!
//! - Account and allowance types
//! - Consent-resolved effective allowances
//! - Role identifiers for governance
//! - Error taxonomy with stable error codes
//! - Write overlay for all-or-nothing operations

pub mod error;
pub mod overlay;
pub mod roles;
pub mod types;

pub use error::*;
pub use overlay::*;
pub use roles::*;
pub use types::*;
