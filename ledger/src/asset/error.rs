//! Ledger Error Codes
//!
//! Range: 0x0300 - 0x03FF
//! Format: LEDGER_ERROR_<CATEGORY>_<SPECIFIC>

use thiserror::Error;

use super::roles::{role_label, RoleId};

// ===== General Errors (0x0300 - 0x030F) =====

pub const LEDGER_ERROR_ZERO_ADDRESS: u64 = 0x0300;
pub const LEDGER_ERROR_OVERFLOW: u64 = 0x0301;
pub const LEDGER_ERROR_INVALID_CONFIGURATION: u64 = 0x0302;
pub const LEDGER_ERROR_STORAGE: u64 = 0x0303;

// ===== Balance Errors (0x0310 - 0x031F) =====

pub const LEDGER_ERROR_INSUFFICIENT_BALANCE: u64 = 0x0310;

// ===== Authorization Errors (0x0320 - 0x032F) =====

pub const LEDGER_ERROR_UNAUTHORIZED: u64 = 0x0320;
pub const LEDGER_ERROR_INSUFFICIENT_ALLOWANCE: u64 = 0x0321;
pub const LEDGER_ERROR_CANNOT_REVOKE_LAST_ADMIN: u64 = 0x0322;

// ===== Issuance Errors (0x0330 - 0x033F) =====

pub const LEDGER_ERROR_CAP_EXCEEDED: u64 = 0x0330;

/// Every failure aborts the whole operation; none of its writes are applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Unauthorized: caller is missing role {}", role_label(.role))]
    Unauthorized { role: RoleId },

    #[error("Issuance cap exceeded: limit {limit}, requested {requested}")]
    CapExceeded { limit: u64, requested: u64 },

    #[error("Insufficient balance: need {need}, have {have}")]
    InsufficientBalance { need: u64, have: u64 },

    #[error("Insufficient allowance: allowance {allowance}, requested {requested}")]
    InsufficientAllowance { allowance: u64, requested: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Address cannot be zero")]
    ZeroAddress,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Cannot revoke last admin")]
    CannotRevokeLastAdmin,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Convert error to u64 error code
    pub fn to_code(&self) -> u64 {
        match self {
            Self::Unauthorized { .. } => LEDGER_ERROR_UNAUTHORIZED,
            Self::CapExceeded { .. } => LEDGER_ERROR_CAP_EXCEEDED,
            Self::InsufficientBalance { .. } => LEDGER_ERROR_INSUFFICIENT_BALANCE,
            Self::InsufficientAllowance { .. } => LEDGER_ERROR_INSUFFICIENT_ALLOWANCE,
            Self::InvalidConfiguration(_) => LEDGER_ERROR_INVALID_CONFIGURATION,
            Self::ZeroAddress => LEDGER_ERROR_ZERO_ADDRESS,
            Self::Overflow => LEDGER_ERROR_OVERFLOW,
            Self::CannotRevokeLastAdmin => LEDGER_ERROR_CANNOT_REVOKE_LAST_ADMIN,
            Self::Storage(_) => LEDGER_ERROR_STORAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::roles::ISSUER_ROLE;

    #[test]
    fn test_error_codes_in_range() {
        let errors = [
            LedgerError::Unauthorized { role: ISSUER_ROLE },
            LedgerError::CapExceeded {
                limit: 1,
                requested: 2,
            },
            LedgerError::InsufficientBalance { need: 2, have: 1 },
            LedgerError::InsufficientAllowance {
                allowance: 0,
                requested: 1,
            },
            LedgerError::InvalidConfiguration("x".to_string()),
            LedgerError::ZeroAddress,
            LedgerError::Overflow,
            LedgerError::CannotRevokeLastAdmin,
            LedgerError::Storage("x".to_string()),
        ];
        let mut codes: Vec<u64> = errors.iter().map(LedgerError::to_code).collect();
        assert!(codes.iter().all(|c| (0x0300..=0x03FF).contains(c)));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_error_messages_carry_context() {
        let err = LedgerError::CapExceeded {
            limit: 50,
            requested: 51,
        };
        assert_eq!(
            err.to_string(),
            "Issuance cap exceeded: limit 50, requested 51"
        );

        let err = LedgerError::Unauthorized { role: ISSUER_ROLE };
        assert_eq!(err.to_string(), "Unauthorized: caller is missing role ISSUER");
    }
}
