use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::asset::{Account, LedgerError, ZERO_ACCOUNT};

/// Semantic version of the deployed ledger logic
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default values for configuration
pub mod defaults {
    // Issuance is halted until a cap manager sets a cap
    pub const ISSUANCE_CAP_PER_SECOND: u64 = 0;

    // The global gate starts open; consent remains opt-in per account
    pub const GLOBAL_OVERRIDE_ENABLED: bool = true;
}

fn default_issuance_cap_per_second() -> u64 {
    defaults::ISSUANCE_CAP_PER_SECOND
}
fn default_global_override_enabled() -> bool {
    defaults::GLOBAL_OVERRIDE_ENABLED
}

/// Units credited at creation, outside the issuance limiter
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAllocation {
    #[serde(with = "hex::serde")]
    pub account: Account,
    pub amount: u64,
}

/// Construction-time configuration of a ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Third party that may receive unlimited authority through consent
    #[serde(with = "hex::serde")]
    pub delegate_agent: Account,

    /// Role holders granted at creation
    #[serde(with = "hex_accounts")]
    pub admins: Vec<Account>,

    #[serde(default, with = "hex_accounts")]
    pub issuers: Vec<Account>,

    #[serde(default, with = "hex_accounts")]
    pub cap_managers: Vec<Account>,

    #[serde(default, with = "hex_accounts")]
    pub override_revokers: Vec<Account>,

    #[serde(default = "default_issuance_cap_per_second")]
    pub issuance_cap_per_second: u64,

    #[serde(default = "default_global_override_enabled")]
    pub global_override_enabled: bool,

    #[serde(default)]
    pub genesis_allocations: Vec<GenesisAllocation>,
}

impl LedgerConfig {
    pub fn new(delegate_agent: Account, admin: Account) -> Self {
        Self {
            delegate_agent,
            admins: vec![admin],
            issuers: Vec::new(),
            cap_managers: Vec::new(),
            override_revokers: Vec::new(),
            issuance_cap_per_second: defaults::ISSUANCE_CAP_PER_SECOND,
            global_override_enabled: defaults::GLOBAL_OVERRIDE_ENABLED,
            genesis_allocations: Vec::new(),
        }
    }

    pub fn with_issuer(mut self, account: Account) -> Self {
        self.issuers.push(account);
        self
    }

    pub fn with_cap_manager(mut self, account: Account) -> Self {
        self.cap_managers.push(account);
        self
    }

    pub fn with_override_revoker(mut self, account: Account) -> Self {
        self.override_revokers.push(account);
        self
    }

    pub fn with_issuance_cap(mut self, cap_per_second: u64) -> Self {
        self.issuance_cap_per_second = cap_per_second;
        self
    }

    pub fn with_allocation(mut self, account: Account, amount: u64) -> Self {
        self.genesis_allocations
            .push(GenesisAllocation { account, amount });
        self
    }

    /// Reject null accounts and unrepresentable genesis supply
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.delegate_agent == ZERO_ACCOUNT {
            return Err(invalid("delegate agent cannot be the zero account"));
        }
        if self.admins.is_empty() {
            return Err(invalid("at least one admin is required"));
        }

        let role_lists = [
            ("admins", &self.admins),
            ("issuers", &self.issuers),
            ("cap_managers", &self.cap_managers),
            ("override_revokers", &self.override_revokers),
        ];
        for (name, accounts) in role_lists {
            if accounts.iter().any(|account| *account == ZERO_ACCOUNT) {
                return Err(invalid(&format!("{} contains the zero account", name)));
            }
        }

        if self
            .genesis_allocations
            .iter()
            .any(|allocation| allocation.account == ZERO_ACCOUNT)
        {
            return Err(invalid("genesis allocation to the zero account"));
        }
        self.genesis_supply()?;

        Ok(())
    }

    /// Sum of all genesis allocations
    pub fn genesis_supply(&self) -> Result<u64, LedgerError> {
        self.genesis_allocations
            .iter()
            .try_fold(0u64, |supply, allocation| supply.checked_add(allocation.amount))
            .ok_or_else(|| invalid("genesis allocations overflow total supply"))
    }

    pub fn from_json_str(json: &str) -> Result<Self, LedgerError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| invalid(&format!("cannot parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        info!("Loading ledger configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(|e| invalid(&format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String, LedgerError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| invalid(&format!("cannot encode configuration: {}", e)))
    }
}

fn invalid(reason: &str) -> LedgerError {
    LedgerError::InvalidConfiguration(reason.to_string())
}

// Serde helpers for lists of hex encoded accounts
mod hex_accounts {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::asset::Account;

    pub fn serialize<S: Serializer>(accounts: &[Account], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(accounts.iter().map(hex::encode))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Account>, D::Error> {
        let encoded = Vec::<String>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|value| {
                let mut account = [0u8; 32];
                hex::decode_to_slice(value, &mut account).map_err(D::Error::custom)?;
                Ok(account)
            })
            .collect()
    }
}
