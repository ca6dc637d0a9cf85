//! Registry configuration

use heirswitch_types::{Address, TimeoutPeriod};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Ledger account holding escrowed funds
    #[serde(default = "default_custody")]
    pub custody: Address,

    /// Timeout used when a caller does not pick one
    #[serde(default)]
    pub default_timeout: TimeoutPeriod,
}

fn default_custody() -> Address {
    Address::repeat_byte(0xc5)
}

impl RegistryConfig {
    pub fn with_custody(custody: Address) -> Self {
        Self {
            custody,
            ..Default::default()
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            custody: default_custody(),
            default_timeout: TimeoutPeriod::DEFAULT,
        }
    }
}
