//! Factory and chain configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tessera_bonding::{Address, AddressParseError, Amount, TOKEN};
use tessera_sortition::Seed;
use thiserror::Error;

/// Contract name of the group factory in [`ChainConfig`].
pub const GROUP_FACTORY_CONTRACT: &str = "GroupFactory";

/// Contract name of the entropy source in [`ChainConfig`].
pub const RANDOM_BEACON_CONTRACT: &str = "RandomBeacon";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("configuration for contract [{0}] not found")]
    ContractNotConfigured(String),

    #[error("configured address [{address}] for contract [{name}] is not valid: {source}")]
    InvalidContractAddress {
        name: String,
        address: String,
        source: AddressParseError,
    },

    #[error("minimum stake must be greater than zero")]
    ZeroMinimumStake,
}

/// Parameters of a group factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// The factory's own identity: bond creator, pool-address namespace and
    /// fallback seed input.
    pub address: Address,
    /// One unit of sortition weight, and the least stake a candidate needs.
    pub minimum_stake: Amount,
    pub initial_seed: Seed,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            address: Address::derive("tessera/factory", &[]),
            minimum_stake: TOKEN,
            initial_seed: Seed::ZERO,
        }
    }
}

impl FactoryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minimum_stake == 0 {
            return Err(ConfigError::ZeroMinimumStake);
        }
        Ok(())
    }

    #[must_use]
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    #[must_use]
    pub fn with_minimum_stake(mut self, minimum_stake: Amount) -> Self {
        self.minimum_stake = minimum_stake;
        self
    }

    #[must_use]
    pub fn with_initial_seed(mut self, seed: Seed) -> Self {
        self.initial_seed = seed;
        self
    }
}

/// Named contract addresses of a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Contract name → hex address.
    #[serde(default)]
    pub contract_addresses: HashMap<String, String>,
}

impl ChainConfig {
    /// Resolve a contract's configured address.
    pub fn contract_address(&self, name: &str) -> Result<Address, ConfigError> {
        let address = self
            .contract_addresses
            .get(name)
            .ok_or_else(|| ConfigError::ContractNotConfigured(name.to_string()))?;

        address
            .parse()
            .map_err(|source| ConfigError::InvalidContractAddress {
                name: name.to_string(),
                address: address.clone(),
                source,
            })
    }
}
