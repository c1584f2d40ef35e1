//! Node configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tessera_bonding::{Amount, BondingConfig, TOKEN};
use tessera_factory::{ChainConfig, FactoryConfig};

use crate::error::{Error, Result};

/// Shape of the local simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Operators delegated and registered at start.
    pub operators: usize,
    /// `open_group` calls to make.
    pub groups: usize,
    pub group_size: usize,
    pub threshold: usize,
    pub total_bond: Amount,
    /// Fee charged by the local beacon per request.
    pub beacon_fee: Amount,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            operators: 10,
            groups: 3,
            group_size: 3,
            threshold: 2,
            total_bond: 3 * TOKEN,
            beacon_fee: TOKEN / 100,
        }
    }
}

/// Everything a node needs, as read from `TESSERA_CONFIG`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub bonding: BondingConfig,
    pub factory: FactoryConfig,
    pub chain: ChainConfig,
    pub simulation: SimulationConfig,
}

impl NodeConfig {
    /// Load from the environment.
    ///
    /// - `TESSERA_CONFIG`: JSON file; defaults when unset
    /// - `TESSERA_OPERATORS`, `TESSERA_GROUPS`: override the simulation size
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("TESSERA_CONFIG") {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };

        if let Some(n) = env_usize("TESSERA_OPERATORS")? {
            config.simulation.operators = n;
        }
        if let Some(n) = env_usize("TESSERA_GROUPS")? {
            config.simulation.groups = n;
        }

        config.factory.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: PathBuf::from(path),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| Error::ParseConfig {
            path: PathBuf::from(path),
            source,
        })
    }
}

fn env_usize(name: &'static str) -> Result<Option<usize>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidEnv { name, value }),
        Err(_) => Ok(None),
    }
}
