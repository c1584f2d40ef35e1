//! Ledger parameters.

use serde::{Deserialize, Serialize};

use crate::Amount;

/// One whole collateral token in base units.
pub const TOKEN: Amount = 1_000_000_000_000_000_000;

/// Parameters fixed at ledger construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BondingConfig {
    /// Smallest value accepted by `delegate`.
    pub minimum_delegation_deposit: Amount,
    /// Seconds after delegation before any withdrawal.
    pub delegation_lock_period: u64,
    /// Seconds after delegation before collateral can back bonds.
    pub initialization_period: u64,
}

impl Default for BondingConfig {
    fn default() -> Self {
        Self {
            minimum_delegation_deposit: 40 * TOKEN,
            delegation_lock_period: 12 * 60 * 60,
            initialization_period: 12 * 60 * 60,
        }
    }
}

impl BondingConfig {
    #[must_use]
    pub fn with_minimum_delegation_deposit(mut self, value: Amount) -> Self {
        self.minimum_delegation_deposit = value;
        self
    }

    #[must_use]
    pub fn with_delegation_lock_period(mut self, secs: u64) -> Self {
        self.delegation_lock_period = secs;
        self
    }

    #[must_use]
    pub fn with_initialization_period(mut self, secs: u64) -> Self {
        self.initialization_period = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: BondingConfig =
            serde_json::from_str(r#"{ "initialization_period": 60 }"#).unwrap();
        assert_eq!(cfg.initialization_period, 60);
        assert_eq!(cfg.minimum_delegation_deposit, 40 * TOKEN);
        assert_eq!(cfg.delegation_lock_period, 43_200);
    }
}
