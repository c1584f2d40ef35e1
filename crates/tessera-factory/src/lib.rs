//! Tessera Group Factory
//!
//! Forms bonded signer groups for applications:
//!
//! 1. Operators register as member candidates of an application. Their pool
//!    weight is the number of whole `minimum_stake` units they have made
//!    available to the factory in the [`BondingLedger`](tessera_bonding::BondingLedger).
//! 2. `open_group` draws members from the application's pool with the current
//!    group selection seed and bonds `ceil(total_bond / group_size)` from each.
//! 3. After every successful formation the seed is replaced, either by fresh
//!    entropy or by hashing the previous seed with the factory address.
//!
//! A failed call changes nothing: no pool, no bond, no seed rotation.

mod config;
mod entropy;
mod error;
mod factory;
mod group;
mod stake;

pub use config::{
    ChainConfig, ConfigError, FactoryConfig, GROUP_FACTORY_CONTRACT, RANDOM_BEACON_CONTRACT,
};
pub use entropy::{EntropyError, EntropySource, HashChainBeacon, ScriptedBeacon};
pub use error::{Error, ErrorKind, Result};
pub use factory::{rotate_seed, GroupFactory, SeedState};
pub use group::{bond_per_member, Group, GroupCreated, GroupRequest};
pub use stake::{FixedStake, StakeRegistry, StakeTable};
