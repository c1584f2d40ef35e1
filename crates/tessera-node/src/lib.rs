//! Tessera node
//!
//! Wires a [`GroupFactory`](tessera_factory::GroupFactory) to an in-memory
//! ledger, a hash-chain beacon and a stake table, then drives a formation run
//! configured from the environment.

pub mod config;
pub mod error;
pub mod simulation;

pub use config::{NodeConfig, SimulationConfig};
pub use error::{Error, Result};
pub use simulation::{LocalFactory, Report, Simulation};
