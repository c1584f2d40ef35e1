//! Tessera Sortition Pools
//!
//! Per-application weighted operator pools with deterministic, seeded group
//! draws.
//!
//! # Weights
//!
//! An operator's weight is the number of whole minimum-stake units in the
//! collateral it has made available to the group factory:
//!
//! ```text
//! weight = floor(available / minimum_stake)    (clamped to u32::MAX)
//! ```
//!
//! Zero weight is never stored: an operator below one unit is not eligible.
//!
//! # Isolation
//!
//! Each application owns an independent pool in the [`PoolRegistry`] arena.
//! Registering for application A never makes an operator visible to B.
//!
//! # Draws
//!
//! Draws sample without replacement over a Fenwick tree: O(log n) per pick,
//! O(k log n) per group after an O(n) copy of the tree.

mod error;
mod pool;
mod registry;
mod seed;
mod tree;

pub use error::{Error, Result};
pub use pool::{weight_for, Membership, PoolId, SortitionPool, MAX_WEIGHT};
pub use registry::{signer_pool_address, PoolRegistry};
pub use seed::Seed;
pub use tree::WeightTree;
