//! Error types for tessera-sortition.

use tessera_bonding::Address;
use thiserror::Error;

/// Result type for sortition operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The application has no pool, or its pool has no members.
    #[error("No signer pool for this application")]
    NoSignerPool,

    #[error("Not enough operators in pool: {available} available, {required} required")]
    NotEnoughOperators { available: usize, required: usize },

    #[error("Operator {operator} has zero weight")]
    ZeroWeight { operator: Address },
}
