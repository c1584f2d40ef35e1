//! Error types for tessera-factory.

use tessera_bonding::{Address, Amount};
use thiserror::Error;

/// Result type for factory operations.
pub type Result<T> = std::result::Result<T, Error>;

/// How a rejection should be read by callers. None are retried internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input or a caller without the required role.
    Validation,
    /// Read-only checks found too little stake, pool size or payment.
    Eligibility,
    /// A lock or initialization period has not elapsed.
    Temporal,
    /// A collateral transfer failed.
    Transfer,
}

/// Reasons a factory operation is rejected. A rejected operation leaves the
/// factory, its pools and its ledger untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Group size must be greater than zero")]
    ZeroGroupSize,

    #[error("Honest threshold must be greater than zero")]
    ZeroThreshold,

    #[error("Honest threshold must be less or equal the group size")]
    ThresholdTooLarge { threshold: usize, group_size: usize },

    #[error("Bond per member must be greater than zero")]
    ZeroBondPerMember,

    #[error("Insufficient payment for opening a new group: paid {paid}, required {required}")]
    InsufficientPayment { paid: Amount, required: Amount },

    #[error("Operator not eligible")]
    OperatorNotEligible { operator: Address },

    #[error("Caller is not the random beacon")]
    NotRandomBeacon { caller: Address },

    #[error(transparent)]
    Sortition(#[from] tessera_sortition::Error),

    #[error(transparent)]
    Bonding(#[from] tessera_bonding::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ZeroGroupSize
            | Error::ZeroThreshold
            | Error::ThresholdTooLarge { .. }
            | Error::ZeroBondPerMember
            | Error::NotRandomBeacon { .. } => ErrorKind::Validation,
            Error::InsufficientPayment { .. }
            | Error::OperatorNotEligible { .. }
            | Error::Sortition(_) => ErrorKind::Eligibility,
            Error::Bonding(e) if e.is_temporal() => ErrorKind::Temporal,
            Error::Bonding(tessera_bonding::Error::Transfer(_)) => ErrorKind::Transfer,
            Error::Bonding(tessera_bonding::Error::InsufficientUnbondedValue { .. })
            | Error::Bonding(tessera_bonding::Error::InsufficientDelegationValue { .. }) => {
                ErrorKind::Eligibility
            }
            Error::Bonding(_) => ErrorKind::Validation,
        }
    }
}
