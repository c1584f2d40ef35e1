//! Error types for tessera-bonding.

use thiserror::Error;

use crate::token::TransferError;
use crate::{Address, Amount};

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a ledger operation is rejected. A rejected operation leaves the
/// ledger untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid operator address")]
    InvalidOperator,

    #[error("Beneficiary not defined for the operator")]
    BeneficiaryNotDefined,

    #[error("Invalid authorizer address")]
    InvalidAuthorizer,

    #[error("Insufficient delegation value: {value} < {minimum}")]
    InsufficientDelegationValue { value: Amount, minimum: Amount },

    #[error("Operator already in use")]
    OperatorInUse,

    #[error("Value must be greater than zero")]
    ZeroValue,

    #[error("Only delegation owner can top up")]
    NotOwner,

    #[error("Only operator can deposit")]
    NotOperator,

    #[error("Only operator or the owner is allowed to withdraw bond")]
    WithdrawNotAllowed,

    #[error("Delegation lock period has not passed yet")]
    LockPeriodNotPassed { unlocks_at: u64 },

    #[error("Insufficient unbonded value: available {available}, requested {requested}")]
    InsufficientUnbondedValue { available: Amount, requested: Amount },

    #[error("Not authorized")]
    NotAuthorizer { operator: Address },

    #[error("Operator contract is not approved")]
    ContractNotApproved { contract: Address },

    #[error("Reference ID not unique for holder and operator")]
    DuplicateBond,

    #[error("Collateral transfer failed: {0}")]
    Transfer(#[from] TransferError),
}

impl Error {
    /// Temporal rejections clear on their own with time; all others need a
    /// different request.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Error::LockPeriodNotPassed { .. })
    }
}
