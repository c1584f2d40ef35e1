//! Tessera Bonding Ledger
//!
//! Tracks collateral that owners delegate to operators and how much of it is
//! free to back new signer groups.
//!
//! # Model
//!
//! - A **delegation** binds an operator to an owner, a beneficiary and an
//!   authorizer. An operator address is delegated at most once, ever.
//! - The **unbonded value** of a delegation grows with deposits and top-ups
//!   and shrinks with withdrawals and bonds. It never goes negative.
//! - The authorizer grants two independent **authorizations**: an operator
//!   contract (which creates bonds) and a sortition pool (which draws the
//!   operator). Collateral is *available* to a contract only when both hold
//!   and the initialization period has elapsed.
//! - A **bond** locks part of the unbonded value for a holder, keyed by a
//!   reference id.
//!
//! Withdrawals go to the beneficiary and are blocked for a lock period after
//! delegation.

mod address;
mod authorization;
mod bond;
pub mod clock;
mod config;
mod delegation;
mod error;
mod event;
mod ledger;
pub mod token;

pub use address::{Address, AddressParseError, ADDRESS_LEN};
pub use authorization::{Authorizations, Relation};
pub use bond::{BondBook, BondKey};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BondingConfig, TOKEN};
pub use delegation::{Delegation, DelegationInfo};
pub use error::{Error, Result};
pub use event::LedgerEvent;
pub use ledger::BondingLedger;
pub use token::{CollateralToken, InMemoryToken, TransferError};

/// Collateral amount in base units.
pub type Amount = u128;
