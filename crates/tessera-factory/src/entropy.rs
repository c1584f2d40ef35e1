//! Entropy sources for group selection seeds.

use tessera_bonding::{Address, Amount};
use tessera_sortition::Seed;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntropyError {
    #[error("entropy source unavailable")]
    Unavailable,

    #[error("entropy request failed: {0}")]
    Failed(String),
}

/// A paid source of fresh seeds.
pub trait EntropySource {
    /// Identity allowed to push seeds into the factory.
    fn address(&self) -> Address;

    /// Payment the source currently expects per request.
    fn fee_estimate(&self) -> Amount;

    /// Request a new value, forwarding `payment`.
    ///
    /// `Ok(None)` means the value is delivered later through
    /// `GroupFactory::set_group_selection_seed`. An error means the source
    /// took none of `payment`.
    fn request_entropy(&mut self, payment: Amount) -> Result<Option<Seed>, EntropyError>;
}

/// Deterministic local beacon: each entry hashes the previous one.
/// Underpaid requests are refused.
#[derive(Debug, Clone)]
pub struct HashChainBeacon {
    address: Address,
    fee: Amount,
    head: Seed,
    requests: u64,
    balance: Amount,
}

impl HashChainBeacon {
    pub fn new(address: Address, fee: Amount, genesis: Seed) -> Self {
        Self {
            address,
            fee,
            head: genesis,
            requests: 0,
            balance: 0,
        }
    }

    pub fn head(&self) -> Seed {
        self.head
    }

    pub fn request_count(&self) -> u64 {
        self.requests
    }

    /// Payments received so far.
    pub fn balance(&self) -> Amount {
        self.balance
    }
}

impl EntropySource for HashChainBeacon {
    fn address(&self) -> Address {
        self.address
    }

    fn fee_estimate(&self) -> Amount {
        self.fee
    }

    fn request_entropy(&mut self, payment: Amount) -> Result<Option<Seed>, EntropyError> {
        if payment < self.fee {
            return Err(EntropyError::Unavailable);
        }
        self.requests += 1;
        self.balance = self.balance.saturating_add(payment);
        let counter = self.requests.to_be_bytes();
        self.head = self.head.mix(&[b"tessera/beacon".as_slice(), &counter]);
        Ok(Some(self.head))
    }
}

/// Beacon whose next answer is set by the caller.
///
/// A zero entry is reported as pending (`Ok(None)`).
#[derive(Debug, Clone)]
pub struct ScriptedBeacon {
    address: Address,
    fee: Amount,
    entry: Seed,
    should_fail: bool,
    requests: u64,
    balance: Amount,
}

impl ScriptedBeacon {
    pub fn new(address: Address, fee: Amount) -> Self {
        Self {
            address,
            fee,
            entry: Seed::ZERO,
            should_fail: false,
            requests: 0,
            balance: 0,
        }
    }

    pub fn set_entry(&mut self, entry: Seed) {
        self.entry = entry;
    }

    pub fn set_should_fail(&mut self, should_fail: bool) {
        self.should_fail = should_fail;
    }

    pub fn set_fee(&mut self, fee: Amount) {
        self.fee = fee;
    }

    /// Successful requests so far.
    pub fn request_count(&self) -> u64 {
        self.requests
    }

    /// Payments received by successful requests.
    pub fn balance(&self) -> Amount {
        self.balance
    }
}

impl EntropySource for ScriptedBeacon {
    fn address(&self) -> Address {
        self.address
    }

    fn fee_estimate(&self) -> Amount {
        self.fee
    }

    fn request_entropy(&mut self, payment: Amount) -> Result<Option<Seed>, EntropyError> {
        if self.should_fail {
            return Err(EntropyError::Failed("request rejected".into()));
        }
        self.requests += 1;
        self.balance = self.balance.saturating_add(payment);
        if self.entry.is_zero() {
            Ok(None)
        } else {
            Ok(Some(self.entry))
        }
    }
}
