//! Shared harness for the end-to-end scenarios under `tests/`.
//!
//! Every operator gets its own owner, beneficiary and authorizer, derived
//! from the operator address, so role checks are exercised for real.

use std::sync::Arc;

use tessera_bonding::{Address, Amount, BondingConfig, BondingLedger, InMemoryToken, ManualClock};
use tessera_factory::{
    ConfigError, FactoryConfig, FixedStake, GroupFactory, GroupRequest, ScriptedBeacon,
};
use tessera_sortition::{Membership, Seed};

pub type TestFactory = GroupFactory<InMemoryToken, ScriptedBeacon, FixedStake>;

pub const MIN_DELEGATION: Amount = 1_000;
pub const MIN_STAKE: Amount = 100;
pub const INIT_PERIOD: u64 = 600;
pub const LOCK_PERIOD: u64 = 3_600;
pub const BEACON_FEE: Amount = 13;
pub const START: u64 = 1_700_000_000;

pub fn addr(n: u64) -> Address {
    Address::from_low_u64(n)
}

pub fn factory_address() -> Address {
    Address::derive("test/factory", &[])
}

pub fn beacon_address() -> Address {
    Address::derive("test/beacon", &[])
}

pub fn application(n: u64) -> Address {
    Address::derive("test/application", &[n.to_be_bytes().as_slice()])
}

pub fn owner_of(operator: &Address) -> Address {
    Address::derive("test/owner", &[operator.as_bytes()])
}

pub fn beneficiary_of(operator: &Address) -> Address {
    Address::derive("test/beneficiary", &[operator.as_bytes()])
}

pub fn authorizer_of(operator: &Address) -> Address {
    Address::derive("test/authorizer", &[operator.as_bytes()])
}

pub struct Harness {
    pub factory: TestFactory,
    pub clock: ManualClock,
}

impl Harness {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_seed(Seed::from_u64(0x5eed))
    }

    pub fn with_seed(seed: Seed) -> Result<Self, ConfigError> {
        let clock = ManualClock::new(START);
        let bonding = BondingConfig::default()
            .with_minimum_delegation_deposit(MIN_DELEGATION)
            .with_initialization_period(INIT_PERIOD)
            .with_delegation_lock_period(LOCK_PERIOD);
        let ledger = BondingLedger::new(bonding, InMemoryToken::new(), Arc::new(clock.clone()));
        let config = FactoryConfig::default()
            .with_address(factory_address())
            .with_minimum_stake(MIN_STAKE)
            .with_initial_seed(seed);
        let factory = GroupFactory::new(
            config,
            ledger,
            ScriptedBeacon::new(beacon_address(), BEACON_FEE),
            FixedStake::new(MIN_STAKE),
        )?;
        Ok(Self { factory, clock })
    }

    /// Mint `value` to the operator's owner and delegate it.
    pub fn delegate(&mut self, operator: Address, value: Amount) -> tessera_bonding::Result<()> {
        let owner = owner_of(&operator);
        let ledger = self.factory.ledger_mut();
        ledger.token_mut().mint(owner, value);
        ledger.delegate(
            owner,
            operator,
            beneficiary_of(&operator),
            authorizer_of(&operator),
            value,
        )
    }

    /// Authorize the factory and the application's pool for `operator`.
    pub fn authorize(
        &mut self,
        operator: Address,
        application: Address,
    ) -> tessera_bonding::Result<()> {
        let factory = self.factory.address();
        let pool = self.factory.pool_address_for(&application);
        let authorizer = authorizer_of(&operator);
        let ledger = self.factory.ledger_mut();
        ledger.authorize_operator_contract(authorizer, operator, factory)?;
        ledger.authorize_sortition_pool_contract(authorizer, operator, pool)
    }

    pub fn onboard(
        &mut self,
        operator: Address,
        value: Amount,
        application: Address,
    ) -> tessera_bonding::Result<()> {
        self.delegate(operator, value)?;
        self.authorize(operator, application)
    }

    /// Let the initialization period elapse.
    pub fn initialize(&self) {
        self.clock.advance(INIT_PERIOD);
    }

    pub fn register(
        &mut self,
        operator: Address,
        application: Address,
    ) -> tessera_factory::Result<Membership> {
        self.factory.register_member_candidate(operator, application)
    }

    /// `n` operators numbered from `first`, onboarded with `value` each,
    /// initialized and registered for `application`.
    pub fn ready_pool(
        &mut self,
        application: Address,
        first: u64,
        n: u64,
        value: Amount,
    ) -> tessera_factory::Result<Vec<Address>> {
        let operators: Vec<Address> = (first..first + n).map(addr).collect();
        for op in &operators {
            self.onboard(*op, value, application)?;
        }
        self.initialize();
        for op in &operators {
            self.register(*op, application)?;
        }
        Ok(operators)
    }

    pub fn open(
        &mut self,
        application: Address,
        group_size: usize,
        total_bond: Amount,
    ) -> tessera_factory::Result<Address> {
        let request = GroupRequest::new(group_size, group_size, addr(0xabc), total_bond);
        self.factory.open_group(application, request, BEACON_FEE)
    }
}
