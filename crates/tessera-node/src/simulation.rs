//! Local group-formation run over an in-memory ledger.

use std::sync::Arc;

use tessera_bonding::{
    Address, Amount, BondingLedger, Clock, InMemoryToken, ManualClock, SystemClock,
};
use tessera_factory::{
    ChainConfig, ConfigError, GroupFactory, GroupRequest, HashChainBeacon, StakeTable,
    GROUP_FACTORY_CONTRACT, RANDOM_BEACON_CONTRACT,
};
use tessera_sortition::Seed;
use tracing::{info, warn};

use crate::config::NodeConfig;
use crate::error::Result;

pub type LocalFactory = GroupFactory<InMemoryToken, HashChainBeacon, StakeTable>;

/// Outcome of [`Simulation::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub registered: usize,
    pub groups: Vec<Address>,
    pub failed: usize,
    pub final_seed: Seed,
}

/// A factory with delegated operators and a clock the node drives.
pub struct Simulation {
    config: NodeConfig,
    factory: LocalFactory,
    clock: ManualClock,
    application: Address,
    operators: Vec<Address>,
}

impl Simulation {
    pub fn new(mut config: NodeConfig) -> Result<Self> {
        if let Some(address) = configured(&config.chain, GROUP_FACTORY_CONTRACT)? {
            config.factory.address = address;
        }
        let beacon = configured(&config.chain, RANDOM_BEACON_CONTRACT)?
            .unwrap_or_else(|| Address::derive("tessera/beacon", &[]));

        let clock = ManualClock::new(SystemClock.now());
        let ledger = BondingLedger::new(
            config.bonding.clone(),
            InMemoryToken::new(),
            Arc::new(clock.clone()),
        );
        let genesis = config.factory.initial_seed.mix(&[b"tessera/genesis".as_slice()]);
        let factory = GroupFactory::new(
            config.factory.clone(),
            ledger,
            HashChainBeacon::new(beacon, config.simulation.beacon_fee, genesis),
            StakeTable::new(),
        )?;

        Ok(Self {
            application: Address::derive("tessera/application", &[factory.address().as_bytes()]),
            config,
            factory,
            clock,
            operators: Vec::new(),
        })
    }

    pub fn factory(&self) -> &LocalFactory {
        &self.factory
    }

    pub fn application(&self) -> Address {
        self.application
    }

    pub fn operators(&self) -> &[Address] {
        &self.operators
    }

    /// Delegate, authorize and stake `n` operators with 1..=3 times the
    /// minimum delegation each.
    pub fn onboard(&mut self, n: usize) -> Result<()> {
        let factory = self.factory.address();
        let pool = self.factory.pool_address_for(&self.application);
        let deposit = self.config.bonding.minimum_delegation_deposit;
        let stake = self.config.factory.minimum_stake;

        for i in 0..n {
            let index = (self.operators.len() as u64).to_be_bytes();
            let operator = Address::derive("tessera/operator", &[index.as_slice()]);
            let owner = Address::derive("tessera/owner", &[index.as_slice()]);
            let value = deposit * (i as Amount % 3 + 1);

            self.factory.stake_mut().set_balance(operator, stake);
            let ledger = self.factory.ledger_mut();
            ledger.token_mut().mint(owner, value);
            ledger.delegate(owner, operator, owner, owner, value)?;
            ledger.authorize_operator_contract(owner, operator, factory)?;
            ledger.authorize_sortition_pool_contract(owner, operator, pool)?;
            self.operators.push(operator);
        }
        Ok(())
    }

    /// Move past the initialization period.
    pub fn initialize(&self) {
        self.clock.advance(self.config.bonding.initialization_period);
    }

    /// Register every onboarded operator; ineligible ones are skipped.
    pub fn register_all(&mut self) -> usize {
        let mut registered = 0;
        for operator in &self.operators {
            match self
                .factory
                .register_member_candidate(*operator, self.application)
            {
                Ok(_) => registered += 1,
                Err(e) => warn!(%operator, error = %e, "Registration skipped"),
            }
        }
        registered
    }

    /// Onboard, initialize, register and form the configured groups.
    pub fn run(&mut self) -> Result<Report> {
        let sim = self.config.simulation.clone();
        self.onboard(sim.operators)?;
        self.initialize();
        let registered = self.register_all();
        info!(registered, application = %self.application, "Candidates registered");

        let owner = Address::derive("tessera/group-owner", &[]);
        let request = GroupRequest::new(sim.group_size, sim.threshold, owner, sim.total_bond);
        let mut groups = Vec::new();
        let mut failed = 0;
        for _ in 0..sim.groups {
            let fee = self.factory.open_group_fee_estimate();
            match self.factory.open_group(self.application, request, fee) {
                Ok(group) => groups.push(group),
                Err(e) => {
                    failed += 1;
                    warn!(error = %e, kind = ?e.kind(), "Group formation failed");
                }
            }
        }

        let report = Report {
            registered,
            groups,
            failed,
            final_seed: self.factory.group_selection_seed(),
        };
        info!(
            formed = report.groups.len(),
            failed = report.failed,
            seed = %report.final_seed,
            "Simulation finished"
        );
        Ok(report)
    }
}

fn configured(chain: &ChainConfig, name: &str) -> Result<Option<Address>> {
    match chain.contract_address(name) {
        Ok(address) => Ok(Some(address)),
        Err(ConfigError::ContractNotConfigured(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use tessera_bonding::TOKEN;

    fn small() -> NodeConfig {
        NodeConfig {
            simulation: SimulationConfig {
                operators: 6,
                groups: 4,
                ..SimulationConfig::default()
            },
            ..NodeConfig::default()
        }
    }

    #[test]
    fn default_run_forms_every_group() {
        let report = Simulation::new(small()).unwrap().run().unwrap();
        assert_eq!(report.registered, 6);
        assert_eq!(report.groups.len(), 4);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn runs_are_reproducible() {
        let mut a = Simulation::new(small()).unwrap();
        let mut b = Simulation::new(small()).unwrap();
        let ra = a.run().unwrap();
        let rb = b.run().unwrap();

        assert_eq!(ra, rb);
        for group in &ra.groups {
            assert_eq!(
                a.factory().group(group).unwrap().members,
                b.factory().group(group).unwrap().members
            );
        }
    }

    #[test]
    fn too_few_operators_fail_formation() {
        let mut config = small();
        config.simulation.operators = 2;
        let report = Simulation::new(config).unwrap().run().unwrap();
        assert_eq!(report.registered, 2);
        assert!(report.groups.is_empty());
        assert_eq!(report.failed, 4);
    }

    #[test]
    fn uses_configured_contract_addresses() {
        let mut config = small();
        let factory = Address::from_low_u64(0xfa);
        config
            .chain
            .contract_addresses
            .insert(GROUP_FACTORY_CONTRACT.into(), factory.to_hex());
        let sim = Simulation::new(config).unwrap();
        assert_eq!(sim.factory().address(), factory);

        let mut config = small();
        config
            .chain
            .contract_addresses
            .insert(RANDOM_BEACON_CONTRACT.into(), "0xnope".into());
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn bonds_come_out_of_unbonded_value() {
        let mut sim = Simulation::new(small()).unwrap();
        let report = sim.run().unwrap();
        let per_member = TOKEN;
        let group = sim.factory().group(&report.groups[0]).unwrap();
        assert_eq!(group.bond_per_member, per_member);
        for member in &group.members {
            assert!(sim.factory().ledger().locked_value(member) >= per_member);
        }
    }
}
