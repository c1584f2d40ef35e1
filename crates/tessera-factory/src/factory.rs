//! The group factory.
//!
//! # Formation
//!
//! ```text
//! open_group(app, request, payment)
//!   validate request and payment            (nothing changes on failure)
//!   members  = draw(pool(app), seed)
//!   check    every member covers bond_per_member
//!   bond     every member, holder = reference = group address
//!   record   group + GroupCreated at height + 1
//!   rotate   seed from entropy, or H(seed ‖ factory)
//! ```
//!
//! The seed only moves after a successful formation. The entropy call runs
//! after the group is committed, so its failure never undoes a group.

use std::collections::HashMap;
use std::ops::RangeBounds;

use tessera_bonding::{Address, Amount, BondingLedger, CollateralToken};
use tessera_sortition::{signer_pool_address, weight_for, Membership, PoolRegistry, Seed};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, FactoryConfig};
use crate::entropy::EntropySource;
use crate::error::{Error, Result};
use crate::group::{Group, GroupCreated, GroupRequest};
use crate::stake::StakeRegistry;

/// Current selection seed and how many times it has been replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedState {
    pub seed: Seed,
    pub version: u64,
}

/// Next seed after a formation.
///
/// A non-zero entropy value is taken as is; a missing or zero one falls back
/// to `H(previous ‖ factory)`.
pub fn rotate_seed(previous: &Seed, factory: &Address, entropy: Option<Seed>) -> Seed {
    match entropy {
        Some(value) if !value.is_zero() => value,
        _ => previous.mix(&[factory.as_bytes()]),
    }
}

/// Forms bonded signer groups from per-application sortition pools.
pub struct GroupFactory<T, E, S> {
    config: FactoryConfig,
    ledger: BondingLedger<T>,
    pools: PoolRegistry,
    entropy: E,
    stake: S,
    seed: SeedState,
    groups: HashMap<Address, Group>,
    events: Vec<GroupCreated>,
    height: u64,
    retained_fees: Amount,
}

impl<T, E, S> GroupFactory<T, E, S>
where
    T: CollateralToken,
    E: EntropySource,
    S: StakeRegistry,
{
    /// Build a factory over `ledger`. The factory's address is approved as an
    /// operator contract so authorizers can authorize it.
    pub fn new(
        config: FactoryConfig,
        mut ledger: BondingLedger<T>,
        entropy: E,
        stake: S,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        ledger.approve_operator_contract(config.address);

        info!(
            factory = %config.address,
            minimum_stake = config.minimum_stake,
            beacon = %entropy.address(),
            "Group factory initialized"
        );

        Ok(Self {
            seed: SeedState {
                seed: config.initial_seed,
                version: 0,
            },
            config,
            ledger,
            pools: PoolRegistry::new(),
            entropy,
            stake,
            groups: HashMap::new(),
            events: Vec::new(),
            height: 0,
            retained_fees: 0,
        })
    }

    pub fn address(&self) -> Address {
        self.config.address
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Address of the pool this factory uses for `application`, whether or
    /// not it exists yet.
    pub fn pool_address_for(&self, application: &Address) -> Address {
        signer_pool_address(&self.config.address, application)
    }

    // --- Candidates ---

    /// Add `operator` to the application's pool, or refresh its weight.
    pub fn register_member_candidate(
        &mut self,
        operator: Address,
        application: Address,
    ) -> Result<Membership> {
        let pool = self.pool_address_for(&application);
        let weight = self.eligible_weight(&operator, &pool);
        if weight == 0 {
            warn!(%operator, %application, "Operator not eligible");
            return Err(Error::OperatorNotEligible { operator });
        }

        let membership = self
            .pools
            .get_or_create(application, pool)
            .insert_or_update(operator, weight)?;

        info!(%operator, %application, weight, ?membership, "Member candidate registered");
        Ok(membership)
    }

    pub fn is_operator_registered(&self, operator: &Address, application: &Address) -> bool {
        self.pools
            .pool_for(application)
            .is_some_and(|pool| pool.is_operator_in_pool(operator))
    }

    /// Registered and its pool weight matches its current eligibility.
    pub fn is_operator_up_to_date(&self, operator: &Address, application: &Address) -> bool {
        let Some(pool) = self.pools.pool_for(application) else {
            return false;
        };
        pool.is_operator_in_pool(operator)
            && pool.pool_weight(operator) == self.eligible_weight(operator, &pool.address())
    }

    // --- Formation ---

    /// Payment `open_group` currently requires.
    pub fn open_group_fee_estimate(&self) -> Amount {
        self.entropy.fee_estimate()
    }

    /// Form and bond a new group for `application`; returns its address.
    pub fn open_group(
        &mut self,
        application: Address,
        request: GroupRequest,
        payment: Amount,
    ) -> Result<Address> {
        let per_member = request.validate()?;
        let required = self.open_group_fee_estimate();
        if payment < required {
            return Err(Error::InsufficientPayment {
                paid: payment,
                required,
            });
        }

        let factory = self.config.address;
        let members = self
            .pools
            .select_group(&application, request.group_size, &self.seed.seed)?;
        let pool = self.pool_address_for(&application);
        debug!(%application, seed = %self.seed.seed, ?members, "Group drawn");

        for member in &members {
            let available = self.ledger.available_unbonded_value(member, &factory, &pool);
            if available < per_member {
                warn!(%application, operator = %member, available, per_member, "Drawn member cannot cover bond");
                return Err(tessera_bonding::Error::InsufficientUnbondedValue {
                    available,
                    requested: per_member,
                }
                .into());
            }
        }

        let height = self.height + 1;
        let height_bytes = height.to_be_bytes();
        let group_address =
            Address::derive("tessera/group", &[factory.as_bytes().as_slice(), &height_bytes]);

        for member in &members {
            self.ledger
                .create_bond(factory, *member, group_address, group_address, per_member, pool)?;
        }

        self.height = height;
        self.groups.insert(
            group_address,
            Group {
                address: group_address,
                application,
                owner: request.owner,
                members: members.clone(),
                threshold: request.threshold,
                bond_per_member: per_member,
                total_bond: request.total_bond,
                height,
            },
        );
        self.events.push(GroupCreated {
            height,
            group_address,
            owner: request.owner,
            members,
        });

        info!(
            group = %group_address,
            %application,
            owner = %request.owner,
            size = request.group_size,
            threshold = request.threshold,
            per_member,
            height,
            "Group created"
        );

        self.refresh_seed(payment);
        Ok(group_address)
    }

    // --- Seed ---

    pub fn group_selection_seed(&self) -> Seed {
        self.seed.seed
    }

    pub fn seed_state(&self) -> SeedState {
        self.seed
    }

    /// Replace the seed with a value delivered by the entropy source.
    pub fn set_group_selection_seed(&mut self, caller: Address, seed: Seed) -> Result<()> {
        if caller != self.entropy.address() {
            return Err(Error::NotRandomBeacon { caller });
        }
        self.replace_seed(seed);
        info!(%seed, version = self.seed.version, "Group selection seed delivered");
        Ok(())
    }

    // --- Queries ---

    /// Address of the application's pool, if any operator ever registered.
    pub fn signer_pool(&self, application: &Address) -> Option<Address> {
        self.pools.signer_pool(application)
    }

    pub fn group(&self, address: &Address) -> Option<&Group> {
        self.groups.get(address)
    }

    /// `GroupCreated` events whose formation height falls in `heights`.
    pub fn group_created_events<R>(&self, heights: R) -> impl Iterator<Item = &GroupCreated>
    where
        R: RangeBounds<u64>,
    {
        self.events
            .iter()
            .filter(move |e| heights.contains(&e.height))
    }

    /// Successful formations so far.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Formation payments kept by the factory because the entropy source
    /// rejected the request.
    pub fn retained_fees(&self) -> Amount {
        self.retained_fees
    }

    pub fn ledger(&self) -> &BondingLedger<T> {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut BondingLedger<T> {
        &mut self.ledger
    }

    pub fn pools(&self) -> &PoolRegistry {
        &self.pools
    }

    pub fn entropy(&self) -> &E {
        &self.entropy
    }

    pub fn entropy_mut(&mut self) -> &mut E {
        &mut self.entropy
    }

    pub fn stake(&self) -> &S {
        &self.stake
    }

    pub fn stake_mut(&mut self) -> &mut S {
        &mut self.stake
    }

    // --- Internal ---

    /// Pool weight `operator` qualifies for, zero when not eligible.
    fn eligible_weight(&self, operator: &Address, pool: &Address) -> u32 {
        let minimum = self.config.minimum_stake;
        if self.stake.stake_balance_of(operator) < minimum {
            return 0;
        }
        let available = self
            .ledger
            .available_unbonded_value(operator, &self.config.address, pool);
        weight_for(available, minimum)
    }

    fn refresh_seed(&mut self, payment: Amount) {
        let entropy = match self.entropy.request_entropy(payment) {
            Ok(value) => value,
            Err(e) => {
                self.retained_fees = self.retained_fees.saturating_add(payment);
                warn!(
                    error = %e,
                    payment,
                    retained = self.retained_fees,
                    "Entropy request failed; rotating seed locally"
                );
                None
            }
        };
        let next = rotate_seed(&self.seed.seed, &self.config.address, entropy);
        self.replace_seed(next);
        debug!(seed = %next, version = self.seed.version, "Group selection seed rotated");
    }

    fn replace_seed(&mut self, seed: Seed) {
        self.seed = SeedState {
            seed,
            version: self.seed.version + 1,
        };
    }
}
