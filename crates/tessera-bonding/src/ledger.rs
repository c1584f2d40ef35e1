//! The bonding ledger.
//!
//! Every mutating call validates completely before it touches state, so an
//! `Err` always means nothing changed. Collateral transfers happen before the
//! balance update they back; a failed transfer aborts the call.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::authorization::Authorizations;
use crate::bond::{BondBook, BondKey};
use crate::clock::Clock;
use crate::config::BondingConfig;
use crate::delegation::{Delegation, DelegationInfo};
use crate::error::{Error, Result};
use crate::event::LedgerEvent;
use crate::token::CollateralToken;
use crate::{Address, Amount};

/// Delegations, authorizations and bonds over a collateral token.
pub struct BondingLedger<T> {
    config: BondingConfig,
    token: T,
    clock: Arc<dyn Clock>,
    delegations: HashMap<Address, Delegation>,
    authorizations: Authorizations,
    bonds: BondBook,
    events: Vec<LedgerEvent>,
}

impl<T: CollateralToken> BondingLedger<T> {
    pub fn new(config: BondingConfig, token: T, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            token,
            clock,
            delegations: HashMap::new(),
            authorizations: Authorizations::new(),
            bonds: BondBook::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &BondingConfig {
        &self.config
    }

    pub fn token(&self) -> &T {
        &self.token
    }

    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    // --- Delegation ---

    /// Delegate `value` of the caller's collateral to `operator`.
    pub fn delegate(
        &mut self,
        owner: Address,
        operator: Address,
        beneficiary: Address,
        authorizer: Address,
        value: Amount,
    ) -> Result<()> {
        if operator.is_zero() {
            return Err(Error::InvalidOperator);
        }
        if beneficiary.is_zero() {
            return Err(Error::BeneficiaryNotDefined);
        }
        if authorizer.is_zero() {
            return Err(Error::InvalidAuthorizer);
        }
        if value < self.config.minimum_delegation_deposit {
            return Err(Error::InsufficientDelegationValue {
                value,
                minimum: self.config.minimum_delegation_deposit,
            });
        }
        if self.delegations.contains_key(&operator) {
            return Err(Error::OperatorInUse);
        }

        self.token.transfer_in(owner, value)?;

        let created_at = self.clock.now();
        self.delegations.insert(
            operator,
            Delegation::new(owner, operator, beneficiary, authorizer, created_at, value),
        );
        self.events.push(LedgerEvent::Delegated { owner, operator });
        self.events.push(LedgerEvent::OperatorDelegated {
            operator,
            beneficiary,
            authorizer,
            value,
        });

        info!(%operator, %owner, value, created_at, "Operator delegated");
        Ok(())
    }

    /// Owner adds collateral to an existing delegation.
    pub fn top_up(&mut self, caller: Address, operator: Address, value: Amount) -> Result<()> {
        let delegation = self.delegation(&operator)?;
        if caller != delegation.owner {
            return Err(Error::NotOwner);
        }
        if value == 0 {
            return Err(Error::ZeroValue);
        }

        self.token.transfer_in(caller, value)?;
        self.credit(&operator, value);
        self.events
            .push(LedgerEvent::OperatorToppedUp { operator, value });

        info!(%operator, value, "Operator topped up");
        Ok(())
    }

    /// Operator adds collateral to its own delegation.
    pub fn deposit(&mut self, caller: Address, operator: Address, value: Amount) -> Result<()> {
        let delegation = self.delegation(&operator)?;
        if caller != operator {
            return Err(Error::NotOperator);
        }
        if value == 0 {
            return Err(Error::ZeroValue);
        }
        let beneficiary = delegation.beneficiary;

        self.token.transfer_in(caller, value)?;
        self.credit(&operator, value);
        self.events.push(LedgerEvent::UnbondedValueDeposited {
            operator,
            beneficiary,
            amount: value,
        });

        info!(%operator, value, "Unbonded value deposited");
        Ok(())
    }

    /// Move `amount` of unbonded value to the operator's beneficiary.
    pub fn withdraw(&mut self, caller: Address, amount: Amount, operator: Address) -> Result<()> {
        let now = self.clock.now();
        let lock_period = self.config.delegation_lock_period;
        let delegation = self.delegation(&operator)?;

        if caller != operator && caller != delegation.owner {
            return Err(Error::WithdrawNotAllowed);
        }
        if delegation.age(now) < lock_period {
            return Err(Error::LockPeriodNotPassed {
                unlocks_at: delegation.created_at.saturating_add(lock_period),
            });
        }
        if amount > delegation.unbonded_value {
            return Err(Error::InsufficientUnbondedValue {
                available: delegation.unbonded_value,
                requested: amount,
            });
        }
        let beneficiary = delegation.beneficiary;

        self.token.transfer_out(beneficiary, amount)?;
        self.debit(&operator, amount);
        self.events.push(LedgerEvent::UnbondedValueWithdrawn {
            operator,
            beneficiary,
            amount,
        });

        info!(%operator, %beneficiary, amount, "Unbonded value withdrawn");
        Ok(())
    }

    // --- Authorization ---

    /// Approve an operator contract in the registry, making it eligible for
    /// authorization by any authorizer.
    pub fn approve_operator_contract(&mut self, contract: Address) {
        if self.authorizations.approve_contract(contract) {
            info!(%contract, "Operator contract approved");
        }
    }

    pub fn is_approved_operator_contract(&self, contract: &Address) -> bool {
        self.authorizations.is_approved(contract)
    }

    pub fn authorize_operator_contract(
        &mut self,
        caller: Address,
        operator: Address,
        contract: Address,
    ) -> Result<()> {
        self.require_authorizer(caller, &operator)?;
        if !self.authorizations.is_approved(&contract) {
            return Err(Error::ContractNotApproved { contract });
        }
        if self
            .authorizations
            .operator_contracts_mut()
            .grant(operator, contract)
        {
            info!(%operator, %contract, "Operator contract authorized");
        }
        Ok(())
    }

    pub fn authorize_sortition_pool_contract(
        &mut self,
        caller: Address,
        operator: Address,
        pool: Address,
    ) -> Result<()> {
        self.require_authorizer(caller, &operator)?;
        if self
            .authorizations
            .sortition_pools_mut()
            .grant(operator, pool)
        {
            info!(%operator, %pool, "Sortition pool authorized");
        }
        Ok(())
    }

    pub fn is_authorized_for(&self, operator: &Address, contract: &Address) -> bool {
        self.authorizations
            .operator_contracts()
            .holds(operator, contract)
    }

    pub fn has_authorized_pool(&self, operator: &Address, pool: &Address) -> bool {
        self.authorizations.sortition_pools().holds(operator, pool)
    }

    /// Contract authorized and initialization period elapsed.
    pub fn is_initialized(&self, operator: &Address, contract: &Address) -> bool {
        let Some(delegation) = self.delegations.get(operator) else {
            return false;
        };
        self.is_authorized_for(operator, contract)
            && delegation.age(self.clock.now()) >= self.config.initialization_period
    }

    /// Unbonded value usable by `contract` for bonds drawn through `pool`.
    /// Zero when the operator is not eligible.
    pub fn available_unbonded_value(
        &self,
        operator: &Address,
        contract: &Address,
        pool: &Address,
    ) -> Amount {
        if !self.has_authorized_pool(operator, pool) || !self.is_initialized(operator, contract)
        {
            return 0;
        }
        self.unbonded_value(operator)
    }

    // --- Bonds ---

    /// Lock `amount` of the operator's available value for `holder`.
    ///
    /// `creator` is the calling operator contract; availability is evaluated
    /// for it and for `authorized_pool`.
    pub fn create_bond(
        &mut self,
        creator: Address,
        operator: Address,
        holder: Address,
        reference_id: Address,
        amount: Amount,
        authorized_pool: Address,
    ) -> Result<()> {
        let available = self.available_unbonded_value(&operator, &creator, &authorized_pool);
        if amount > available {
            return Err(Error::InsufficientUnbondedValue {
                available,
                requested: amount,
            });
        }
        let key = BondKey::new(operator, holder, reference_id);
        if self.bonds.contains(&key) {
            return Err(Error::DuplicateBond);
        }

        self.debit(&operator, amount);
        self.bonds.insert(key, amount);
        self.events.push(LedgerEvent::BondCreated {
            operator,
            holder,
            sortition_pool: authorized_pool,
            reference_id,
            amount,
        });

        info!(%operator, %holder, %reference_id, amount, "Bond created");
        Ok(())
    }

    pub fn bond_amount(&self, operator: &Address, holder: &Address, reference_id: &Address) -> Amount {
        self.bonds
            .amount(&BondKey::new(*operator, *holder, *reference_id))
    }

    /// Total amount the operator has locked across bonds.
    pub fn locked_value(&self, operator: &Address) -> Amount {
        self.bonds.locked_by(operator)
    }

    // --- Queries ---

    pub fn unbonded_value(&self, operator: &Address) -> Amount {
        self.delegations
            .get(operator)
            .map(|d| d.unbonded_value)
            .unwrap_or(0)
    }

    pub fn owner_of(&self, operator: &Address) -> Option<Address> {
        self.delegations.get(operator).map(|d| d.owner)
    }

    pub fn beneficiary_of(&self, operator: &Address) -> Option<Address> {
        self.delegations.get(operator).map(|d| d.beneficiary)
    }

    pub fn authorizer_of(&self, operator: &Address) -> Option<Address> {
        self.delegations.get(operator).map(|d| d.authorizer)
    }

    pub fn get_delegation_info(&self, operator: &Address) -> Option<DelegationInfo> {
        let info = self.delegations.get(operator).map(Delegation::info);
        debug!(%operator, ?info, "Delegation info");
        info
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    // --- Internal ---

    fn delegation(&self, operator: &Address) -> Result<&Delegation> {
        self.delegations
            .get(operator)
            .ok_or(Error::BeneficiaryNotDefined)
    }

    fn require_authorizer(&self, caller: Address, operator: &Address) -> Result<()> {
        match self.delegations.get(operator) {
            Some(d) if d.authorizer == caller => Ok(()),
            _ => Err(Error::NotAuthorizer {
                operator: *operator,
            }),
        }
    }

    fn credit(&mut self, operator: &Address, value: Amount) {
        if let Some(d) = self.delegations.get_mut(operator) {
            d.unbonded_value += value;
        }
    }

    // Callers check the balance first.
    fn debit(&mut self, operator: &Address, value: Amount) {
        if let Some(d) = self.delegations.get_mut(operator) {
            d.unbonded_value -= value;
        }
    }
}
