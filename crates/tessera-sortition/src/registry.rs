//! Application → pool registry.

use std::collections::HashMap;

use tessera_bonding::Address;
use tracing::info;

use crate::error::{Error, Result};
use crate::pool::{PoolId, SortitionPool};
use crate::seed::Seed;

/// Address of the signer pool `factory` creates for `application`.
///
/// Known before the pool exists, so authorizers can authorize it up front.
pub fn signer_pool_address(factory: &Address, application: &Address) -> Address {
    Address::derive("tessera/signer-pool", &[factory.as_bytes(), application.as_bytes()])
}

/// Arena of pools, one per application.
#[derive(Debug, Default)]
pub struct PoolRegistry {
    pools: Vec<SortitionPool>,
    by_application: HashMap<Address, PoolId>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The application's pool, creating it at `address` on first use.
    pub fn get_or_create(&mut self, application: Address, address: Address) -> &mut SortitionPool {
        let id = match self.by_application.get(&application) {
            Some(id) => *id,
            None => {
                let id = PoolId(self.pools.len() as u32);
                self.pools.push(SortitionPool::new(id, address, application));
                self.by_application.insert(application, id);
                info!(%application, pool = %address, id = id.0, "Signer pool created");
                id
            }
        };
        &mut self.pools[id.0 as usize]
    }

    pub fn pool(&self, id: PoolId) -> Option<&SortitionPool> {
        self.pools.get(id.0 as usize)
    }

    pub fn pool_for(&self, application: &Address) -> Option<&SortitionPool> {
        self.by_application
            .get(application)
            .and_then(|id| self.pool(*id))
    }

    /// Address of the application's pool, if one was created.
    pub fn signer_pool(&self, application: &Address) -> Option<Address> {
        self.pool_for(application).map(SortitionPool::address)
    }

    /// Draw from the application's pool.
    pub fn select_group(
        &self,
        application: &Address,
        group_size: usize,
        seed: &Seed,
    ) -> Result<Vec<Address>> {
        self.pool_for(application)
            .ok_or(Error::NoSignerPool)?
            .select_group(group_size, seed)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortitionPool> {
        self.pools.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    #[test]
    fn pools_are_created_lazily_and_reused() {
        let factory = addr(100);
        let app = addr(1);
        let mut registry = PoolRegistry::new();
        assert_eq!(registry.signer_pool(&app), None);

        let address = signer_pool_address(&factory, &app);
        registry.get_or_create(app, address).insert_or_update(addr(10), 1).unwrap();
        registry.get_or_create(app, address).insert_or_update(addr(11), 1).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.signer_pool(&app), Some(address));
        assert_eq!(registry.pool_for(&app).unwrap().operator_count(), 2);
    }

    #[test]
    fn applications_get_independent_pools() {
        let factory = addr(100);
        let (app1, app2) = (addr(1), addr(2));
        let mut registry = PoolRegistry::new();

        registry
            .get_or_create(app1, signer_pool_address(&factory, &app1))
            .insert_or_update(addr(10), 1)
            .unwrap();
        registry
            .get_or_create(app2, signer_pool_address(&factory, &app2))
            .insert_or_update(addr(11), 1)
            .unwrap();

        let pool1 = registry.pool_for(&app1).unwrap();
        let pool2 = registry.pool_for(&app2).unwrap();
        assert_ne!(pool1.address(), pool2.address());
        assert!(pool1.is_operator_in_pool(&addr(10)));
        assert!(!pool1.is_operator_in_pool(&addr(11)));
        assert!(!pool2.is_operator_in_pool(&addr(10)));
        assert!(pool2.is_operator_in_pool(&addr(11)));
    }

    #[test]
    fn select_from_unknown_application() {
        let registry = PoolRegistry::new();
        assert_eq!(
            registry.select_group(&addr(1), 3, &Seed::from_u64(1)),
            Err(Error::NoSignerPool)
        );
    }

    #[test]
    fn pool_address_depends_on_factory_and_application() {
        let a = signer_pool_address(&addr(100), &addr(1));
        assert_eq!(a, signer_pool_address(&addr(100), &addr(1)));
        assert_ne!(a, signer_pool_address(&addr(101), &addr(1)));
        assert_ne!(a, signer_pool_address(&addr(100), &addr(2)));
    }
}
