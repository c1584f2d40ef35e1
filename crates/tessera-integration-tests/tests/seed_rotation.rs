//! Group selection seed rotation and delivery.

use tessera_factory::{rotate_seed, Error};
use tessera_integration_tests::*;
use tessera_sortition::Seed;

fn fallback(h: &Harness, previous: Seed) -> Seed {
    previous.mix(&[h.factory.address().as_bytes()])
}

#[test]
fn fresh_entropy_becomes_the_seed() {
    let mut h = Harness::new().unwrap();
    let app = application(1);
    h.ready_pool(app, 1, 3, 5 * MIN_DELEGATION).unwrap();
    let entry = Seed::from_u64(0xfeed_beef);
    h.factory.entropy_mut().set_entry(entry);

    h.open(app, 3, 300).unwrap();
    assert_eq!(h.factory.group_selection_seed(), entry);
    assert_eq!(h.factory.seed_state().version, 1);
}

#[test]
fn beacon_failure_does_not_block_formation() {
    let mut h = Harness::new().unwrap();
    let app = application(1);
    h.ready_pool(app, 1, 3, 5 * MIN_DELEGATION).unwrap();
    h.factory.entropy_mut().set_should_fail(true);
    let previous = h.factory.group_selection_seed();

    let group = h.open(app, 3, 300).unwrap();
    assert!(h.factory.group(&group).is_some());
    assert_eq!(h.factory.group_selection_seed(), fallback(&h, previous));
    assert_eq!(h.factory.entropy().balance(), 0);
    assert_eq!(h.factory.retained_fees(), BEACON_FEE);
}

#[test]
fn pending_entropy_falls_back_then_is_delivered() {
    let mut h = Harness::new().unwrap();
    let app = application(1);
    h.ready_pool(app, 1, 3, 5 * MIN_DELEGATION).unwrap();
    let previous = h.factory.group_selection_seed();

    // Zero entry: the beacon answers later.
    h.open(app, 3, 300).unwrap();
    assert_eq!(h.factory.group_selection_seed(), fallback(&h, previous));

    let delivered = Seed::from_u64(99);
    h.factory
        .set_group_selection_seed(beacon_address(), delivered)
        .unwrap();
    assert_eq!(h.factory.group_selection_seed(), delivered);
    assert_eq!(h.factory.seed_state().version, 2);
}

#[test]
fn only_the_beacon_may_set_the_seed() {
    let mut h = Harness::new().unwrap();
    let seed = h.factory.group_selection_seed();
    let err = h
        .factory
        .set_group_selection_seed(addr(0xbad), Seed::from_u64(1))
        .unwrap_err();

    assert_eq!(err, Error::NotRandomBeacon { caller: addr(0xbad) });
    assert_eq!(err.to_string(), "Caller is not the random beacon");
    assert_eq!(h.factory.group_selection_seed(), seed);
}

#[test]
fn failed_formation_keeps_the_seed() {
    let mut h = Harness::new().unwrap();
    let seed = h.factory.group_selection_seed();
    assert!(h.open(application(9), 3, 300).is_err());
    assert_eq!(h.factory.group_selection_seed(), seed);
    assert_eq!(h.factory.seed_state().version, 0);
}

#[test]
fn rotation_rule() {
    let factory = factory_address();
    let previous = Seed::from_u64(5);
    assert_eq!(
        rotate_seed(&previous, &factory, Some(Seed::from_u64(6))),
        Seed::from_u64(6)
    );
    assert_eq!(
        rotate_seed(&previous, &factory, Some(Seed::ZERO)),
        previous.mix(&[factory.as_bytes()])
    );
}
