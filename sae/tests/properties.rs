//! Property tests.

#![cfg(all(feature = "alloc", feature = "getrandom"))]

use proptest::prelude::*;
use sae::{
    group::GroupContext,
    pwe::derive_pwe,
    rand_core::OsRng,
    scalar::{random_scalar, Uint},
    Group, MacAddress, Session, State,
};

#[test]
fn random_scalar_bounds_p256() {
    let group = GroupContext::new(Group::from_id(19).unwrap()).unwrap();
    let upper = group.order().wrapping_sub(&Uint::ONE);
    for _ in 0..10_000 {
        let x = random_scalar(group.order(), &mut OsRng).unwrap();
        assert!(*x > Uint::ONE);
        assert!(*x < upper);
    }
}

proptest! {
    #[test]
    fn random_scalar_bounds(order in 16u64..) {
        let order = Uint::from_u64(order);
        let x = random_scalar(&order, &mut OsRng).unwrap();
        prop_assert!(*x >= Uint::from_u8(2));
        prop_assert!(*x <= order.wrapping_sub(&Uint::from_u8(2)));
    }

    #[test]
    fn pwe_is_deterministic(
        addr1 in any::<MacAddress>(),
        addr2 in any::<MacAddress>(),
        password in proptest::collection::vec(any::<u8>(), 1..64),
    ) {
        let group = GroupContext::new(Group::from_id(19).unwrap()).unwrap();
        let a = derive_pwe(&group, &addr1, &addr2, &password).unwrap();
        let b = derive_pwe(&group, &addr2, &addr1, &password).unwrap();
        prop_assert_eq!(a.len(), 64);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn parse_commit_never_panics(msg in proptest::collection::vec(any::<u8>(), 0..160)) {
        let mut session = Session::new();
        session.set_group(19).unwrap();
        session.set_state(State::Committed);
        if session.parse_commit(&msg, None).is_err() {
            prop_assert!(session.peer_commit_scalar().is_none());
            prop_assert!(session.peer_commit_element().is_none());
        }
    }

    #[test]
    fn check_confirm_rejects_garbage(msg in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut a = Session::new();
        let mut b = Session::new();
        for (s, own, peer) in [(&mut a, [1u8; 6], [2u8; 6]), (&mut b, [2u8; 6], [1u8; 6])] {
            s.set_group(19).unwrap();
            s.prepare_commit(&own, &peer, b"pw", &mut OsRng).unwrap();
        }
        let commit_a = a.commit_to_vec(None).unwrap();
        b.parse_commit(&commit_a, None).unwrap();
        let commit_b = b.commit_to_vec(None).unwrap();
        a.parse_commit(&commit_b, None).unwrap();
        a.process_commit().unwrap();
        prop_assert!(a.check_confirm(&msg).is_err());
    }
}
