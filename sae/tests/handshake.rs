//! Full Commit/Confirm exchanges between two sessions.

#![cfg(all(feature = "alloc", feature = "getrandom"))]

use sae::{rand_core::OsRng, Error, MacAddress, Session, State, StatusCode, CONFIRM_LEN};

const STA: MacAddress = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
const AP: MacAddress = [0x02, 0x00, 0x00, 0x00, 0x00, 0x02];
const ALLOWED_GROUPS: &[u16] = &[1, 2, 5, 14, 19, 20, 21];

fn start(group: u16, own: &MacAddress, peer: &MacAddress, password: &[u8]) -> Session {
    let mut session = Session::new();
    session.set_group(group).unwrap();
    session
        .prepare_commit(own, peer, password, &mut OsRng)
        .unwrap();
    session.set_state(State::Committed);
    session
}

fn allow_list(group: u16) -> Option<&'static [u16]> {
    if group <= 18 {
        Some(ALLOWED_GROUPS)
    } else {
        None
    }
}

/// Exchange commits and derive keys on both sides.
fn exchange_commits(group: u16, password_a: &[u8], password_b: &[u8]) -> (Session, Session) {
    let mut a = start(group, &STA, &AP, password_a);
    let mut b = start(group, &AP, &STA, password_b);

    let commit_a = a.commit_to_vec(None).unwrap();
    let commit_b = b.commit_to_vec(None).unwrap();
    assert_eq!(a.parse_commit(&commit_b, allow_list(group)), Ok(None));
    assert_eq!(b.parse_commit(&commit_a, allow_list(group)), Ok(None));

    a.process_commit().unwrap();
    b.process_commit().unwrap();
    a.set_state(State::Confirmed);
    b.set_state(State::Confirmed);
    (a, b)
}

fn handshake(group: u16) {
    let (mut a, mut b) = exchange_commits(group, b"correct horse", b"correct horse");

    let confirm_a = a.write_confirm().unwrap();
    let confirm_b = b.write_confirm().unwrap();
    assert_eq!(confirm_a.len(), CONFIRM_LEN);
    assert_eq!(b.check_confirm(&confirm_a), Ok(()));
    assert_eq!(a.check_confirm(&confirm_b), Ok(()));
    a.set_state(State::Accepted);
    b.set_state(State::Accepted);

    assert!(a.pmk().is_some());
    assert_eq!(a.pmk(), b.pmk());
    assert_eq!(a.pmkid(), b.pmkid());
    assert_eq!(a.kck(), b.kck());
    assert_eq!(a.own_commit_scalar(), b.peer_commit_scalar());
    assert_eq!(a.own_commit_element(), b.peer_commit_element());
}

#[test]
fn p256() {
    handshake(19);
}

#[test]
fn p384() {
    handshake(20);
}

#[test]
fn p521() {
    handshake(21);
}

#[test]
fn modp_768() {
    handshake(1);
}

#[test]
fn modp_1536() {
    handshake(5);
}

#[test]
fn password_mismatch() {
    let (mut a, b) = exchange_commits(19, b"correct horse", b"battery staple");
    assert_ne!(a.pmk(), b.pmk());
    let confirm = a.write_confirm().unwrap();
    let err = b.check_confirm(&confirm).unwrap_err();
    assert_eq!(err, Error::ConfirmMismatch);
    assert_eq!(err.status_code(), StatusCode::UnspecifiedFailure);
}

#[test]
fn confirm_bit_flip() {
    let (mut a, b) = exchange_commits(19, b"pw", b"pw");
    let confirm = a.write_confirm().unwrap();
    for byte in 0..CONFIRM_LEN {
        let mut tampered = confirm;
        tampered[byte] ^= 0x01;
        assert_eq!(b.check_confirm(&tampered), Err(Error::ConfirmMismatch));
    }
    assert_eq!(b.check_confirm(&confirm), Ok(()));
}

#[test]
fn replayed_commit_after_accept() {
    let mut a = start(19, &STA, &AP, b"pw");
    let mut b = start(19, &AP, &STA, b"pw");
    let commit_a = a.commit_to_vec(None).unwrap();
    let commit_b = b.commit_to_vec(None).unwrap();
    b.parse_commit(&commit_a, None).unwrap();
    a.parse_commit(&commit_b, None).unwrap();
    a.process_commit().unwrap();
    b.process_commit().unwrap();
    b.check_confirm(&a.write_confirm().unwrap()).unwrap();
    b.set_state(State::Accepted);

    assert_eq!(b.parse_commit(&commit_a, None), Err(Error::ReusedPeerScalar));
    assert!(b.pmk().is_some());
}

#[test]
fn zero_peer_scalar() {
    let a = start(19, &STA, &AP, b"pw");
    let mut b = start(19, &AP, &STA, b"pw");
    let mut commit = a.commit_to_vec(None).unwrap();
    commit[2..34].fill(0);
    let err = b.parse_commit(&commit, None).unwrap_err();
    assert_eq!(err, Error::InvalidPeerScalar);
    assert!(b.peer_commit_scalar().is_none());
}

#[test]
fn peer_element_off_curve() {
    let a = start(19, &STA, &AP, b"pw");
    let mut b = start(19, &AP, &STA, b"pw");
    let mut commit = a.commit_to_vec(None).unwrap();
    let last = commit.len() - 1;
    commit[last] ^= 0x01;

    b.parse_commit(&commit, None).unwrap();
    assert_eq!(b.process_commit(), Err(Error::InvalidPeerElement));
    assert!(b.pmk().is_none());
}

#[test]
fn anti_clogging_token_passthrough() {
    let a = start(19, &STA, &AP, b"pw");
    let mut b = start(19, &AP, &STA, b"pw");
    let token = [0x5a; 32];
    let commit = a.commit_to_vec(Some(&token[..])).unwrap();
    assert_eq!(commit.len(), 2 + 32 + 32 + 64);
    assert_eq!(b.parse_commit(&commit, None), Ok(Some(&token[..])));
    b.process_commit().unwrap();
}

#[test]
fn responder_follows_peer_group() {
    let a = start(20, &STA, &AP, b"pw");
    let commit = a.commit_to_vec(None).unwrap();

    let mut b = Session::new();
    b.set_group(19).unwrap();
    assert_eq!(b.parse_commit(&commit, None), Ok(None));
    assert_eq!(b.group_id(), Some(20));
    assert_eq!(b.prime_len(), Some(48));

    b.prepare_commit(&AP, &STA, b"pw", &mut OsRng).unwrap();
    b.process_commit().unwrap();
}
