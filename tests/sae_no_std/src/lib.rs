//! Builds `sae` without `std` and exercises the allocation-free API.

#![no_std]

use sae::{rand_core::CryptoRngCore, MacAddress, Result, Session, CONFIRM_LEN};

/// Largest P-256 Commit without an anti-clogging token.
pub const P256_COMMIT_LEN: usize = 2 + 32 + 64;

/// Run the initiator side of a P-256 exchange up to the first Confirm.
pub fn initiate(
    own: &MacAddress,
    peer: &MacAddress,
    password: &[u8],
    peer_commit: &[u8],
    commit: &mut [u8; P256_COMMIT_LEN],
    rng: &mut impl CryptoRngCore,
) -> Result<[u8; CONFIRM_LEN]> {
    let mut session = Session::new();
    session.set_group(19)?;
    session.prepare_commit(own, peer, password, rng)?;
    session.write_commit(None, commit)?;
    session.parse_commit(peer_commit, None)?;
    session.process_commit()?;
    session.write_confirm()
}
