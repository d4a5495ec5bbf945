//! Confirm message construction and verification.
//!
//! ```text
//! Send-Confirm (2, LE) ‖ HMAC-SHA-256(KCK, send-confirm ‖ scalar1 ‖ element1 ‖ scalar2 ‖ element2)
//! ```

use crate::{
    group::GroupContext,
    kdf::{hmac_sha256, SHA256_MAC_LEN},
    scalar::{self, Uint},
    session::Session,
    Error, Result, MAX_PRIME_LEN,
};
use subtle::ConstantTimeEq;

/// Length of a Confirm message.
pub const CONFIRM_LEN: usize = 2 + SHA256_MAC_LEN;

/// One side's commit values in the order they enter the MAC.
struct CommitValues<'a> {
    scalar: &'a Uint,
    element: &'a [u8],
}

fn confirm_mac(
    group: &GroupContext,
    kck: &[u8],
    send_confirm: u16,
    first: CommitValues<'_>,
    second: CommitValues<'_>,
) -> Result<[u8; SHA256_MAC_LEN]> {
    let len = group.prime_len();
    let mut scalar1 = [0u8; MAX_PRIME_LEN];
    let mut scalar2 = [0u8; MAX_PRIME_LEN];
    scalar::encode(first.scalar, &mut scalar1[..len]);
    scalar::encode(second.scalar, &mut scalar2[..len]);

    hmac_sha256(
        kck,
        &[
            &send_confirm.to_le_bytes(),
            &scalar1[..len],
            first.element,
            &scalar2[..len],
            second.element,
        ],
    )
}

impl Session {
    /// Current send-confirm counter.
    pub fn send_confirm(&self) -> u16 {
        self.send_confirm
    }

    /// Build the own Confirm and advance the send-confirm counter.
    pub fn write_confirm(&mut self) -> Result<[u8; CONFIRM_LEN]> {
        let group = self.context()?;
        let kck = self.keys.as_ref().ok_or(Error::MissingKeys)?.kck();
        let (own, peer) = self.commit_values()?;

        let send_confirm = self.send_confirm;
        let next = send_confirm
            .checked_add(1)
            .ok_or(Error::SendConfirmExhausted)?;
        let mac = confirm_mac(group, kck, send_confirm, own, peer)?;

        let mut out = [0u8; CONFIRM_LEN];
        out[..2].copy_from_slice(&send_confirm.to_le_bytes());
        out[2..].copy_from_slice(&mac);
        self.send_confirm = next;
        Ok(out)
    }

    /// Verify a peer Confirm.
    ///
    /// The MAC is recomputed with the peer's values first and the received
    /// send-confirm counter, then compared in constant time.
    pub fn check_confirm(&self, msg: &[u8]) -> Result<()> {
        if msg.len() < CONFIRM_LEN {
            return Err(Error::Truncated {
                needed: CONFIRM_LEN,
                available: msg.len(),
            });
        }

        let group = self.context()?;
        let kck = self.keys.as_ref().ok_or(Error::MissingKeys)?.kck();
        let (own, peer) = self.commit_values()?;

        let send_confirm = u16::from_le_bytes([msg[0], msg[1]]);
        let expected = confirm_mac(group, kck, send_confirm, peer, own)?;
        if bool::from(expected.ct_eq(&msg[2..CONFIRM_LEN])) {
            Ok(())
        } else {
            tracing::debug!(group = group.id(), send_confirm, "confirm mismatch");
            Err(Error::ConfirmMismatch)
        }
    }

    fn commit_values(&self) -> Result<(CommitValues<'_>, CommitValues<'_>)> {
        match (
            &self.own_commit_scalar,
            &self.own_commit_element,
            &self.peer_commit_scalar,
            &self.peer_commit_element,
        ) {
            (Some(own_scalar), Some(own_element), Some(peer_scalar), Some(peer_element)) => Ok((
                CommitValues {
                    scalar: own_scalar,
                    element: own_element.as_slice(),
                },
                CommitValues {
                    scalar: peer_scalar,
                    element: peer_element.as_slice(),
                },
            )),
            _ => Err(Error::MissingCommit),
        }
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::CONFIRM_LEN;
    use crate::{
        group::Group,
        session::Session,
        test_vectors::{MAC_A, MAC_B, PASSWORD, TOY_FFC_GROUP},
        Error,
    };
    use rand_core::OsRng;

    fn pair() -> (Session, Session) {
        let allowed = [TOY_FFC_GROUP.id];
        let mut a = Session::new();
        let mut b = Session::new();
        for (s, own, peer) in [(&mut a, &MAC_A, &MAC_B), (&mut b, &MAC_B, &MAC_A)] {
            s.select_group(Group::Ffc(&TOY_FFC_GROUP)).unwrap();
            s.prepare_commit(own, peer, PASSWORD, &mut OsRng).unwrap();
        }

        let commit_a = a.commit_to_vec(None).unwrap();
        let commit_b = b.commit_to_vec(None).unwrap();
        b.parse_commit(&commit_a, Some(&allowed[..])).unwrap();
        a.parse_commit(&commit_b, Some(&allowed[..])).unwrap();
        a.process_commit().unwrap();
        b.process_commit().unwrap();
        (a, b)
    }

    #[test]
    fn requires_keys() {
        let mut session = Session::new();
        session.set_group(19).unwrap();
        assert_eq!(session.write_confirm(), Err(Error::MissingKeys));
        assert_eq!(session.check_confirm(&[0; CONFIRM_LEN]), Err(Error::MissingKeys));
    }

    #[test]
    fn short_message() {
        let (a, mut b) = pair();
        let confirm = b.write_confirm().unwrap();
        assert!(matches!(
            a.check_confirm(&confirm[..33]),
            Err(Error::Truncated { needed: 34, .. })
        ));
        assert_eq!(a.check_confirm(&confirm), Ok(()));
    }

    #[test]
    fn counter_advances() {
        let (a, mut b) = pair();
        assert_eq!(b.send_confirm(), 0);
        let first = b.write_confirm().unwrap();
        let second = b.write_confirm().unwrap();
        assert_eq!(b.send_confirm(), 2);
        assert_eq!(first[..2], [0, 0]);
        assert_eq!(second[..2], [1, 0]);
        assert_ne!(first[2..], second[2..]);
        assert_eq!(a.check_confirm(&first), Ok(()));
        assert_eq!(a.check_confirm(&second), Ok(()));
    }

    #[test]
    fn own_confirm_does_not_verify() {
        let (mut a, _) = pair();
        let confirm = a.write_confirm().unwrap();
        assert_eq!(a.check_confirm(&confirm), Err(Error::ConfirmMismatch));
    }

    #[test]
    fn exhausted_counter() {
        let (mut a, _) = pair();
        a.send_confirm = u16::MAX;
        assert_eq!(a.write_confirm(), Err(Error::SendConfirmExhausted));
    }
}
