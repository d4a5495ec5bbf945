//! Commit message encoding and parsing.
//!
//! ```text
//! Group Id (2, LE) ‖ [Anti-Clogging Token] ‖ Scalar (prime_len) ‖ Element
//! ```
//!
//! The element is `x ‖ y` for curve groups and a single value for MODP groups.

use crate::{
    group::{Element, Group, GroupContext},
    scalar,
    session::{check_peer_commit, Session, State},
    Error, Result,
};

#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};

/// Length of the group id field.
const GROUP_ID_LEN: usize = 2;

impl Session {
    /// Encoded length of the own Commit carrying a `token_len` byte token.
    pub fn commit_len(&self, token_len: usize) -> Result<usize> {
        let group = self.context()?;
        Ok(GROUP_ID_LEN + token_len + group.prime_len() + group.element_len())
    }

    /// Serialize the own Commit into `out`, returning the bytes written.
    ///
    /// A caller-supplied anti-clogging token is placed between the group id
    /// and the scalar.
    pub fn write_commit(&self, token: Option<&[u8]>, out: &mut [u8]) -> Result<usize> {
        let group = self.context()?;
        let (scalar, element) = match (&self.own_commit_scalar, &self.own_commit_element) {
            (Some(scalar), Some(element)) => (scalar, element),
            _ => return Err(Error::MissingCommit),
        };

        let token = token.unwrap_or_default();
        let len = self.commit_len(token.len())?;
        if out.len() < len {
            return Err(Error::BufferTooSmall {
                needed: len,
                available: out.len(),
            });
        }

        let (id, rest) = out.split_at_mut(GROUP_ID_LEN);
        id.copy_from_slice(&group.id().to_le_bytes());
        let (token_out, rest) = rest.split_at_mut(token.len());
        token_out.copy_from_slice(token);
        let (scalar_out, rest) = rest.split_at_mut(group.prime_len());
        scalar::encode(scalar, scalar_out);
        rest[..element.len()].copy_from_slice(element.as_slice());

        Ok(len)
    }

    /// Serialize the own Commit into a new buffer.
    #[cfg(feature = "alloc")]
    pub fn commit_to_vec(&self, token: Option<&[u8]>) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.commit_len(token.map_or(0, <[u8]>::len))?];
        self.write_commit(token, &mut out)?;
        Ok(out)
    }

    /// Parse and validate a peer Commit.
    ///
    /// `allowed_groups` restricts the acceptable group ids; MODP groups are
    /// only accepted when it is supplied. A Commit for a different group
    /// switches the session to that group unless it is
    /// [`State::Committed`]. On success the peer scalar and element are
    /// stored and any anti-clogging token is returned.
    ///
    /// Nothing is stored when parsing fails. Use [`Error::status_code`] to
    /// build the response.
    pub fn parse_commit<'a>(
        &mut self,
        msg: &'a [u8],
        allowed_groups: Option<&[u16]>,
    ) -> Result<Option<&'a [u8]>> {
        if msg.len() < GROUP_ID_LEN {
            return Err(Error::Truncated {
                needed: GROUP_ID_LEN,
                available: msg.len(),
            });
        }
        let id = u16::from_le_bytes([msg[0], msg[1]]);

        if let Some(allowed) = allowed_groups {
            if !allowed.contains(&id) {
                tracing::debug!(group = id, "peer group not allowed");
                return Err(Error::GroupNotAllowed(id));
            }
        }

        let current = self.group_id();
        if self.state == State::Committed && current != Some(id) {
            let current = current.ok_or(Error::NoGroup)?;
            tracing::debug!(current, proposed = id, "peer tried to change group");
            return Err(Error::GroupChangeForbidden {
                current,
                proposed: id,
            });
        }

        let new_group = match &self.group {
            Some(group) if group.id() == id => None,
            _ => Some(Group::from_id(id).ok_or(Error::UnsupportedGroup(id))?),
        };
        let is_ecc = match (&new_group, &self.group) {
            (Some(group), _) => group.is_ecc(),
            (None, Some(context)) => context.is_ecc(),
            (None, None) => return Err(Error::NoGroup),
        };
        if !is_ecc && allowed_groups.is_none() {
            tracing::debug!(group = id, "MODP group not enabled");
            return Err(Error::FfcNotEnabled(id));
        }

        let new_context = match new_group {
            Some(group) => match GroupContext::new(group) {
                Ok(context) => Some(context),
                Err(err) => {
                    self.clear();
                    return Err(err);
                }
            },
            None => None,
        };
        let group = match (&new_context, &self.group) {
            (Some(context), _) | (None, Some(context)) => context,
            (None, None) => return Err(Error::NoGroup),
        };

        let body = &msg[GROUP_ID_LEN..];
        let fields_len = group.prime_len() + group.element_len();
        let token_len = body.len().checked_sub(fields_len).ok_or(Error::Truncated {
            needed: GROUP_ID_LEN + fields_len,
            available: msg.len(),
        })?;
        let (token, fields) = body.split_at(token_len);
        let (scalar_bytes, element_bytes) = fields.split_at(group.prime_len());

        let peer_scalar = scalar::decode(scalar_bytes)?;
        if self.state == State::Accepted && self.peer_commit_scalar == Some(peer_scalar) {
            tracing::debug!(group = id, "peer reused commit scalar");
            return Err(Error::ReusedPeerScalar);
        }
        check_peer_commit(group, &peer_scalar, element_bytes)?;
        let peer_element = Element::from_slice(element_bytes).ok_or(Error::InvalidPeerElement)?;

        if let Some(context) = new_context {
            self.replace_group(context);
        }
        self.peer_commit_scalar = Some(peer_scalar);
        self.peer_commit_element = Some(peer_element);

        if token.is_empty() {
            Ok(None)
        } else {
            tracing::trace!(group = id, len = token.len(), "anti-clogging token present");
            Ok(Some(token))
        }
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use crate::{
        session::{Session, State},
        test_vectors::{MAC_A, MAC_B, PASSWORD},
        Error, StatusCode,
    };
    use rand_core::OsRng;

    fn committed(id: u16) -> Session {
        let mut session = Session::new();
        session.set_group(id).unwrap();
        session
            .prepare_commit(&MAC_A, &MAC_B, PASSWORD, &mut OsRng)
            .unwrap();
        session
    }

    #[test]
    fn layout() {
        let session = committed(19);
        let mut out = [0u8; 2 + 3 + 32 + 64];
        assert_eq!(session.commit_len(3), Ok(out.len()));
        assert_eq!(session.write_commit(Some(&b"tok"[..]), &mut out), Ok(out.len()));
        assert_eq!(out[..2], [19, 0]);
        assert_eq!(&out[2..5], b"tok");
        assert_eq!(out[5..37], *session.own_commit_scalar().unwrap().as_slice());
        assert_eq!(out[37..], *session.own_commit_element().unwrap());
    }

    #[test]
    fn output_buffer_too_small() {
        let session = committed(19);
        let mut out = [0u8; 97];
        assert_eq!(
            session.write_commit(None, &mut out),
            Err(Error::BufferTooSmall {
                needed: 98,
                available: 97
            })
        );
    }

    #[test]
    fn group_id_only() {
        let mut session = Session::new();
        let err = session.parse_commit(&[19, 0], None).unwrap_err();
        assert_eq!(
            err,
            Error::Truncated {
                needed: 98,
                available: 2
            }
        );
        assert_eq!(err.status_code(), StatusCode::UnspecifiedFailure);
        assert_eq!(session.group_id(), None);

        assert!(matches!(
            session.parse_commit(&[19], None),
            Err(Error::Truncated { .. })
        ));
        assert!(matches!(
            session.parse_commit(&[], None),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn unsupported_group() {
        let mut session = committed(19);
        let err = session.parse_commit(&[22, 0, 1, 2, 3], None).unwrap_err();
        assert_eq!(err, Error::UnsupportedGroup(22));
        assert_eq!(err.status_code(), StatusCode::FiniteCyclicGroupNotSupported);
        assert_eq!(session.group_id(), Some(19));
        assert!(session.own_commit_scalar().is_some());
    }

    #[test]
    fn allow_list() {
        let peer = committed(20);
        let msg = peer.commit_to_vec(None).unwrap();

        let mut session = Session::new();
        assert_eq!(
            session.parse_commit(&msg, Some(&[19][..])),
            Err(Error::GroupNotAllowed(20))
        );
        assert_eq!(session.parse_commit(&msg, Some(&[19, 20][..])), Ok(None));
        assert_eq!(session.group_id(), Some(20));
    }

    #[test]
    fn group_change_while_committed() {
        let peer = committed(20);
        let msg = peer.commit_to_vec(None).unwrap();

        let mut session = committed(19);
        session.set_state(State::Committed);
        assert_eq!(
            session.parse_commit(&msg, None),
            Err(Error::GroupChangeForbidden {
                current: 19,
                proposed: 20
            })
        );
        assert!(session.peer_commit_scalar().is_none());

        session.set_state(State::Nothing);
        assert_eq!(session.parse_commit(&msg, None), Ok(None));
        assert_eq!(session.group_id(), Some(20));
        assert!(session.own_commit_scalar().is_none());
    }

    #[test]
    fn modp_requires_allow_list() {
        let peer = committed(1);
        let msg = peer.commit_to_vec(None).unwrap();

        let mut session = Session::new();
        assert_eq!(session.parse_commit(&msg, None), Err(Error::FfcNotEnabled(1)));
        assert_eq!(session.group_id(), None);
        assert_eq!(session.parse_commit(&msg, Some(&[1, 19][..])), Ok(None));
    }

    #[test]
    fn oversized_modp_group_wipes() {
        let mut session = committed(19);
        let err = session.parse_commit(&[17, 0], Some(&[17, 19][..])).unwrap_err();
        assert!(matches!(err, Error::PrimeTooLarge { group: 17, .. }));
        assert_eq!(session.group_id(), None);
    }

    #[test]
    fn token_returned_by_reference() {
        let peer = committed(19);
        let msg = peer.commit_to_vec(Some(&[0xaa; 5][..])).unwrap();

        let mut session = Session::new();
        session.set_group(19).unwrap();
        let token = session.parse_commit(&msg, None).unwrap().unwrap();
        assert_eq!(token, &[0xaa; 5]);
        assert_eq!(token.as_ptr(), msg[2..].as_ptr());
    }
}
