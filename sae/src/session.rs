//! Per-peer SAE state.

use crate::{
    group::{Element, Group, GroupContext, ScalarBytes},
    keys::{SessionKeys, KCK_LEN, PMKID_LEN, PMK_LEN},
    pwe::derive_pwe,
    scalar::{random_scalar, Uint},
    Error, MacAddress, Result,
};
use core::fmt;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

/// Fresh `(rand, mask)` pairs drawn before a commit derivation gives up.
const MAX_COMMIT_ATTEMPTS: usize = 100;

/// Protocol state, advanced by the caller.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum State {
    /// No exchange in progress.
    #[default]
    Nothing,
    /// Own Commit sent, waiting for the peer's.
    Committed,
    /// Commits exchanged, Confirm sent.
    Confirmed,
    /// Exchange complete, PMK valid.
    Accepted,
}

/// State of one SAE exchange with one peer.
///
/// Operations must not run concurrently on the same session. Secrets are
/// wiped on [`Session::clear`], on group changes and on drop.
#[derive(Default)]
pub struct Session {
    pub(crate) state: State,
    pub(crate) group: Option<GroupContext>,
    pub(crate) pwe: Option<Element>,
    pub(crate) rand: Option<Zeroizing<Uint>>,
    pub(crate) own_commit_scalar: Option<Uint>,
    pub(crate) own_commit_element: Option<Element>,
    pub(crate) peer_commit_scalar: Option<Uint>,
    pub(crate) peer_commit_element: Option<Element>,
    pub(crate) keys: Option<SessionKeys>,
    pub(crate) send_confirm: u16,
}

impl Session {
    /// Session with no group selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the group and all derived material.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Current protocol state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Record a protocol state transition.
    pub fn set_state(&mut self, state: State) {
        tracing::trace!(from = ?self.state, to = ?state, "state transition");
        self.state = state;
    }

    /// Select a built-in group by IANA id.
    ///
    /// All session secrets are wiped first, whether or not the group is
    /// usable.
    pub fn set_group(&mut self, id: u16) -> Result<()> {
        self.clear();
        let group = Group::from_id(id).ok_or(Error::UnsupportedGroup(id))?;
        self.install_group(group)
    }

    /// Select an arbitrary group, such as a custom MODP parameter set.
    ///
    /// All session secrets are wiped first.
    pub fn select_group(&mut self, group: Group) -> Result<()> {
        self.clear();
        self.install_group(group)
    }

    fn install_group(&mut self, group: Group) -> Result<()> {
        let context = GroupContext::new(group).map_err(|err| {
            tracing::debug!(group = group.id(), %err, "group setup failed");
            err
        })?;
        tracing::debug!(group = group.id(), prime_len = context.prime_len(), "group selected");
        self.group = Some(context);
        Ok(())
    }

    /// Replace the group without range checks; `context` is already validated.
    pub(crate) fn replace_group(&mut self, context: GroupContext) {
        self.clear();
        tracing::debug!(group = context.id(), "group changed by peer");
        self.group = Some(context);
    }

    /// Selected group.
    pub fn group(&self) -> Option<&GroupContext> {
        self.group.as_ref()
    }

    /// IANA id of the selected group.
    pub fn group_id(&self) -> Option<u16> {
        self.group.as_ref().map(GroupContext::id)
    }

    /// Width of scalars and coordinates in the selected group.
    pub fn prime_len(&self) -> Option<usize> {
        self.group.as_ref().map(GroupContext::prime_len)
    }

    pub(crate) fn context(&self) -> Result<&GroupContext> {
        self.group.as_ref().ok_or(Error::NoGroup)
    }

    /// Derive the password element and a fresh own commit.
    ///
    /// `addr1` and `addr2` are the two station addresses in either order.
    pub fn prepare_commit(
        &mut self,
        addr1: &MacAddress,
        addr2: &MacAddress,
        password: &[u8],
        rng: &mut impl CryptoRngCore,
    ) -> Result<()> {
        let pwe = derive_pwe(self.context()?, addr1, addr2, password)?;
        self.pwe = Some(pwe);
        self.derive_commit(rng)
    }

    /// Draw a new `(rand, mask)` pair and recompute the own commit from the
    /// existing password element.
    ///
    /// ```text
    /// commit-scalar  = (rand + mask) mod r
    /// commit-element = inverse(scalar-op(mask, PWE))
    /// ```
    pub fn derive_commit(&mut self, rng: &mut impl CryptoRngCore) -> Result<()> {
        let group = self.group.as_ref().ok_or(Error::NoGroup)?;
        let pwe = self.pwe.as_ref().ok_or(Error::MissingPwe)?;

        self.rand = None;
        self.own_commit_scalar = None;
        self.own_commit_element = None;
        self.keys = None;

        for _ in 0..MAX_COMMIT_ATTEMPTS {
            let rand = random_scalar(group.order(), rng)?;
            let mask = random_scalar(group.order(), rng)?;
            let commit_scalar = rand.add_mod(&mask, group.order());
            if commit_scalar <= Uint::ONE {
                continue;
            }

            let element = group.commit_element(pwe, &mask)?;
            tracing::debug!(group = group.id(), "own commit derived");
            self.rand = Some(rand);
            self.own_commit_scalar = Some(commit_scalar);
            self.own_commit_element = Some(element);
            return Ok(());
        }

        Err(Error::RandomGeneration)
    }

    /// Own commit scalar, `prime_len` bytes.
    pub fn own_commit_scalar(&self) -> Option<ScalarBytes> {
        let scalar = self.own_commit_scalar.as_ref()?;
        Some(self.group.as_ref()?.encode_scalar(scalar))
    }

    /// Own commit element.
    pub fn own_commit_element(&self) -> Option<&[u8]> {
        self.own_commit_element.as_ref().map(Element::as_slice)
    }

    /// Last accepted peer commit scalar, `prime_len` bytes.
    pub fn peer_commit_scalar(&self) -> Option<ScalarBytes> {
        let scalar = self.peer_commit_scalar.as_ref()?;
        Some(self.group.as_ref()?.encode_scalar(scalar))
    }

    /// Last accepted peer commit element.
    pub fn peer_commit_element(&self) -> Option<&[u8]> {
        self.peer_commit_element.as_ref().map(Element::as_slice)
    }

    /// Pairwise master key, once [`Session::process_commit`] has succeeded.
    pub fn pmk(&self) -> Option<&[u8; PMK_LEN]> {
        self.keys.as_ref().map(SessionKeys::pmk)
    }

    /// PMK identifier, once [`Session::process_commit`] has succeeded.
    pub fn pmkid(&self) -> Option<&[u8; PMKID_LEN]> {
        self.keys.as_ref().map(SessionKeys::pmkid)
    }

    /// Key confirmation key, once [`Session::process_commit`] has succeeded.
    pub fn kck(&self) -> Option<&[u8; KCK_LEN]> {
        self.keys.as_ref().map(SessionKeys::kck)
    }

    /// Validate the stored peer commit, then derive `K` and the session keys.
    ///
    /// On failure any previously derived keys are discarded.
    pub fn process_commit(&mut self) -> Result<()> {
        self.keys = None;

        let group = self.context()?;
        let pwe = self.pwe.as_ref().ok_or(Error::MissingPwe)?;
        let (rand, own_scalar, peer_scalar, peer_element) = match (
            self.rand.as_ref(),
            self.own_commit_scalar.as_ref(),
            self.peer_commit_scalar.as_ref(),
            self.peer_commit_element.as_ref(),
        ) {
            (Some(rand), Some(own), Some(peer), Some(element)) => (rand, own, peer, element),
            _ => return Err(Error::MissingCommit),
        };

        check_peer_commit(group, peer_scalar, peer_element.as_slice())?;
        group.validate_element(peer_element.as_slice())?;

        let k = group
            .shared_secret(pwe, rand, peer_scalar, peer_element)
            .map_err(|err| {
                tracing::debug!(group = group.id(), %err, "failed to derive k");
                err
            })?;
        let keys = SessionKeys::derive(group, k.as_slice(), own_scalar, peer_scalar)?;

        tracing::debug!(group = group.id(), "session keys derived");
        self.keys = Some(keys);
        Ok(())
    }
}

/// Range checks on a peer commit.
///
/// The scalar must satisfy `0 < scalar < r`, each element coordinate must be
/// below `p`, and a MODP element must not be 0 or 1.
pub(crate) fn check_peer_commit(
    group: &GroupContext,
    scalar: &Uint,
    element: &[u8],
) -> Result<()> {
    if *scalar == Uint::ZERO || scalar >= group.order() {
        tracing::debug!(group = group.id(), "invalid peer scalar");
        return Err(Error::InvalidPeerScalar);
    }

    if element.len() != group.element_len() {
        return Err(Error::InvalidPeerElement);
    }

    let prime = group.prime_bytes();
    for coordinate in element.chunks(group.prime_len()) {
        if coordinate >= prime.as_slice() {
            tracing::debug!(group = group.id(), "invalid coordinate in peer element");
            return Err(Error::InvalidPeerElement);
        }
    }

    if !group.is_ecc() {
        let (last, rest) = element.split_last().ok_or(Error::InvalidPeerElement)?;
        if rest.iter().all(|&b| b == 0) && *last <= 1 {
            tracing::debug!(group = group.id(), "trivial peer element");
            return Err(Error::InvalidPeerElement);
        }
    }

    Ok(())
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("group", &self.group_id())
            .field("send_confirm", &self.send_confirm)
            .finish_non_exhaustive()
    }
}
