//! Key schedule: `k` to KCK, PMK and PMKID.

use crate::{
    group::GroupContext,
    kdf::{hmac_sha256, sha256_prf_bits, SHA256_MAC_LEN},
    scalar::Uint,
    Result,
};
use core::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Key confirmation key length.
pub const KCK_LEN: usize = 32;

/// Pairwise master key length.
pub const PMK_LEN: usize = 32;

/// PMK identifier length.
pub const PMKID_LEN: usize = 16;

const KCK_PMK_LABEL: &[u8] = b"SAE KCK and PMK";

/// Keys produced by a successful exchange.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionKeys {
    pub(crate) kck: [u8; KCK_LEN],
    pub(crate) pmk: [u8; PMK_LEN],
    pub(crate) pmkid: [u8; PMKID_LEN],
}

impl SessionKeys {
    /// Derive keys from the shared secret `k` and both commit scalars.
    ///
    /// ```text
    /// keyseed    = HMAC-SHA-256(0^32, k)
    /// val        = (own_scalar + peer_scalar) mod r
    /// KCK ‖ PMK  = KDF-512(keyseed, "SAE KCK and PMK", val)
    /// PMKID      = L(val, 0, 128)
    /// ```
    pub fn derive(
        group: &GroupContext,
        k: &[u8],
        own_scalar: &Uint,
        peer_scalar: &Uint,
    ) -> Result<Self> {
        let keyseed = Zeroizing::new(hmac_sha256(&[0u8; SHA256_MAC_LEN], &[k])?);
        let val = group.encode_scalar(&own_scalar.add_mod(peer_scalar, group.order()));

        let mut keys = Zeroizing::new([0u8; KCK_LEN + PMK_LEN]);
        sha256_prf_bits(
            &keyseed[..],
            KCK_PMK_LABEL,
            val.as_slice(),
            &mut keys[..],
            (KCK_LEN + PMK_LEN) * 8,
        )?;

        let mut ret = Self {
            kck: [0; KCK_LEN],
            pmk: [0; PMK_LEN],
            pmkid: [0; PMKID_LEN],
        };
        ret.kck.copy_from_slice(&keys[..KCK_LEN]);
        ret.pmk.copy_from_slice(&keys[KCK_LEN..]);
        let n = PMKID_LEN.min(val.len());
        ret.pmkid[..n].copy_from_slice(&val.as_slice()[..n]);
        Ok(ret)
    }

    /// Key confirmation key.
    pub fn kck(&self) -> &[u8; KCK_LEN] {
        &self.kck
    }

    /// Pairwise master key.
    pub fn pmk(&self) -> &[u8; PMK_LEN] {
        &self.pmk
    }

    /// PMK identifier.
    pub fn pmkid(&self) -> &[u8; PMKID_LEN] {
        &self.pmkid
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::SessionKeys;
    use crate::{
        group::{Group, GroupContext},
        scalar,
        test_vectors::key_schedule::{K, KCK, PMK, PMKID, SCALAR_1, SCALAR_2},
    };

    #[test]
    fn known_answer() {
        let group = GroupContext::new(Group::from_id(19).unwrap()).unwrap();
        let s1 = scalar::decode(&SCALAR_1).unwrap();
        let s2 = scalar::decode(&SCALAR_2).unwrap();
        let keys = SessionKeys::derive(&group, &K, &s1, &s2).unwrap();
        assert_eq!(keys.kck(), &KCK);
        assert_eq!(keys.pmk(), &PMK);
        assert_eq!(keys.pmkid(), &PMKID);
    }

    #[test]
    fn scalar_order_irrelevant() {
        let group = GroupContext::new(Group::from_id(19).unwrap()).unwrap();
        let s1 = scalar::decode(&SCALAR_1).unwrap();
        let s2 = scalar::decode(&SCALAR_2).unwrap();
        let a = SessionKeys::derive(&group, &K, &s1, &s2).unwrap();
        let b = SessionKeys::derive(&group, &K, &s2, &s1).unwrap();
        assert_eq!(a.pmk(), b.pmk());
        assert_eq!(a.kck(), b.kck());
    }

    #[test]
    fn debug_is_redacted() {
        let group = GroupContext::new(Group::from_id(19).unwrap()).unwrap();
        let s = scalar::decode(&SCALAR_1).unwrap();
        let keys = SessionKeys::derive(&group, &K, &s, &s).unwrap();
        assert_eq!(std::format!("{keys:?}"), "SessionKeys { .. }");
    }
}
