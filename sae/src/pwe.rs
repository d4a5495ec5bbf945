//! Password element derivation ("hunting and pecking").
//!
//! Each counter value yields a 256-bit `pwd-seed`:
//!
//! ```text
//! pwd-seed = HMAC-SHA-256(MAX(addr1, addr2) ‖ MIN(addr1, addr2), password ‖ counter)
//! ```
//!
//! which is expanded to a `pwd-value` as wide as the prime. Curve groups
//! treat it as an x-coordinate; MODP groups raise it to `(p - 1) / r`.

use crate::{
    group::{Element, GroupContext},
    kdf::{hmac_sha256, sha256_prf_bits, SHA256_MAC_LEN},
    scalar, Error, MacAddress, Result, MAX_PRIME_LEN,
};
use subtle::{Choice, ConstantTimeLess};
use zeroize::Zeroizing;

const HUNT_AND_PECK_LABEL: &[u8] = b"SAE Hunting and Pecking";

/// Counters tried before giving up.
const MAX_COUNTER: u8 = 200;

/// Curve groups always run at least this many counters so that timing does
/// not reveal which one succeeded.
const MIN_ECC_ITERATIONS: u8 = 4;

/// Derive the password element shared by `addr1` and `addr2`.
///
/// The result depends only on the group, the unordered address pair and the
/// password.
pub fn derive_pwe(
    group: &GroupContext,
    addr1: &MacAddress,
    addr2: &MacAddress,
    password: &[u8],
) -> Result<Element> {
    let key = seed_key(addr1, addr2);
    let (pwe, _) = if group.is_ecc() {
        hunt_and_peck_ecc(group, &key, password)?
    } else {
        hunt_and_peck_ffc(group, &key, password)?
    };
    Ok(pwe)
}

/// `MAX(addr1, addr2) ‖ MIN(addr1, addr2)`
fn seed_key(addr1: &MacAddress, addr2: &MacAddress) -> [u8; 12] {
    let (hi, lo) = if addr1 > addr2 {
        (addr1, addr2)
    } else {
        (addr2, addr1)
    };

    let mut key = [0u8; 12];
    key[..6].copy_from_slice(hi);
    key[6..].copy_from_slice(lo);
    key
}

fn pwd_seed(key: &[u8], password: &[u8], counter: u8) -> Result<Zeroizing<[u8; SHA256_MAC_LEN]>> {
    hmac_sha256(key, &[password, &[counter]]).map(Zeroizing::new)
}

/// Expand `seed` to `prime_bits` bits, right-aligned in `prime_len` bytes.
///
/// Also returns whether the value is below the prime.
fn pwd_value(
    group: &GroupContext,
    prime: &[u8],
    seed: &[u8],
) -> Result<(Zeroizing<[u8; MAX_PRIME_LEN]>, Choice)> {
    let bits = group.prime_bits();
    let len = group.prime_len();
    let used = bits.div_ceil(8);

    let mut buf = Zeroizing::new([0u8; MAX_PRIME_LEN]);
    let value = &mut buf[len - used..len];
    sha256_prf_bits(seed, HUNT_AND_PECK_LABEL, prime, value, bits)?;
    if bits % 8 != 0 {
        shift_right(value, 8 - bits % 8);
    }

    let value = Zeroizing::new(scalar::decode(&buf[..len])?);
    let in_range = value.ct_lt(group.prime());
    Ok((buf, in_range))
}

/// Big-endian right shift of `buf` by `shift < 8` bits.
fn shift_right(buf: &mut [u8], shift: usize) {
    debug_assert!(shift > 0 && shift < 8);
    for i in (0..buf.len()).rev() {
        let carry = match i.checked_sub(1) {
            Some(prev) => buf[prev] << (8 - shift),
            None => 0,
        };
        buf[i] = (buf[i] >> shift) | carry;
    }
}

/// Every candidate is evaluated in constant time and the first valid one
/// kept. The loop stops at the first counter `>= MIN_ECC_ITERATIONS` after
/// a candidate has been found.
///
/// Returns the element and the number of counters evaluated.
fn hunt_and_peck_ecc(
    group: &GroupContext,
    key: &[u8],
    password: &[u8],
) -> Result<(Element, u8)> {
    let prime = group.prime_bytes();
    let len = group.prime_len();
    let mut pwe = Element::zeroed(group.element_len());
    let mut found = Choice::from(0);

    for counter in 1..=MAX_COUNTER {
        tracing::trace!(group = group.id(), counter, "hunting and pecking");
        let seed = pwd_seed(key, password, counter)?;
        let (value, in_range) = pwd_value(group, prime.as_slice(), &seed[..])?;
        let y_is_odd = Choice::from(seed[SHA256_MAC_LEN - 1] & 1);

        let (candidate, on_curve) = group.pwe_candidate(&value[..len], y_is_odd)?;
        let valid = in_range & on_curve;
        pwe.conditional_assign(&candidate, valid & !found);
        found |= valid;

        if counter >= MIN_ECC_ITERATIONS && bool::from(found) {
            tracing::debug!(group = group.id(), counter, "password element found");
            return Ok((pwe, counter));
        }
    }

    tracing::debug!(group = group.id(), "password element not found");
    Err(Error::PweNotFound)
}

/// Stops at the first usable candidate and returns it with its counter.
///
/// `pwd-value` is as wide as the prime's bit length, not `8 * prime_len`.
/// The two agree for every MODP group; they differ only for custom primes
/// whose leading byte is not full, where a different counter may win.
fn hunt_and_peck_ffc(
    group: &GroupContext,
    key: &[u8],
    password: &[u8],
) -> Result<(Element, u8)> {
    let prime = group.prime_bytes();
    let len = group.prime_len();

    for counter in 1..=MAX_COUNTER {
        let seed = pwd_seed(key, password, counter)?;
        let (value, in_range) = pwd_value(group, prime.as_slice(), &seed[..])?;
        if !bool::from(in_range) {
            tracing::trace!(group = group.id(), counter, "pwd-value >= p");
            continue;
        }

        let (candidate, valid) = group.pwe_candidate(&value[..len], Choice::from(0))?;
        if bool::from(valid) {
            tracing::debug!(group = group.id(), counter, "password element found");
            return Ok((candidate, counter));
        }
        tracing::trace!(group = group.id(), counter, "PWE <= 1");
    }

    tracing::debug!(group = group.id(), "password element not found");
    Err(Error::PweNotFound)
}

#[cfg(test)]
mod tests {
    use super::{derive_pwe, hunt_and_peck_ecc, hunt_and_peck_ffc, seed_key, shift_right};
    use crate::{
        group::{Group, GroupContext},
        test_vectors::{
            MAC_A, MAC_B, MODP_1536_PWE_PREFIX, MODP_768_PWE, P256_PWE, P256_PWE_COUNTER_4,
            P384_PWE, P521_PWE, PASSWORD, TOY_FFC_GROUP, TOY_FFC_PWE,
        },
    };
    use hex_literal::hex;

    fn pwe(id: u16) -> crate::Element {
        let group = GroupContext::new(Group::from_id(id).unwrap()).unwrap();
        derive_pwe(&group, &MAC_A, &MAC_B, PASSWORD).unwrap()
    }

    #[test]
    fn seed_key_is_max_then_min() {
        let expected = hex!("020000000002 020000000001");
        assert_eq!(seed_key(&MAC_A, &MAC_B), expected);
        assert_eq!(seed_key(&MAC_B, &MAC_A), expected);
    }

    #[test]
    fn shift() {
        let mut buf = hex!("ff80");
        shift_right(&mut buf, 7);
        assert_eq!(buf, hex!("01ff"));

        let mut buf = hex!("a9cc");
        shift_right(&mut buf, 1);
        assert_eq!(buf, hex!("54e6"));
    }

    #[test]
    fn toy_group() {
        let group = GroupContext::new(Group::Ffc(&TOY_FFC_GROUP)).unwrap();
        let pwe = derive_pwe(&group, &MAC_A, &MAC_B, PASSWORD).unwrap();
        assert_eq!(pwe.as_slice(), TOY_FFC_PWE);
    }

    #[test]
    fn p256() {
        assert_eq!(pwe(19).as_slice(), P256_PWE);
    }

    #[test]
    fn p256_found_late() {
        let v = &P256_PWE_COUNTER_4;
        let group = GroupContext::new(Group::from_id(19).unwrap()).unwrap();
        let pwe = derive_pwe(&group, &v.addr1, &v.addr2, v.password).unwrap();
        assert_eq!(pwe.as_slice(), v.pwe);
    }

    #[test]
    fn p384() {
        assert_eq!(pwe(20).as_slice(), P384_PWE);
    }

    #[test]
    fn p521() {
        assert_eq!(pwe(21).as_slice(), P521_PWE);
    }

    #[test]
    fn modp_768() {
        assert_eq!(pwe(1).as_slice(), MODP_768_PWE);
    }

    #[test]
    fn modp_1536() {
        let pwe = pwe(5);
        assert_eq!(pwe.len(), 192);
        assert_eq!(pwe.as_slice()[..32], MODP_1536_PWE_PREFIX);
    }

    #[test]
    fn ecc_runs_at_least_four_counters() {
        let group = GroupContext::new(Group::from_id(19).unwrap()).unwrap();

        // valid candidate at counter 1
        let key = seed_key(&MAC_A, &MAC_B);
        let (pwe, counters) = hunt_and_peck_ecc(&group, &key, PASSWORD).unwrap();
        assert_eq!(pwe.as_slice(), P256_PWE);
        assert_eq!(counters, 4);

        // first valid candidate at counter 4
        let v = &P256_PWE_COUNTER_4;
        let key = seed_key(&v.addr1, &v.addr2);
        let (pwe, counters) = hunt_and_peck_ecc(&group, &key, v.password).unwrap();
        assert_eq!(pwe.as_slice(), v.pwe);
        assert_eq!(counters, 4);

        for id in [20, 21] {
            let group = GroupContext::new(Group::from_id(id).unwrap()).unwrap();
            let (_, counters) = hunt_and_peck_ecc(&group, &key, PASSWORD).unwrap();
            assert!(counters >= 4);
        }
    }

    #[test]
    fn ffc_stops_at_first_success() {
        let group = GroupContext::new(Group::Ffc(&TOY_FFC_GROUP)).unwrap();
        let key = seed_key(&MAC_A, &MAC_B);
        let (pwe, counters) = hunt_and_peck_ffc(&group, &key, PASSWORD).unwrap();
        assert_eq!(pwe.as_slice(), TOY_FFC_PWE);
        assert_eq!(counters, 2);

        let group = GroupContext::new(Group::from_id(5).unwrap()).unwrap();
        let (_, counters) = hunt_and_peck_ffc(&group, &key, PASSWORD).unwrap();
        assert_eq!(counters, 1);
    }

    #[test]
    fn address_order_irrelevant() {
        let group = GroupContext::new(Group::from_id(19).unwrap()).unwrap();
        let a = derive_pwe(&group, &MAC_A, &MAC_B, PASSWORD).unwrap();
        let b = derive_pwe(&group, &MAC_B, &MAC_A, PASSWORD).unwrap();
        assert_eq!(a, b);
        let c = derive_pwe(&group, &MAC_A, &MAC_B, b"tesT").unwrap();
        assert_ne!(a, c);
    }
}
