//! Big integers wide enough for every supported group, and random scalars.

use crate::{Error, Result, MAX_PRIME_LEN};
use bigint::{Limb, U4096};
use rand_core::CryptoRngCore;
use subtle::{ConstantTimeGreater, ConstantTimeLess};
use zeroize::Zeroizing;

/// Unsigned integer holding any prime, order or scalar the crate handles.
pub type Uint = U4096;

/// Maximum number of draws made by [`random_scalar`].
const MAX_RANDOM_ITERATIONS: usize = 100;

/// Decode a big-endian integer of at most [`MAX_PRIME_LEN`] bytes.
pub(crate) fn decode(bytes: &[u8]) -> Result<Uint> {
    if bytes.len() > Uint::BYTES {
        return Err(Error::Backend);
    }

    let mut padded = Zeroizing::new([0u8; Uint::BYTES]);
    padded[Uint::BYTES - bytes.len()..].copy_from_slice(bytes);
    Ok(Uint::from_be_slice(&padded[..]))
}

/// Encode the low `out.len()` bytes of `x` as fixed-width big-endian.
pub(crate) fn encode(x: &Uint, out: &mut [u8]) {
    let words = x.as_words();
    for (i, byte) in out.iter_mut().rev().enumerate() {
        *byte = match words.get(i / Limb::BYTES) {
            Some(word) => (word >> (8 * (i % Limb::BYTES))) as u8,
            None => 0,
        };
    }
}

/// Sample a scalar uniformly from `[2, order - 2]`.
///
/// Draws `ceil(bits(order) / 8)` random bytes, clears the bits above the
/// order's bit length and rejects out-of-range results. Fails with
/// [`Error::RandomGeneration`] after 100 rejected draws.
pub fn random_scalar(order: &Uint, rng: &mut impl CryptoRngCore) -> Result<Zeroizing<Uint>> {
    let bits = order.bits();
    let len = bits.div_ceil(8);
    if len == 0 || len > MAX_PRIME_LEN {
        return Err(Error::Backend);
    }

    let upper = order.wrapping_sub(&Uint::ONE);
    let lower = Uint::ONE;
    let mut buf = Zeroizing::new([0u8; MAX_PRIME_LEN]);

    for _ in 0..MAX_RANDOM_ITERATIONS {
        let bytes = &mut buf[..len];
        rng.try_fill_bytes(bytes).map_err(|_| Error::RandomGeneration)?;
        if bits % 8 != 0 {
            bytes[0] &= 0xff >> (8 - bits % 8);
        }

        let value = Zeroizing::new(decode(bytes)?);
        if bool::from(value.ct_gt(&lower) & value.ct_lt(&upper)) {
            return Ok(value);
        }
    }

    Err(Error::RandomGeneration)
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, random_scalar, Uint};
    use crate::Error;
    use hex_literal::hex;
    use rand_core::{CryptoRng, OsRng, RngCore};

    #[test]
    fn encode_pads_and_truncates() {
        let x = decode(&hex!("0102")).unwrap();
        let mut out = [0xff; 4];
        encode(&x, &mut out);
        assert_eq!(out, hex!("00000102"));

        let mut short = [0; 1];
        encode(&x, &mut short);
        assert_eq!(short, [2]);
    }

    #[test]
    fn decode_rejects_oversized() {
        assert!(decode(&[1; 513]).is_err());
        assert_eq!(decode(&[]).unwrap(), Uint::ZERO);
    }

    #[test]
    fn tiny_order_range() {
        // [2, 5] for order 7
        let order = Uint::from_u8(7);
        for _ in 0..200 {
            let s = random_scalar(&order, &mut OsRng).unwrap();
            assert!(*s >= Uint::from_u8(2) && *s <= Uint::from_u8(5));
        }
    }

    struct ConstRng(u8);

    impl RngCore for ConstRng {
        fn next_u32(&mut self) -> u32 {
            u32::from_ne_bytes([self.0; 4])
        }

        fn next_u64(&mut self) -> u64 {
            u64::from_ne_bytes([self.0; 8])
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(self.0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for ConstRng {}

    #[test]
    fn gives_up_after_repeated_rejection() {
        let order = Uint::from_u8(0xf1);
        assert_eq!(
            random_scalar(&order, &mut ConstRng(0x01)).unwrap_err(),
            Error::RandomGeneration
        );
        assert_eq!(
            random_scalar(&order, &mut ConstRng(0xf0)).unwrap_err(),
            Error::RandomGeneration
        );
        assert_eq!(*random_scalar(&order, &mut ConstRng(0xef)).unwrap(), Uint::from_u8(0xef));
    }
}
