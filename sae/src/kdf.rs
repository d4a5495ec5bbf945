//! HMAC-SHA-256 and the IEEE 802.11 bit-length key derivation function.

use crate::{Error, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Output size of SHA-256 in bytes.
pub const SHA256_MAC_LEN: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA-256 over the concatenation of `data`.
pub fn hmac_sha256(key: &[u8], data: &[&[u8]]) -> Result<[u8; SHA256_MAC_LEN]> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| Error::Backend)?;
    for chunk in data {
        mac.update(chunk);
    }
    Ok(mac.finalize().into_bytes().into())
}

/// `KDF-Hash-Length` from IEEE 802.11-2016 § 12.7.1.6.2 with SHA-256.
///
/// Fills the first `ceil(bits / 8)` bytes of `out`. When `bits` is not a
/// multiple of 8 the unused low-order bits of the final byte are cleared.
pub fn sha256_prf_bits(
    key: &[u8],
    label: &[u8],
    context: &[u8],
    out: &mut [u8],
    bits: usize,
) -> Result<()> {
    let len = bits.div_ceil(8);
    if out.len() < len {
        return Err(Error::BufferTooSmall {
            needed: len,
            available: out.len(),
        });
    }
    let length = u16::try_from(bits).map_err(|_| Error::Backend)?.to_le_bytes();

    let out = &mut out[..len];
    let mut counter: u16 = 1;
    for block in out.chunks_mut(SHA256_MAC_LEN) {
        let hash = hmac_sha256(key, &[&counter.to_le_bytes(), label, context, &length])?;
        block.copy_from_slice(&hash[..block.len()]);
        counter = counter.wrapping_add(1);
    }

    if bits % 8 != 0 {
        if let Some(last) = out.last_mut() {
            *last &= 0xff << (8 - bits % 8);
        }
    }

    Ok(())
}
