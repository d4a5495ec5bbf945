//! Fixed-capacity byte strings for scalars, elements and secrets.

use core::fmt;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Byte string with inline capacity `N` and an occupied length.
///
/// Contents are wiped on drop.
#[derive(Clone)]
pub struct Octets<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> Octets<N> {
    /// `len` zero bytes.
    ///
    /// Panics if `len > N`.
    pub(crate) fn zeroed(len: usize) -> Self {
        assert!(len <= N, "octet string exceeds capacity");
        Self { bytes: [0; N], len }
    }

    /// Copy `slice`, returning `None` if it exceeds the capacity.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() > N {
            return None;
        }

        let mut ret = Self::zeroed(slice.len());
        ret.bytes[..slice.len()].copy_from_slice(slice);
        Some(ret)
    }

    /// Occupied bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.len]
    }

    /// Number of occupied bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no bytes are occupied.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Overwrite `self` with `other` when `choice` is set, in constant time.
    ///
    /// Both operands must have the same length.
    pub(crate) fn conditional_assign(&mut self, other: &Self, choice: Choice) {
        debug_assert_eq!(self.len, other.len);
        for (a, b) in self.bytes.iter_mut().zip(other.bytes.iter()) {
            a.conditional_assign(b, choice);
        }
    }
}

impl<const N: usize> AsRef<[u8]> for Octets<N> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl<const N: usize> ConstantTimeEq for Octets<N> {
    fn ct_eq(&self, other: &Self) -> Choice {
        if self.len != other.len {
            return Choice::from(0);
        }
        self.as_slice().ct_eq(other.as_slice())
    }
}

impl<const N: usize> PartialEq for Octets<N> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<const N: usize> Eq for Octets<N> {}

impl<const N: usize> fmt::Debug for Octets<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Octets").field("len", &self.len).finish_non_exhaustive()
    }
}

impl<const N: usize> Zeroize for Octets<N> {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
        self.len.zeroize();
    }
}

impl<const N: usize> Drop for Octets<N> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<const N: usize> ZeroizeOnDrop for Octets<N> {}
