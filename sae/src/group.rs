//! Finite cyclic groups SAE runs over.
//!
//! Group ids follow the IANA "Group Description" registry used by IKE:
//! 19, 20 and 21 are the NIST P-256, P-384 and P-521 curves; 1, 2, 5 and
//! 14 through 18 are the RFC 2409 / RFC 3526 MODP groups.

mod ecc;
mod ffc;

pub use self::{ecc::EccCurve, ffc::FfcParams};

use self::ffc::FfcField;
use crate::{
    octets::Octets,
    scalar::{self, Uint},
    Error, Result,
};
use core::fmt;
use subtle::Choice;

/// Largest prime the crate accepts, in bytes (4096 bits).
pub const MAX_PRIME_LEN: usize = 512;

/// Encoded group element: `x ‖ y` for curves, a single integer for MODP groups.
pub type Element = Octets<{ 2 * MAX_PRIME_LEN }>;

/// Encoded scalar or field value, `prime_len` bytes wide.
pub type ScalarBytes = Octets<MAX_PRIME_LEN>;

/// A finite cyclic group.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Group {
    /// Elliptic curve group.
    Ecc(EccCurve),

    /// Finite field (MODP) group.
    Ffc(&'static FfcParams),
}

impl Group {
    /// Group ids with built-in parameters that fit [`MAX_PRIME_LEN`].
    ///
    /// [`Group::from_id`] also recognizes MODP groups 17 and 18, whose
    /// primes are too large to set up.
    pub const SUPPORTED: &'static [u16] = &[19, 20, 21, 1, 2, 5, 14, 15, 16];

    /// Look up a built-in group.
    pub fn from_id(id: u16) -> Option<Self> {
        EccCurve::from_id(id)
            .map(Group::Ecc)
            .or_else(|| ffc::lookup(id).map(Group::Ffc))
    }

    /// IANA group id.
    pub fn id(&self) -> u16 {
        match self {
            Group::Ecc(curve) => curve.id(),
            Group::Ffc(params) => params.id,
        }
    }

    /// Is this an elliptic curve group?
    pub fn is_ecc(&self) -> bool {
        matches!(self, Group::Ecc(_))
    }
}

/// Backing arithmetic of a [`GroupContext`].
#[derive(Clone)]
enum Arithmetic {
    Ecc(EccCurve),
    Ffc(FfcField),
}

/// Parameters of the selected group.
#[derive(Clone)]
pub struct GroupContext {
    group: Group,
    prime: Uint,
    prime_len: usize,
    prime_bits: usize,
    order: Uint,
    arithmetic: Arithmetic,
}

impl GroupContext {
    /// Validate `group` and precompute its parameters.
    pub fn new(group: Group) -> Result<Self> {
        match group {
            Group::Ecc(curve) => {
                let prime = scalar::decode(curve.prime())?;
                Ok(Self {
                    group,
                    prime,
                    prime_len: curve.prime().len(),
                    prime_bits: prime.bits(),
                    order: scalar::decode(curve.order())?,
                    arithmetic: Arithmetic::Ecc(curve),
                })
            }
            Group::Ffc(params) => {
                let prime_len = params.prime.len();
                if prime_len > MAX_PRIME_LEN {
                    return Err(Error::PrimeTooLarge {
                        group: params.id,
                        prime_len,
                    });
                }

                let prime = scalar::decode(params.prime)?;
                let order = scalar::decode(params.order)?;
                if prime.as_words()[0] & 1 == 0
                    || prime <= Uint::from_u8(3)
                    || order <= Uint::ONE
                    || order >= prime
                {
                    return Err(Error::InvalidParameters(params.id));
                }

                Ok(Self {
                    group,
                    prime,
                    prime_len,
                    prime_bits: prime.bits(),
                    order,
                    arithmetic: Arithmetic::Ffc(FfcField::new(params, &prime, &order)?),
                })
            }
        }
    }

    /// Selected group.
    pub fn group(&self) -> Group {
        self.group
    }

    /// IANA group id.
    pub fn id(&self) -> u16 {
        self.group.id()
    }

    /// Is this an elliptic curve group?
    pub fn is_ecc(&self) -> bool {
        self.group.is_ecc()
    }

    /// Prime modulus.
    pub fn prime(&self) -> &Uint {
        &self.prime
    }

    /// Width of the prime, and of every scalar and coordinate, in bytes.
    pub fn prime_len(&self) -> usize {
        self.prime_len
    }

    /// Bit length of the prime.
    pub fn prime_bits(&self) -> usize {
        self.prime_bits
    }

    /// Group order.
    pub fn order(&self) -> &Uint {
        &self.order
    }

    /// Encoded element length: one coordinate for MODP, two for curves.
    pub fn element_len(&self) -> usize {
        if self.is_ecc() {
            2 * self.prime_len
        } else {
            self.prime_len
        }
    }

    /// Fixed-width encoding of `x`.
    pub(crate) fn encode_scalar(&self, x: &Uint) -> ScalarBytes {
        let mut out = ScalarBytes::zeroed(self.prime_len);
        scalar::encode(x, out.as_mut_slice());
        out
    }

    /// Fixed-width encoding of the prime.
    pub(crate) fn prime_bytes(&self) -> ScalarBytes {
        self.encode_scalar(&self.prime)
    }

    /// Test a hunting-and-pecking candidate value `x < p`.
    ///
    /// Returns the encoded element and whether it is usable. For curves the
    /// element is computed in constant time whether or not `x` is valid.
    pub(crate) fn pwe_candidate(&self, x: &[u8], y_is_odd: Choice) -> Result<(Element, Choice)> {
        match &self.arithmetic {
            Arithmetic::Ecc(curve) => curve.pwe_candidate(x, y_is_odd, self.element_len()),
            Arithmetic::Ffc(field) => field.pwe_candidate(x, self.prime_len),
        }
    }

    /// `inverse(scalar-op(mask, PWE))`
    pub(crate) fn commit_element(&self, pwe: &Element, mask: &Uint) -> Result<Element> {
        match &self.arithmetic {
            Arithmetic::Ecc(curve) => curve.commit_element(pwe, mask, self.element_len()),
            Arithmetic::Ffc(field) => field.commit_element(pwe, mask, self.prime_len),
        }
    }

    /// Reject peer elements that are not members of the group.
    pub(crate) fn validate_element(&self, element: &[u8]) -> Result<()> {
        match &self.arithmetic {
            Arithmetic::Ecc(curve) => curve.validate_element(element),
            Arithmetic::Ffc(field) => field.validate_element(element),
        }
    }

    /// `F(scalar-op(rand, elem-op(scalar-op(peer-scalar, PWE), peer-element)))`
    ///
    /// Fails with [`Error::IdentityElement`] when the shared point is the
    /// identity.
    pub(crate) fn shared_secret(
        &self,
        pwe: &Element,
        rand: &Uint,
        peer_scalar: &Uint,
        peer_element: &Element,
    ) -> Result<ScalarBytes> {
        match &self.arithmetic {
            Arithmetic::Ecc(curve) => {
                curve.shared_secret(pwe, rand, peer_scalar, peer_element, self.prime_len)
            }
            Arithmetic::Ffc(field) => {
                field.shared_secret(pwe, rand, peer_scalar, peer_element, self.prime_len)
            }
        }
    }
}

impl fmt::Debug for GroupContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupContext")
            .field("group", &self.group.id())
            .field("prime_len", &self.prime_len)
            .field("prime_bits", &self.prime_bits)
            .finish_non_exhaustive()
    }
}
