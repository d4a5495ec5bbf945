//! Finite field (MODP) groups.

mod modp;

use super::{Element, ScalarBytes};
use crate::{
    scalar::{self, Uint},
    Error, Result,
};
use bigint::modular::runtime_mod::{DynResidue, DynResidueParams};
use subtle::{Choice, ConstantTimeGreater};
use zeroize::Zeroizing;

const LIMBS: usize = Uint::LIMBS;

/// Parameters of a prime-order subgroup of `GF(p)*`.
#[derive(Debug, Eq, PartialEq)]
pub struct FfcParams {
    /// IANA group id.
    pub id: u16,

    /// Big-endian prime modulus `p`. Its length sets the element width.
    pub prime: &'static [u8],

    /// Big-endian subgroup order `r`, dividing `p - 1`.
    pub order: &'static [u8],

    /// Whether `r = (p - 1) / 2`.
    pub safe_prime: bool,
}

static GROUPS: [&FfcParams; 8] = [
    &modp::MODP_768,
    &modp::MODP_1024,
    &modp::MODP_1536,
    &modp::MODP_2048,
    &modp::MODP_3072,
    &modp::MODP_4096,
    &modp::MODP_6144,
    &modp::MODP_8192,
];

pub(super) fn lookup(id: u16) -> Option<&'static FfcParams> {
    GROUPS.iter().copied().find(|params| params.id == id)
}

/// Montgomery arithmetic modulo `p`.
#[derive(Clone)]
pub(super) struct FfcField {
    params: DynResidueParams<LIMBS>,
    prime: Uint,
    prime_bits: usize,
    order: Uint,
    /// `(p - 1) / r`
    cofactor: Uint,
    /// `p - 2`
    inverse_exponent: Uint,
}

impl FfcField {
    /// `prime` must be odd and `order` non-zero.
    pub(super) fn new(params: &FfcParams, prime: &Uint, order: &Uint) -> Result<Self> {
        let p_minus_1 = prime.wrapping_sub(&Uint::ONE);
        let cofactor = if params.safe_prime {
            Uint::from_u8(2)
        } else {
            if *order == Uint::ZERO {
                return Err(Error::InvalidParameters(params.id));
            }
            p_minus_1.wrapping_div(order)
        };

        Ok(Self {
            params: DynResidueParams::new(prime),
            prime: *prime,
            prime_bits: prime.bits(),
            order: *order,
            cofactor,
            inverse_exponent: p_minus_1.wrapping_sub(&Uint::ONE),
        })
    }

    /// `base^exponent mod p`, with running time fixed by `exponent_bits`.
    ///
    /// Montgomery intermediates are wiped; the caller owns the result.
    fn pow(&self, base: &Uint, exponent: &Uint, exponent_bits: usize) -> Uint {
        let base = Zeroizing::new(DynResidue::new(base, self.params));
        let power = Zeroizing::new(base.pow_bounded_exp(exponent, exponent_bits));
        power.retrieve()
    }

    fn element(&self, x: &Uint, len: usize) -> Element {
        let mut out = Element::zeroed(len);
        scalar::encode(x, out.as_mut_slice());
        out
    }

    /// `PWE = value^((p - 1) / r) mod p`, usable when greater than one.
    pub(super) fn pwe_candidate(&self, value: &[u8], len: usize) -> Result<(Element, Choice)> {
        let value = Zeroizing::new(scalar::decode(value)?);
        if *value >= self.prime {
            return Err(Error::Backend);
        }

        let pwe = Zeroizing::new(self.pow(&value, &self.cofactor, self.cofactor.bits()));
        let found = pwe.ct_gt(&Uint::ONE);
        Ok((self.element(&pwe, len), found))
    }

    /// `(PWE^mask)^-1 mod p`
    pub(super) fn commit_element(&self, pwe: &Element, mask: &Uint, len: usize) -> Result<Element> {
        let pwe = Zeroizing::new(scalar::decode(pwe.as_slice())?);
        let masked = Zeroizing::new(self.pow(&pwe, mask, self.prime_bits));
        let inverse = self.pow(&masked, &self.inverse_exponent, self.prime_bits);
        Ok(self.element(&inverse, len))
    }

    /// Range and subgroup membership: `1 < element < p` and `element^r = 1`.
    pub(super) fn validate_element(&self, element: &[u8]) -> Result<()> {
        let element = scalar::decode(element)?;
        if element <= Uint::ONE || element >= self.prime {
            return Err(Error::InvalidPeerElement);
        }

        if self.pow(&element, &self.order, self.order.bits()) != Uint::ONE {
            return Err(Error::InvalidPeerElement);
        }

        Ok(())
    }

    /// `((PWE^peer_scalar) * peer_element)^rand mod p`
    pub(super) fn shared_secret(
        &self,
        pwe: &Element,
        rand: &Uint,
        peer_scalar: &Uint,
        peer_element: &Element,
        len: usize,
    ) -> Result<ScalarBytes> {
        let pwe = Zeroizing::new(scalar::decode(pwe.as_slice())?);
        let peer_element = DynResidue::new(&scalar::decode(peer_element.as_slice())?, self.params);

        let pwe = Zeroizing::new(DynResidue::new(&pwe, self.params));
        let scaled = Zeroizing::new(pwe.pow_bounded_exp(peer_scalar, self.prime_bits));
        let base = Zeroizing::new(*scaled * peer_element);
        let shared = Zeroizing::new(base.pow_bounded_exp(rand, self.prime_bits));
        let shared = Zeroizing::new(shared.retrieve());
        if *shared <= Uint::ONE {
            return Err(Error::IdentityElement);
        }

        let mut out = ScalarBytes::zeroed(len);
        scalar::encode(&shared, out.as_mut_slice());
        Ok(out)
    }
}
