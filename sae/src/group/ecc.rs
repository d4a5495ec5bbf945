//! NIST prime curves.

use super::{Element, ScalarBytes};
use crate::{
    scalar::{self, Uint},
    Error, Result,
};
use elliptic_curve::{
    ff::PrimeField,
    generic_array::typenum::Unsigned,
    group::{Curve as _, Group as _},
    point::{AffineCoordinates, DecompressPoint},
    sec1::{EncodedPoint, FromEncodedPoint, ModulusSize, ToEncodedPoint},
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq},
    AffinePoint, CurveArithmetic, FieldBytes, FieldBytesSize, ProjectivePoint, Scalar,
};
use hex_literal::hex;
use p256::NistP256;
use p384::NistP384;
use p521::NistP521;
use zeroize::{Zeroize, Zeroizing};

macro_rules! with_curve {
    ($curve:expr, $func:ident($($arg:expr),*)) => {
        match $curve {
            EccCurve::P256 => $func::<NistP256>($($arg),*),
            EccCurve::P384 => $func::<NistP384>($($arg),*),
            EccCurve::P521 => $func::<NistP521>($($arg),*),
        }
    };
}

const P256_PRIME: [u8; 32] =
    hex!("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");
const P256_ORDER: [u8; 32] =
    hex!("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551");

const P384_PRIME: [u8; 48] = hex!(
    "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe"
    "ffffffff0000000000000000ffffffff"
);
const P384_ORDER: [u8; 48] = hex!(
    "ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf"
    "581a0db248b0a77aecec196accc52973"
);

const P521_PRIME: [u8; 66] = hex!(
    "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
    "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
    "ffff"
);
const P521_ORDER: [u8; 66] = hex!(
    "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
    "fffa51868783bf2f966b7fcc0148f709a5d03bb5c9b8899c47aebb6fb71e9138"
    "6409"
);

/// Supported elliptic curves.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EccCurve {
    /// NIST P-256, group 19.
    P256,
    /// NIST P-384, group 20.
    P384,
    /// NIST P-521, group 21.
    P521,
}

impl EccCurve {
    /// Curve for an IANA group id.
    pub fn from_id(id: u16) -> Option<Self> {
        match id {
            19 => Some(EccCurve::P256),
            20 => Some(EccCurve::P384),
            21 => Some(EccCurve::P521),
            _ => None,
        }
    }

    /// IANA group id.
    pub fn id(self) -> u16 {
        match self {
            EccCurve::P256 => 19,
            EccCurve::P384 => 20,
            EccCurve::P521 => 21,
        }
    }

    /// Big-endian field modulus.
    pub fn prime(self) -> &'static [u8] {
        match self {
            EccCurve::P256 => &P256_PRIME,
            EccCurve::P384 => &P384_PRIME,
            EccCurve::P521 => &P521_PRIME,
        }
    }

    /// Big-endian order of the base point.
    pub fn order(self) -> &'static [u8] {
        match self {
            EccCurve::P256 => &P256_ORDER,
            EccCurve::P384 => &P384_ORDER,
            EccCurve::P521 => &P521_ORDER,
        }
    }

    pub(super) fn pwe_candidate(
        self,
        x: &[u8],
        y_is_odd: Choice,
        len: usize,
    ) -> Result<(Element, Choice)> {
        with_curve!(self, pwe_candidate(x, y_is_odd, len))
    }

    pub(super) fn commit_element(self, pwe: &Element, mask: &Uint, len: usize) -> Result<Element> {
        with_curve!(self, commit_element(pwe, mask, len))
    }

    pub(super) fn validate_element(self, element: &[u8]) -> Result<()> {
        with_curve!(self, validate_element(element))
    }

    pub(super) fn shared_secret(
        self,
        pwe: &Element,
        rand: &Uint,
        peer_scalar: &Uint,
        peer_element: &Element,
        len: usize,
    ) -> Result<ScalarBytes> {
        with_curve!(self, shared_secret(pwe, rand, peer_scalar, peer_element, len))
    }
}

/// Solve the curve equation for `x`, choosing `y` by parity.
///
/// A non-residue yields the encoded base point alongside a false `Choice`,
/// so the work done does not depend on the outcome. A decompressed point is
/// never the identity, which doubles as the failure marker.
fn pwe_candidate<C>(x: &[u8], y_is_odd: Choice, len: usize) -> Result<(Element, Choice)>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: DecompressPoint<C> + FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    if x.len() != FieldBytesSize::<C>::USIZE {
        return Err(Error::Backend);
    }

    let mut x = FieldBytes::<C>::clone_from_slice(x);
    let identity = AffinePoint::<C>::default();
    let mut point =
        Zeroizing::new(AffinePoint::<C>::decompress(&x, y_is_odd).unwrap_or(identity));
    AsMut::<[u8]>::as_mut(&mut x).zeroize();
    let found = !point.ct_eq(&identity);
    point.conditional_assign(&ProjectivePoint::<C>::generator().to_affine(), !found);
    Ok((encode_point::<C>(&point, len)?, found))
}

fn commit_element<C>(pwe: &Element, mask: &Uint, len: usize) -> Result<Element>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: DecompressPoint<C> + FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    let pwe = decode_secret_point::<C>(pwe.as_slice())?;
    let mask = Zeroizing::new(to_scalar::<C>(mask)?);
    let element = -(*pwe * *mask);
    encode_point::<C>(&element.to_affine(), len)
}

fn shared_secret<C>(
    pwe: &Element,
    rand: &Uint,
    peer_scalar: &Uint,
    peer_element: &Element,
    len: usize,
) -> Result<ScalarBytes>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: DecompressPoint<C> + FromEncodedPoint<C> + ToEncodedPoint<C>,
{
    let pwe = decode_secret_point::<C>(pwe.as_slice())?;
    let peer_element = ProjectivePoint::<C>::from(decode_point::<C>(peer_element.as_slice())?);
    let rand = Zeroizing::new(to_scalar::<C>(rand)?);
    let peer_scalar = to_scalar::<C>(peer_scalar)?;

    let scaled = Zeroizing::new(*pwe * peer_scalar + peer_element);
    let shared = Zeroizing::new(*scaled * *rand);
    if bool::from(shared.is_identity()) {
        return Err(Error::IdentityElement);
    }

    let affine = Zeroizing::new(shared.to_affine());
    let mut x = affine.x();
    let ret = if x.len() == len {
        ScalarBytes::from_slice(&x).ok_or(Error::Backend)
    } else {
        Err(Error::Backend)
    };
    AsMut::<[u8]>::as_mut(&mut x).zeroize();
    ret
}

fn validate_element<C>(bytes: &[u8]) -> Result<()>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: FromEncodedPoint<C>,
{
    decode_point::<C>(bytes).map(|_| ())
}

/// [`decode_point`] for secret points, wiped on drop.
fn decode_secret_point<C>(bytes: &[u8]) -> Result<Zeroizing<ProjectivePoint<C>>>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: FromEncodedPoint<C>,
{
    let affine = Zeroizing::new(decode_point::<C>(bytes)?);
    Ok(Zeroizing::new(ProjectivePoint::<C>::from(*affine)))
}

/// Parse an uncompressed `x ‖ y` encoding, checking it lies on the curve.
fn decode_point<C>(bytes: &[u8]) -> Result<AffinePoint<C>>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: FromEncodedPoint<C>,
{
    let len = FieldBytesSize::<C>::USIZE;
    if bytes.len() != 2 * len {
        return Err(Error::InvalidPeerElement);
    }

    let (x, y) = bytes.split_at(len);
    let encoded = EncodedPoint::<C>::from_affine_coordinates(
        &FieldBytes::<C>::clone_from_slice(x),
        &FieldBytes::<C>::clone_from_slice(y),
        false,
    );
    Option::from(AffinePoint::<C>::from_encoded_point(&encoded)).ok_or(Error::InvalidPeerElement)
}

fn encode_point<C>(point: &AffinePoint<C>, len: usize) -> Result<Element>
where
    C: CurveArithmetic,
    FieldBytesSize<C>: ModulusSize,
    AffinePoint<C>: ToEncodedPoint<C>,
{
    let encoded = point.to_encoded_point(false);
    let (x, y) = match (encoded.x(), encoded.y()) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(Error::IdentityElement),
    };
    if x.len() + y.len() != len {
        return Err(Error::Backend);
    }

    let mut out = Element::zeroed(len);
    let (out_x, out_y) = out.as_mut_slice().split_at_mut(x.len());
    out_x.copy_from_slice(x);
    out_y.copy_from_slice(y);
    Ok(out)
}

fn to_scalar<C>(x: &Uint) -> Result<Scalar<C>>
where
    C: CurveArithmetic,
{
    let mut repr = FieldBytes::<C>::default();
    scalar::encode(x, &mut repr);
    let ret = Option::from(Scalar::<C>::from_repr(repr.clone())).ok_or(Error::Backend);
    AsMut::<[u8]>::as_mut(&mut repr).zeroize();
    ret
}
