//! Error types

use core::fmt::{self, Display};

/// Result type with the `sae` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// IEEE 802.11 status codes produced by the SAE core.
///
/// These are suitable for direct inclusion in an Authentication frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u16)]
pub enum StatusCode {
    /// `WLAN_STATUS_SUCCESS`
    Success = 0,
    /// `WLAN_STATUS_UNSPECIFIED_FAILURE`
    UnspecifiedFailure = 1,
    /// `WLAN_STATUS_ANTI_CLOGGING_TOKEN_REQ`
    AntiCloggingTokenRequired = 76,
    /// `WLAN_STATUS_FINITE_CYCLIC_GROUP_NOT_SUPPORTED`
    FiniteCyclicGroupNotSupported = 77,
}

impl From<StatusCode> for u16 {
    fn from(code: StatusCode) -> u16 {
        code as u16
    }
}

/// Broad classes of failure.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Unsupported or over-sized group.
    Configuration,
    /// Arithmetic or randomness failure.
    Resource,
    /// Truncated messages or out-of-range scalars and elements.
    MalformedInput,
    /// The peer did something the protocol forbids.
    ProtocolViolation,
}

/// SAE errors.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Group id is neither a supported curve nor a supported MODP group.
    UnsupportedGroup(u16),

    /// The group's prime does not fit in [`MAX_PRIME_LEN`][crate::MAX_PRIME_LEN] bytes.
    PrimeTooLarge {
        /// Group id.
        group: u16,
        /// Length of the prime in bytes.
        prime_len: usize,
    },

    /// Custom group parameters are unusable (even or zero prime, empty order).
    InvalidParameters(u16),

    /// No group has been selected.
    NoGroup,

    /// Random scalar rejection sampling gave up.
    RandomGeneration,

    /// Hunting and pecking exhausted its counters.
    PweNotFound,

    /// Arithmetic produced an unusable value.
    Backend,

    /// Input ended early.
    Truncated {
        /// Bytes required.
        needed: usize,
        /// Bytes present.
        available: usize,
    },

    /// Output buffer cannot hold the message.
    BufferTooSmall {
        /// Bytes required.
        needed: usize,
        /// Bytes present.
        available: usize,
    },

    /// Peer scalar outside `(0, order)`.
    InvalidPeerScalar,

    /// Peer element coordinate `>= prime`, off the curve, or trivial.
    InvalidPeerElement,

    /// Group id absent from the caller's allow-list.
    GroupNotAllowed(u16),

    /// Peer proposed a different group after we committed.
    GroupChangeForbidden {
        /// Group in use.
        current: u16,
        /// Group in the received Commit.
        proposed: u16,
    },

    /// MODP groups must be explicitly enabled through an allow-list.
    FfcNotEnabled(u16),

    /// Peer re-sent the scalar of an accepted exchange.
    ReusedPeerScalar,

    /// Shared secret `K` is the identity element.
    IdentityElement,

    /// Confirm MAC did not verify.
    ConfirmMismatch,

    /// Own commit requires a password element.
    MissingPwe,

    /// Own and peer commit values are both required.
    MissingCommit,

    /// KCK and PMK have not been derived.
    MissingKeys,

    /// The send-confirm counter cannot be incremented further.
    SendConfirmExhausted,
}

impl Error {
    /// Status code to report to the peer.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::UnsupportedGroup(_)
            | Error::PrimeTooLarge { .. }
            | Error::InvalidParameters(_)
            | Error::GroupNotAllowed(_)
            | Error::GroupChangeForbidden { .. }
            | Error::FfcNotEnabled(_) => StatusCode::FiniteCyclicGroupNotSupported,
            _ => StatusCode::UnspecifiedFailure,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedGroup(_)
            | Error::PrimeTooLarge { .. }
            | Error::InvalidParameters(_)
            | Error::NoGroup => ErrorKind::Configuration,
            Error::RandomGeneration | Error::PweNotFound | Error::Backend => ErrorKind::Resource,
            Error::Truncated { .. }
            | Error::BufferTooSmall { .. }
            | Error::InvalidPeerScalar
            | Error::InvalidPeerElement => ErrorKind::MalformedInput,
            Error::GroupNotAllowed(_)
            | Error::GroupChangeForbidden { .. }
            | Error::FfcNotEnabled(_)
            | Error::ReusedPeerScalar
            | Error::IdentityElement
            | Error::ConfirmMismatch
            | Error::MissingPwe
            | Error::MissingCommit
            | Error::MissingKeys
            | Error::SendConfirmExhausted => ErrorKind::ProtocolViolation,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedGroup(id) => write!(f, "unsupported group {id}"),
            Error::PrimeTooLarge { group, prime_len } => {
                write!(f, "group {group} prime is {prime_len} bytes, too large")
            }
            Error::InvalidParameters(id) => write!(f, "invalid parameters for group {id}"),
            Error::NoGroup => f.write_str("no group selected"),
            Error::RandomGeneration => f.write_str("could not generate random scalar"),
            Error::PweNotFound => f.write_str("password element not found"),
            Error::Backend => f.write_str("arithmetic error"),
            Error::Truncated { needed, available } => {
                write!(f, "message truncated: need {needed} bytes, have {available}")
            }
            Error::BufferTooSmall { needed, available } => {
                write!(f, "buffer too small: need {needed} bytes, have {available}")
            }
            Error::InvalidPeerScalar => f.write_str("invalid peer scalar"),
            Error::InvalidPeerElement => f.write_str("invalid peer element"),
            Error::GroupNotAllowed(id) => write!(f, "group {id} not allowed"),
            Error::GroupChangeForbidden { current, proposed } => {
                write!(f, "peer changed group from {current} to {proposed}")
            }
            Error::FfcNotEnabled(id) => write!(f, "MODP group {id} not enabled"),
            Error::ReusedPeerScalar => f.write_str("peer reused commit scalar"),
            Error::IdentityElement => f.write_str("shared secret is the identity element"),
            Error::ConfirmMismatch => f.write_str("confirm mismatch"),
            Error::MissingPwe => f.write_str("password element not derived"),
            Error::MissingCommit => f.write_str("commit values missing"),
            Error::MissingKeys => f.write_str("session keys not derived"),
            Error::SendConfirmExhausted => f.write_str("send-confirm counter exhausted"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, StatusCode};

    #[test]
    fn group_errors_map_to_77() {
        for err in [
            Error::UnsupportedGroup(99),
            Error::GroupNotAllowed(19),
            Error::FfcNotEnabled(15),
            Error::GroupChangeForbidden {
                current: 19,
                proposed: 20,
            },
        ] {
            assert_eq!(err.status_code(), StatusCode::FiniteCyclicGroupNotSupported);
            assert_eq!(u16::from(err.status_code()), 77);
        }
    }

    #[test]
    fn other_errors_map_to_1() {
        for err in [
            Error::ReusedPeerScalar,
            Error::ConfirmMismatch,
            Error::Truncated {
                needed: 98,
                available: 2,
            },
        ] {
            assert_eq!(u16::from(err.status_code()), 1);
        }
        assert_eq!(Error::ConfirmMismatch.kind(), ErrorKind::ProtocolViolation);
        assert_eq!(Error::InvalidPeerScalar.kind(), ErrorKind::MalformedInput);
    }
}
