#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

//! ## Usage
//!
//! Both stations select the same group, derive their commits from the shared
//! password and exchange them:
//!
#![cfg_attr(all(feature = "alloc", feature = "getrandom"), doc = "```")]
#![cfg_attr(not(all(feature = "alloc", feature = "getrandom")), doc = "```ignore")]
//! # fn main() -> sae::Result<()> {
//! use sae::{rand_core::OsRng, Session, State};
//!
//! let sta = [0x02, 0, 0, 0, 0, 0x01];
//! let ap = [0x02, 0, 0, 0, 0, 0x02];
//!
//! let mut alice = Session::new();
//! let mut bob = Session::new();
//! alice.set_group(19)?;
//! bob.set_group(19)?;
//! alice.prepare_commit(&sta, &ap, b"password", &mut OsRng)?;
//! bob.prepare_commit(&ap, &sta, b"password", &mut OsRng)?;
//!
//! let commit = alice.commit_to_vec(None)?;
//! bob.parse_commit(&commit, None)?;
//! let commit = bob.commit_to_vec(None)?;
//! alice.parse_commit(&commit, None)?;
//!
//! alice.process_commit()?;
//! bob.process_commit()?;
//!
//! let confirm = alice.write_confirm()?;
//! bob.check_confirm(&confirm)?;
//! bob.set_state(State::Accepted);
//!
//! assert_eq!(alice.pmk(), bob.pmk());
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

mod commit;
mod confirm;
mod error;
mod keys;
mod octets;
mod session;

pub mod group;
pub mod kdf;
pub mod pwe;
pub mod scalar;

#[cfg(any(feature = "test-vectors", test))]
pub mod test_vectors;

pub use crate::{
    confirm::CONFIRM_LEN,
    error::{Error, ErrorKind, Result, StatusCode},
    group::{EccCurve, Element, FfcParams, Group, GroupContext, ScalarBytes, MAX_PRIME_LEN},
    keys::{SessionKeys, KCK_LEN, PMKID_LEN, PMK_LEN},
    octets::Octets,
    session::{Session, State},
};
pub use rand_core;

/// IEEE 802 MAC address.
pub type MacAddress = [u8; 6];
