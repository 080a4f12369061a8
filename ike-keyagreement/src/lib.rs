//! # ike-keyagreement
//!
//! The cryptographic key-agreement and key-derivation core of an IKEv2
//! security association establishment subsystem (RFC 7296 §1.3, §1.4,
//! §2.14, §2.17).
//!
//! Given a selected [`Proposal`](ike_transforms::Proposal) from
//! `ike-transforms`, this crate performs the Diffie-Hellman exchange,
//! computes SKEYSEED, and expands it via PRF+ into the seven keys that
//! bind an IKE SA ([`new_ike_sa_key`]). From there, [`generate_key_for_child_sa`]
//! expands the IKE SA's key-derivation state into the four directional
//! keys that bind a Child SA.
//!
//! Full IKE message parsing, IPsec/ESP packet processing, peer
//! authentication, and SA rekeying orchestration are out of scope: this
//! crate only ever sees already-decoded proposals and already-established
//! nonces/SPIs, and returns derived key material and initialized
//! cryptographic primitives for those collaborators to use.

#![warn(missing_docs, clippy::unwrap_used, clippy::expect_used)]

pub mod ca;
pub mod childsa;
pub mod dh;
pub mod encr;
pub mod error;
pub mod ikesa;
pub mod integ;
pub mod prf;
pub mod random;


pub use ca::compare_root_certificate;
pub use childsa::{generate_key_for_child_sa, ChildSaKey};
pub use error::KeyAgreementError;
pub use ikesa::{new_ike_sa_key, IkeSaKey};
