//! # ike-transforms
//!
//! Wire-level definitions for IKEv2 transforms and proposals, as defined by
//! RFC 7296 section 3.3 and the IANA IKEv2 parameters registry.
//!
//! This crate carries no cryptography. It is the closed catalog of
//! algorithm identifiers plus the narrow wire shape needed to decode a
//! single Transform record and re-encode a chosen Proposal. Turning a
//! catalog entry into something that can actually perform Diffie-Hellman,
//! encrypt, or compute a MAC is the job of `ike-keyagreement`.

#![warn(missing_docs, clippy::unwrap_used, clippy::expect_used)]

pub mod attribute;
pub mod catalog;
pub mod params;
pub mod proposal;
pub mod transform;

pub use attribute::Attribute;
pub use catalog::{
    DiffieHellmanGroup, EncryptionAlgorithm, ExtendedSequenceNumbers, IntegrityAlgorithm,
    PseudoRandomFunction,
};
pub use proposal::Proposal;
pub use transform::{Transform, TransformError};

pub use strum;
pub use zerocopy;
