//! The closed catalog of Transform IDs this core recognizes, one enum per
//! algorithm family, as registered by IANA for each Transform Type.
//!
//! These enums carry no cryptography, just the on-wire identity of an
//! algorithm and (where IANA assigns more identifiers than this build
//! supports) a `TryFrom<u16>` that rejects the rest. `ike-keyagreement`
//! binds each supported variant to an actual implementation.

use serde::{Deserialize, Serialize};

use crate::params::UnparseableParameter;

/// Diffie-Hellman / Key Exchange Method group, Transform Type 4.
///
/// Only the two groups `ike-keyagreement` implements modular exponentiation
/// for are listed; IANA assigns others (768, 1536, the ECP curves) that this
/// closed catalog does not recognize.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, strum::EnumIter, Serialize, Deserialize)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum DiffieHellmanGroup {
    Modp1024 = 2,
    Modp2048 = 14,
}

impl DiffieHellmanGroup {
    /// The on-wire Transform ID for this group.
    pub fn transform_id(&self) -> u16 {
        *self as u16
    }
}

impl TryFrom<u16> for DiffieHellmanGroup {
    type Error = UnparseableParameter;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(DiffieHellmanGroup::Modp1024),
            14 => Ok(DiffieHellmanGroup::Modp2048),
            0 => Err(UnparseableParameter::Reserved),
            _ => Err(UnparseableParameter::Unassigned),
        }
    }
}

/// Encryption algorithm, Transform Type 1.
///
/// `AesCbc` requires a Key Length attribute; `Null` never carries one.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, strum::EnumIter, Serialize, Deserialize)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum EncryptionAlgorithm {
    Des = 2,
    TripleDes = 3,
    Null = 11,
    AesCbc = 12,
}

impl EncryptionAlgorithm {
    /// The on-wire Transform ID for this algorithm.
    pub fn transform_id(&self) -> u16 {
        *self as u16
    }

    /// Whether this algorithm requires a Key Length attribute to fully
    /// identify a concrete cipher (true for variable-key-size ciphers).
    pub fn requires_key_length(&self) -> bool {
        matches!(self, EncryptionAlgorithm::AesCbc)
    }
}

impl TryFrom<u16> for EncryptionAlgorithm {
    type Error = UnparseableParameter;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(EncryptionAlgorithm::Des),
            3 => Ok(EncryptionAlgorithm::TripleDes),
            11 => Ok(EncryptionAlgorithm::Null),
            12 => Ok(EncryptionAlgorithm::AesCbc),
            0 => Err(UnparseableParameter::Reserved),
            _ => Err(UnparseableParameter::Unassigned),
        }
    }
}

/// Integrity algorithm, Transform Type 3.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, strum::EnumIter, Serialize, Deserialize)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum IntegrityAlgorithm {
    HmacMd5_96 = 1,
    HmacSha1_96 = 2,
    HmacSha2_256_128 = 12,
}

impl IntegrityAlgorithm {
    /// The on-wire Transform ID for this algorithm.
    pub fn transform_id(&self) -> u16 {
        *self as u16
    }
}

impl TryFrom<u16> for IntegrityAlgorithm {
    type Error = UnparseableParameter;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(IntegrityAlgorithm::HmacMd5_96),
            2 => Ok(IntegrityAlgorithm::HmacSha1_96),
            12 => Ok(IntegrityAlgorithm::HmacSha2_256_128),
            0 => Err(UnparseableParameter::Reserved),
            _ => Err(UnparseableParameter::Unassigned),
        }
    }
}

/// Pseudorandom function, Transform Type 2.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, strum::EnumIter, Serialize, Deserialize)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum PseudoRandomFunction {
    HmacMd5 = 1,
    HmacSha1 = 2,
    HmacSha2_256 = 5,
}

impl PseudoRandomFunction {
    /// The on-wire Transform ID for this function.
    pub fn transform_id(&self) -> u16 {
        *self as u16
    }
}

impl TryFrom<u16> for PseudoRandomFunction {
    type Error = UnparseableParameter;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PseudoRandomFunction::HmacMd5),
            2 => Ok(PseudoRandomFunction::HmacSha1),
            5 => Ok(PseudoRandomFunction::HmacSha2_256),
            0 => Err(UnparseableParameter::Reserved),
            _ => Err(UnparseableParameter::Unassigned),
        }
    }
}

/// Extended Sequence Numbers indicator, Transform Type 5.
///
/// Only meaningful for Child SA proposals.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash, strum::EnumIter, Serialize, Deserialize)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum ExtendedSequenceNumbers {
    NoEsn = 0,
    Esn = 1,
}

impl ExtendedSequenceNumbers {
    /// The on-wire Transform ID for this indicator.
    pub fn transform_id(&self) -> u16 {
        *self as u16
    }

    /// Whether this indicator enables extended sequence numbers.
    pub fn is_enabled(&self) -> bool {
        matches!(self, ExtendedSequenceNumbers::Esn)
    }
}

impl TryFrom<u16> for ExtendedSequenceNumbers {
    type Error = UnparseableParameter;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ExtendedSequenceNumbers::NoEsn),
            1 => Ok(ExtendedSequenceNumbers::Esn),
            _ => Err(UnparseableParameter::Unassigned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn round_trip_every_variant() {
        for group in DiffieHellmanGroup::iter() {
            assert_eq!(DiffieHellmanGroup::try_from(group.transform_id()), Ok(group));
        }
        for encr in EncryptionAlgorithm::iter() {
            assert_eq!(EncryptionAlgorithm::try_from(encr.transform_id()), Ok(encr));
        }
        for integ in IntegrityAlgorithm::iter() {
            assert_eq!(IntegrityAlgorithm::try_from(integ.transform_id()), Ok(integ));
        }
        for prf in PseudoRandomFunction::iter() {
            assert_eq!(PseudoRandomFunction::try_from(prf.transform_id()), Ok(prf));
        }
        for esn in ExtendedSequenceNumbers::iter() {
            assert_eq!(ExtendedSequenceNumbers::try_from(esn.transform_id()), Ok(esn));
        }
    }

    #[test]
    fn aes_cbc_requires_key_length() {
        assert!(EncryptionAlgorithm::AesCbc.requires_key_length());
        assert!(!EncryptionAlgorithm::Null.requires_key_length());
    }
}
