//! A single Transform record: one algorithm choice within one family,
//! as per RFC 7296 section 3.3.2.

use std::mem::size_of;

use thiserror::Error;
use zerocopy::network_endian::U16;
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

use crate::attribute::Attribute;
use crate::catalog::{
    DiffieHellmanGroup, EncryptionAlgorithm, ExtendedSequenceNumbers, IntegrityAlgorithm,
    PseudoRandomFunction,
};
use crate::params::TransformType;

/// Wire layout of a Transform header, not including its attributes.
///
///                          1                   2                   3
///      0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///     | Last Substruc |   RESERVED    |        Transform Length       |
///     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///     |Transform Type |   RESERVED    |          Transform ID         |
///     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
#[derive(Debug, FromBytes, FromZeroes, AsBytes, Unaligned, Copy, Clone)]
#[repr(C, packed)]
pub struct TransformHeader {
    /// 0 if this is the last transform of the proposal, 3 otherwise
    pub last_substruct: u8,
    /// Reserved, must be zero
    pub reserved: u8,
    /// Length in octets of this Transform, including the header
    pub transform_length: U16,
    /// Which of the five algorithm families this Transform belongs to
    pub transform_type: u8,
    /// Reserved, must be zero
    pub reserved2: u8,
    /// The algorithm identifier inside the family named by `transform_type`
    pub transform_id: U16,
}

/// A decoded Transform: one algorithm choice from one of the five families
/// the Transform Registry recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Diffie-Hellman / Key Exchange Method group
    DiffieHellman(DiffieHellmanGroup),
    /// Encryption algorithm, with an optional key length in bits for
    /// variable-key-size ciphers
    Encryption(EncryptionAlgorithm, Option<u16>),
    /// Integrity algorithm
    Integrity(IntegrityAlgorithm),
    /// Pseudorandom function
    PseudoRandomFunction(PseudoRandomFunction),
    /// Extended Sequence Numbers indicator (Child SA only)
    ExtendedSequenceNumbers(ExtendedSequenceNumbers),
}

/// Failure while decoding or encoding a Transform record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    /// The Transform ID is not recognized within its family
    #[error("unsupported transform: type {transform_type:?}, id {transform_id}")]
    UnsupportedTransform {
        /// The family the unrecognized Transform ID was found in
        transform_type: TransformType,
        /// The offending Transform ID
        transform_id: u16,
    },
    /// The attribute payload could not be parsed
    #[error("unparseable attribute payload")]
    UnparseableAttribute,
    /// A required Key Length attribute was missing
    #[error("missing required key length attribute for transform id {transform_id}")]
    MissingKeyLength {
        /// The Transform ID that requires a Key Length attribute
        transform_id: u16,
    },
    /// An attribute could not be represented on the wire
    #[error("could not encode attribute for transform id {transform_id}")]
    EncodingFailure {
        /// The Transform ID whose attribute could not be encoded
        transform_id: u16,
    },
}

impl Transform {
    /// The wire Transform Type this Transform belongs to
    pub fn transform_type(&self) -> TransformType {
        match self {
            Transform::DiffieHellman(_) => TransformType::DiffieHellmanGroup,
            Transform::Encryption(..) => TransformType::EncryptionAlgorithm,
            Transform::Integrity(_) => TransformType::IntegrityAlgorithm,
            Transform::PseudoRandomFunction(_) => TransformType::PseudoRandomFunction,
            Transform::ExtendedSequenceNumbers(_) => TransformType::ExtendedSequenceNumbers,
        }
    }

    /// Encode this Transform into its on-wire byte representation.
    ///
    /// `last` indicates whether this is the final Transform in its
    /// Proposal (true) or whether another Transform follows (false).
    pub fn build(&self, last: bool) -> Result<Vec<u8>, TransformError> {
        let (transform_id, attributes) = match self {
            Transform::DiffieHellman(group) => (group.transform_id(), vec![]),
            Transform::Encryption(algorithm, key_length) => {
                let attrs = match (algorithm.requires_key_length(), key_length) {
                    (true, Some(bits)) => Attribute::KeyLength(*bits).build(),
                    (true, None) => {
                        return Err(TransformError::MissingKeyLength {
                            transform_id: algorithm.transform_id(),
                        })
                    }
                    (false, _) => vec![],
                };
                (algorithm.transform_id(), attrs)
            }
            Transform::Integrity(algorithm) => (algorithm.transform_id(), vec![]),
            Transform::PseudoRandomFunction(function) => (function.transform_id(), vec![]),
            Transform::ExtendedSequenceNumbers(esn) => (esn.transform_id(), vec![]),
        };

        let header_len = size_of::<TransformHeader>();
        let packet_length = (header_len + attributes.len()) as u16;
        let header = TransformHeader {
            last_substruct: if last { 0 } else { 3 },
            reserved: 0,
            transform_length: U16::from(packet_length),
            transform_type: self.transform_type() as u8,
            reserved2: 0,
            transform_id: U16::new(transform_id),
        };

        let mut packet = Vec::with_capacity(packet_length as usize);
        packet.extend_from_slice(header.as_bytes());
        packet.extend(attributes);
        Ok(packet)
    }

    /// Decode a Transform from its family, Transform ID, and already-parsed
    /// attributes.
    ///
    /// This is the Transform Registry's Decode direction: callers outside
    /// this crate are expected to have already split a raw byte buffer into
    /// a `TransformHeader` and a list of attribute words; this function
    /// only resolves the (type, id, attributes) triple against the closed
    /// catalog.
    pub fn try_decode(
        transform_type: TransformType,
        transform_id: u16,
        attributes: &[Attribute],
    ) -> Result<Self, TransformError> {
        let unsupported = || TransformError::UnsupportedTransform {
            transform_type,
            transform_id,
        };

        match transform_type {
            TransformType::DiffieHellmanGroup => DiffieHellmanGroup::try_from(transform_id)
                .map(Transform::DiffieHellman)
                .map_err(|_| unsupported()),
            TransformType::EncryptionAlgorithm => {
                let algorithm =
                    EncryptionAlgorithm::try_from(transform_id).map_err(|_| unsupported())?;
                let key_length = attributes.iter().find_map(|attr| {
                    let Attribute::KeyLength(bits) = attr;
                    Some(*bits)
                });
                if algorithm.requires_key_length() && key_length.is_none() {
                    return Err(TransformError::MissingKeyLength { transform_id });
                }
                Ok(Transform::Encryption(algorithm, key_length))
            }
            TransformType::IntegrityAlgorithm => IntegrityAlgorithm::try_from(transform_id)
                .map(Transform::Integrity)
                .map_err(|_| unsupported()),
            TransformType::PseudoRandomFunction => PseudoRandomFunction::try_from(transform_id)
                .map(Transform::PseudoRandomFunction)
                .map_err(|_| unsupported()),
            TransformType::ExtendedSequenceNumbers => ExtendedSequenceNumbers::try_from(
                transform_id,
            )
            .map(Transform::ExtendedSequenceNumbers)
            .map_err(|_| unsupported()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_exchange() {
        let t = Transform::DiffieHellman(DiffieHellmanGroup::Modp2048);
        assert_eq!(
            t.build(true).unwrap(),
            vec![0x00, 0x00, 0x00, 0x08, 0x04, 0x00, 0x00, 0x0e]
        );
        assert_eq!(
            t.build(false).unwrap(),
            vec![0x03, 0x00, 0x00, 0x08, 0x04, 0x00, 0x00, 0x0e]
        );
    }

    #[test]
    fn encryption_with_key_length() {
        let t = Transform::Encryption(EncryptionAlgorithm::AesCbc, Some(128));
        assert_eq!(
            t.build(false).unwrap(),
            vec![0x03, 0x00, 0x00, 0x0c, 0x01, 0x00, 0x00, 0x0c, 0x80, 0x0e, 0x00, 0x80]
        );
    }

    #[test]
    fn encryption_missing_key_length_rejected() {
        let t = Transform::Encryption(EncryptionAlgorithm::AesCbc, None);
        assert!(t.build(true).is_err());
    }

    #[test]
    fn decode_round_trips_encode() {
        let t = Transform::Encryption(EncryptionAlgorithm::AesCbc, Some(256));
        let decoded = Transform::try_decode(
            TransformType::EncryptionAlgorithm,
            EncryptionAlgorithm::AesCbc.transform_id(),
            &[Attribute::KeyLength(256)],
        )
        .unwrap();
        assert_eq!(t, decoded);
    }

    #[test]
    fn decode_unsupported_id() {
        let err =
            Transform::try_decode(TransformType::DiffieHellmanGroup, 0xffff, &[]).unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedTransform { .. }));
    }
}
