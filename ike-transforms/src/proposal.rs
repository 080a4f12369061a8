//! A Proposal: an ordered, protocol-scoped collection of Transforms,
//! grouped by family, as per RFC 7296 section 3.3.1.
//!
//! The core always consumes the first (index 0) entry of each group; the
//! remaining entries exist only so a peer's full offer can be represented
//! before a choice is made.

use std::mem::size_of;

use serde::{Deserialize, Serialize};
use zerocopy::network_endian::U16;
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

use crate::catalog::{
    DiffieHellmanGroup, EncryptionAlgorithm, ExtendedSequenceNumbers, IntegrityAlgorithm,
    PseudoRandomFunction,
};
use crate::params::ProtocolId;
use crate::transform::{Transform, TransformError};

/// Wire layout of a Proposal header, not including its SPI or Transforms.
#[derive(Debug, FromBytes, FromZeroes, AsBytes, Unaligned, Copy, Clone)]
#[repr(C, packed)]
pub struct ProposalHeader {
    /// 0 if this is the last proposal of the Security Association, 2 otherwise
    pub last_substruct: u8,
    /// Reserved, must be zero
    pub reserved: u8,
    /// Length in octets of this Proposal, including the header
    pub proposal_length: U16,
    /// 1-based, strictly incrementing number of this Proposal
    pub proposal_num: u8,
    /// The security protocol this Proposal negotiates transforms for
    pub protocol_id: u8,
    /// Length of the SPI field in octets
    pub spi_size: u8,
    /// Number of Transform records following the SPI
    pub num_transforms: u8,
}

/// An ordered collection of Transforms, grouped by family, scoped to one
/// security protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Security protocol this proposal negotiates transforms for
    pub protocol: ProtocolId,
    /// The proposing entity's SPI, empty during initial IKE SA negotiation
    pub spi: Vec<u8>,
    /// Offered Diffie-Hellman groups, in preference order
    pub diffie_hellman_groups: Vec<DiffieHellmanGroup>,
    /// Offered encryption algorithms (with key length, where required), in preference order
    pub encryption_algorithms: Vec<(EncryptionAlgorithm, Option<u16>)>,
    /// Offered integrity algorithms, in preference order
    pub integrity_algorithms: Vec<IntegrityAlgorithm>,
    /// Offered pseudorandom functions, in preference order
    pub pseudo_random_functions: Vec<PseudoRandomFunction>,
    /// Offered Extended Sequence Numbers indicators (Child SA only), in preference order
    pub extended_sequence_numbers: Vec<ExtendedSequenceNumbers>,
}

// serde can't derive on ProtocolId without deriving itself; provide a
// minimal manual impl keyed on the discriminant so Proposal stays
// serializable the way the rest of the stack expects.
impl Serialize for ProtocolId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for ProtocolId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        ProtocolId::try_from(value).map_err(|_| serde::de::Error::custom("unknown protocol id"))
    }
}

impl Proposal {
    /// Construct a new, empty Proposal for the given protocol and SPI.
    pub fn new_empty(protocol: ProtocolId, spi: Option<Vec<u8>>) -> Self {
        Self {
            protocol,
            spi: spi.unwrap_or_default(),
            diffie_hellman_groups: vec![],
            encryption_algorithms: vec![],
            integrity_algorithms: vec![],
            pseudo_random_functions: vec![],
            extended_sequence_numbers: vec![],
        }
    }

    /// Add transforms to this proposal, sorting each into the group matching its family.
    pub fn add(&mut self, transforms: Vec<Transform>) {
        for transform in transforms {
            match transform {
                Transform::DiffieHellman(group) => self.diffie_hellman_groups.push(group),
                Transform::Encryption(algorithm, key_length) => {
                    self.encryption_algorithms.push((algorithm, key_length))
                }
                Transform::Integrity(algorithm) => self.integrity_algorithms.push(algorithm),
                Transform::PseudoRandomFunction(function) => {
                    self.pseudo_random_functions.push(function)
                }
                Transform::ExtendedSequenceNumbers(esn) => {
                    self.extended_sequence_numbers.push(esn)
                }
            }
        }
    }

    /// Total number of Transform records across all families.
    pub fn len(&self) -> usize {
        self.diffie_hellman_groups.len()
            + self.encryption_algorithms.len()
            + self.integrity_algorithms.len()
            + self.pseudo_random_functions.len()
            + self.extended_sequence_numbers.len()
    }

    /// Whether this proposal carries no transforms at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encode this Proposal into its on-wire byte representation.
    ///
    /// `num` is this Proposal's 1-based position among its siblings; `last`
    /// indicates whether it is the final Proposal of the Security
    /// Association (true) or another follows (false).
    pub fn build(&self, num: u8, last: bool) -> Result<Vec<u8>, TransformError> {
        let transforms_in_order: Vec<Transform> = self
            .diffie_hellman_groups
            .iter()
            .copied()
            .map(Transform::DiffieHellman)
            .chain(
                self.encryption_algorithms
                    .iter()
                    .map(|(a, k)| Transform::Encryption(*a, *k)),
            )
            .chain(self.integrity_algorithms.iter().copied().map(Transform::Integrity))
            .chain(
                self.pseudo_random_functions
                    .iter()
                    .copied()
                    .map(Transform::PseudoRandomFunction),
            )
            .chain(
                self.extended_sequence_numbers
                    .iter()
                    .copied()
                    .map(Transform::ExtendedSequenceNumbers),
            )
            .collect();

        let mut transforms = Vec::new();
        let count = transforms_in_order.len();
        for (i, transform) in transforms_in_order.iter().enumerate() {
            transforms.extend(transform.build(i + 1 == count)?);
        }

        let header_len = size_of::<ProposalHeader>();
        let packet_length = (header_len + self.spi.len() + transforms.len()) as u16;
        let header = ProposalHeader {
            last_substruct: if last { 0 } else { 2 },
            reserved: 0,
            proposal_length: U16::from(packet_length),
            proposal_num: num,
            protocol_id: self.protocol as u8,
            spi_size: self.spi.len() as u8,
            num_transforms: count as u8,
        };

        let mut packet = Vec::with_capacity(packet_length as usize);
        packet.extend_from_slice(header.as_bytes());
        packet.extend(self.spi.iter().copied());
        packet.extend(transforms);
        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        assert_eq!(
            Proposal::new_empty(ProtocolId::Ike, None).build(1, true).unwrap(),
            vec![0x00, 0x00, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn single_transform() {
        let mut p = Proposal::new_empty(ProtocolId::Ike, None);
        p.add(vec![Transform::DiffieHellman(DiffieHellmanGroup::Modp1024)]);
        assert_eq!(
            p.build(1, true).unwrap(),
            vec![
                0x00, 0x00, 0x00, 0x10, 0x01, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x08, 0x04,
                0x00, 0x00, 0x02,
            ]
        );
    }

    #[test]
    fn add_groups_by_family() {
        let mut p = Proposal::new_empty(ProtocolId::Esp, Some(vec![0x01, 0x02, 0x03, 0x04]));
        p.add(vec![
            Transform::Encryption(EncryptionAlgorithm::AesCbc, Some(256)),
            Transform::ExtendedSequenceNumbers(ExtendedSequenceNumbers::NoEsn),
        ]);
        assert_eq!(p.encryption_algorithms, vec![(EncryptionAlgorithm::AesCbc, Some(256))]);
        assert_eq!(
            p.extended_sequence_numbers,
            vec![ExtendedSequenceNumbers::NoEsn]
        );
        assert_eq!(p.len(), 2);
        assert!(!p.is_empty());
    }
}
