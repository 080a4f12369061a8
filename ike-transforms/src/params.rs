//! IKEv2 wire-level numeric constants, as defined in the IANA IKEv2
//! parameters registry at
//! <https://www.iana.org/assignments/ikev2-parameters/ikev2-parameters.xhtml>.

/// Type of the parameter region a value that did not decode falls into.
///
/// Many of the IANA registries behind this crate's enums reserve the value
/// `0`, leave a range unassigned for future allocation, and reserve the top
/// of the range for private use. Also see [Transform::try_decode](crate::transform::Transform::try_decode).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum UnparseableParameter {
    /// The value is reserved and must not be used
    Reserved,
    /// The value has no recognized meaning by any known standard
    Unassigned,
    /// The value is reserved for private use by proprietary implementations
    PrivateUse,
}

/// Protocol ID carried by a Proposal, identifying which security protocol
/// the proposal negotiates transforms for.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, strum::EnumIter)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ProtocolId {
    Ike = 1,
    Esp = 3,
}

impl TryFrom<u8> for ProtocolId {
    type Error = UnparseableParameter;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ProtocolId::Ike),
            2 => Err(UnparseableParameter::Reserved),
            3 => Ok(ProtocolId::Esp),
            _ => Err(UnparseableParameter::Unassigned),
        }
    }
}

/// Type of a Transform, i.e. which of the five algorithm families a
/// Transform record belongs to.
///
/// The "Key Exchange Method (KE)" transform type was originally named
/// "Diffie-Hellman Group (D-H)" in RFCs published prior to RFC 9370; this
/// crate keeps the original name since the Diffie-Hellman core this crate
/// serves never negotiates anything else through that slot.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, strum::EnumIter)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum TransformType {
    EncryptionAlgorithm = 1,
    PseudoRandomFunction = 2,
    IntegrityAlgorithm = 3,
    DiffieHellmanGroup = 4,
    ExtendedSequenceNumbers = 5,
}

impl TryFrom<u8> for TransformType {
    type Error = UnparseableParameter;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Err(UnparseableParameter::Reserved),
            1 => Ok(TransformType::EncryptionAlgorithm),
            2 => Ok(TransformType::PseudoRandomFunction),
            3 => Ok(TransformType::IntegrityAlgorithm),
            4 => Ok(TransformType::DiffieHellmanGroup),
            5 => Ok(TransformType::ExtendedSequenceNumbers),
            6..=240 => Err(UnparseableParameter::Unassigned),
            241..=255 => Err(UnparseableParameter::PrivateUse),
        }
    }
}

/// Bit flag in the Attribute Type field that selects the fixed-length
/// TV (Type/Value) attribute encoding over the variable-length TLV one.
///
/// The core only ever emits and consumes the Key Length attribute, which
/// is always fixed-length, so this crate never implements the TLV branch.
pub const ATTRIBUTE_FORMAT_TV: u16 = 0x8000;

/// Attribute Type of the one attribute this crate knows how to decode: the
/// fixed-length Key Length attribute used by variable-key-size ciphers.
pub const ATTRIBUTE_TYPE_KEY_LENGTH: u16 = 14;

/// Indicator for the encoding of certificates and related data.
///
/// Only the variant the Certificate Authority Matcher cares about is kept
/// here; see [crate::catalog] for the algorithm families, and the
/// `ike-keyagreement` crate's CA matcher for how this is used.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Copy)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum CertificateEncoding {
    X509CertificateSignature = 4,
}

impl TryFrom<u8> for CertificateEncoding {
    type Error = UnparseableParameter;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(CertificateEncoding::X509CertificateSignature),
            _ => Err(UnparseableParameter::Unassigned),
        }
    }
}
