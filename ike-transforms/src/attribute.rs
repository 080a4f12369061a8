//! Transform attributes, as per RFC 7296 section 3.3.5.
//!
//! This core only ever needs the fixed-length (TV) Key Length attribute;
//! the variable-length TLV encoding exists in the RFC for attributes no
//! supported Transform in this registry uses.

use zerocopy::network_endian::U16;
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

use crate::params::{ATTRIBUTE_FORMAT_TV, ATTRIBUTE_TYPE_KEY_LENGTH};

/// Wire layout of a fixed-length (TV) attribute.
///
///                         1                   2                   3
///      0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///     |1|      Attribute Type        |         Attribute Value       |
///     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
#[derive(Debug, FromBytes, FromZeroes, AsBytes, Unaligned, Copy, Clone)]
#[repr(C, packed)]
pub struct AttributeHeader {
    /// Attribute type with the TV format bit already set
    pub attribute_type: U16,
    /// Fixed-length attribute value
    pub attribute_value: U16,
}

/// A decoded Transform attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// Key length in bits, for variable-key-size ciphers such as AES-CBC
    KeyLength(u16),
}

impl Attribute {
    /// Encode this attribute into its 4-byte wire representation
    pub fn build(&self) -> Vec<u8> {
        let Attribute::KeyLength(bits) = self;
        AttributeHeader {
            attribute_type: U16::new(ATTRIBUTE_FORMAT_TV | ATTRIBUTE_TYPE_KEY_LENGTH),
            attribute_value: U16::new(*bits),
        }
        .as_bytes()
        .to_vec()
    }

    /// Decode a single attribute from its 4-byte wire representation
    ///
    /// Returns `None` if the attribute is not the fixed-length Key Length
    /// attribute this core knows about, which the caller should in turn
    /// surface as an unsupported-transform error.
    pub fn try_decode(buf: &[u8; 4]) -> Option<Self> {
        let header = AttributeHeader::read_from(buf.as_slice())?;
        let attribute_type = u16::from(header.attribute_type);
        if attribute_type & ATTRIBUTE_FORMAT_TV == 0 {
            return None;
        }
        if attribute_type & !ATTRIBUTE_FORMAT_TV != ATTRIBUTE_TYPE_KEY_LENGTH {
            return None;
        }
        Some(Attribute::KeyLength(header.attribute_value.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_length_round_trip() {
        let attr = Attribute::KeyLength(192);
        let bytes = attr.build();
        assert_eq!(bytes, vec![0x80, 0x0e, 0x00, 0xc0]);
        let decoded = Attribute::try_decode(bytes.as_slice().try_into().unwrap());
        assert_eq!(decoded, Some(attr));
    }

    #[test]
    fn unknown_attribute_type_rejected() {
        let bytes = [0x80, 0x01, 0x00, 0x80];
        assert_eq!(Attribute::try_decode(&bytes), None);
    }
}
