//! Integrity algorithms: the INTEG family of the Transform Registry.

use hmac::{Hmac, Mac};
use ike_transforms::params::TransformType;
use ike_transforms::IntegrityAlgorithm;
use sha1::Sha1;
use sha2::Sha256;

use crate::error::KeyAgreementError;

/// A keyed integrity (MAC) instance, truncated to the algorithm's checksum
/// length before being returned. Cloneable for the same reason `Prf` is.
#[derive(Clone, Debug)]
pub enum Integ {
    /// HMAC-SHA1-96, truncated to 12 bytes
    HmacSha1_96(Hmac<Sha1>),
    /// HMAC-SHA2-256-128, truncated to 16 bytes
    HmacSha2_256_128(Hmac<Sha256>),
}

impl Integ {
    /// The on-wire Transform ID of the algorithm backing this instance.
    pub fn transform_id(&self) -> IntegrityAlgorithm {
        match self {
            Integ::HmacSha1_96(_) => IntegrityAlgorithm::HmacSha1_96,
            Integ::HmacSha2_256_128(_) => IntegrityAlgorithm::HmacSha2_256_128,
        }
    }

    /// Key length in bytes for the given algorithm.
    pub fn key_length(algorithm: IntegrityAlgorithm) -> usize {
        match algorithm {
            IntegrityAlgorithm::HmacMd5_96 => 16,
            IntegrityAlgorithm::HmacSha1_96 => 20,
            IntegrityAlgorithm::HmacSha2_256_128 => 32,
        }
    }

    /// Truncated checksum length in bytes, i.e. the length of `compute`'s output.
    pub fn checksum_length(algorithm: IntegrityAlgorithm) -> usize {
        match algorithm {
            IntegrityAlgorithm::HmacMd5_96 => 12,
            IntegrityAlgorithm::HmacSha1_96 => 12,
            IntegrityAlgorithm::HmacSha2_256_128 => 16,
        }
    }

    /// Construct a fresh keyed integrity instance from a key of any length.
    ///
    /// `HmacMd5_96` is recognized by the catalog but has no implementation
    /// here, so it is rejected as unsupported rather than attempted and failed.
    pub fn init(algorithm: IntegrityAlgorithm, key: &[u8]) -> Result<Self, KeyAgreementError> {
        let init_failed = || KeyAgreementError::CryptoInitFailure {
            operation: "Integ::init",
            transform_id: algorithm.transform_id(),
        };
        match algorithm {
            IntegrityAlgorithm::HmacSha1_96 => Ok(Integ::HmacSha1_96(
                Hmac::<Sha1>::new_from_slice(key).map_err(|_| init_failed())?,
            )),
            IntegrityAlgorithm::HmacSha2_256_128 => Ok(Integ::HmacSha2_256_128(
                Hmac::<Sha256>::new_from_slice(key).map_err(|_| init_failed())?,
            )),
            IntegrityAlgorithm::HmacMd5_96 => Err(KeyAgreementError::UnsupportedTransform {
                operation: "Integ::init",
                transform_type: TransformType::IntegrityAlgorithm,
                transform_id: algorithm.transform_id(),
            }),
        }
    }

    /// Compute the truncated MAC of `data`.
    pub fn compute(&self, data: &[u8]) -> Vec<u8> {
        let (full, len) = match self {
            Integ::HmacSha1_96(mac) => {
                let mut mac = mac.clone();
                mac.update(data);
                (mac.finalize().into_bytes().to_vec(), 12)
            }
            Integ::HmacSha2_256_128(mac) => {
                let mut mac = mac.clone();
                mac.update(data);
                (mac.finalize().into_bytes().to_vec(), 16)
            }
        };
        full[..len].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_sha1_96_truncates_to_12_bytes() {
        let integ = Integ::init(IntegrityAlgorithm::HmacSha1_96, &[0u8; 20]).unwrap();
        assert_eq!(integ.compute(b"data").len(), 12);
    }

    #[test]
    fn hmac_sha2_256_128_truncates_to_16_bytes() {
        let integ = Integ::init(IntegrityAlgorithm::HmacSha2_256_128, &[0u8; 32]).unwrap();
        assert_eq!(integ.compute(b"data").len(), 16);
    }

    #[test]
    fn hmac_md5_is_not_implemented() {
        let err = Integ::init(IntegrityAlgorithm::HmacMd5_96, &[0u8; 16]).unwrap_err();
        assert!(matches!(err, KeyAgreementError::UnsupportedTransform { .. }));
    }
}
