//! Pseudorandom functions: the PRF family of the Transform Registry, plus
//! the PRF+ key-expansion construction of RFC 7296 §2.13.

use hmac::{Hmac, Mac};
use ike_transforms::params::TransformType;
use ike_transforms::PseudoRandomFunction;
use sha1::Sha1;
use sha2::Sha256;

use crate::error::KeyAgreementError;

/// A keyed PRF instance, cloneable so a shared bundle entry can be used to
/// compute more than one output without racing on incremental MAC state.
#[derive(Clone, Debug)]
pub enum Prf {
    /// HMAC-SHA1, RFC 2104
    HmacSha1(Hmac<Sha1>),
    /// HMAC-SHA2-256, RFC 4868
    HmacSha2_256(Hmac<Sha256>),
}

impl Prf {
    /// The on-wire Transform ID of the algorithm backing this instance.
    pub fn transform_id(&self) -> PseudoRandomFunction {
        match self {
            Prf::HmacSha1(_) => PseudoRandomFunction::HmacSha1,
            Prf::HmacSha2_256(_) => PseudoRandomFunction::HmacSha2_256,
        }
    }

    /// Key length in bytes this PRF's output (and thus its own key) has.
    pub fn key_length(algorithm: PseudoRandomFunction) -> usize {
        match algorithm {
            PseudoRandomFunction::HmacMd5 => 16,
            PseudoRandomFunction::HmacSha1 => 20,
            PseudoRandomFunction::HmacSha2_256 => 32,
        }
    }

    /// Construct a fresh keyed PRF instance from a key of any length.
    ///
    /// Only the two algorithms this core implements math for can be
    /// instantiated; `HmacMd5` is recognized by the catalog but has no
    /// implementation here, so it is rejected as unsupported rather than
    /// attempted and failed.
    pub fn init(algorithm: PseudoRandomFunction, key: &[u8]) -> Result<Self, KeyAgreementError> {
        let init_failed = || KeyAgreementError::CryptoInitFailure {
            operation: "Prf::init",
            transform_id: algorithm.transform_id(),
        };
        match algorithm {
            PseudoRandomFunction::HmacSha1 => Ok(Prf::HmacSha1(
                Hmac::<Sha1>::new_from_slice(key).map_err(|_| init_failed())?,
            )),
            PseudoRandomFunction::HmacSha2_256 => Ok(Prf::HmacSha2_256(
                Hmac::<Sha256>::new_from_slice(key).map_err(|_| init_failed())?,
            )),
            PseudoRandomFunction::HmacMd5 => Err(KeyAgreementError::UnsupportedTransform {
                operation: "Prf::init",
                transform_type: TransformType::PseudoRandomFunction,
                transform_id: algorithm.transform_id(),
            }),
        }
    }

    /// Compute `P(data)` against a clone of this instance's key schedule.
    pub(crate) fn compute(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Prf::HmacSha1(mac) => {
                let mut mac = mac.clone();
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
            Prf::HmacSha2_256(mac) => {
                let mut mac = mac.clone();
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }
}

/// Expand a keyed PRF over `seed` into exactly `length` bytes, per the PRF+
/// construction of RFC 7296 §2.13.
///
/// `T1 = P(S || 0x01)`, `Ti = P(T(i-1) || S || i)`, output = `T1 || T2 || …`
/// truncated to `length`. The iteration counter is a single byte starting
/// at 1; requiring a 256th block is a fatal error rather than a silent wrap.
pub fn prf_plus(prf: &Prf, seed: &[u8], length: usize) -> Result<Vec<u8>, KeyAgreementError> {
    let exhausted = || KeyAgreementError::PrfPlusExhausted { operation: "prf_plus" };

    let mut output = Vec::with_capacity(length);
    let mut counter: u8 = 1;
    let mut previous: Vec<u8> = Vec::new();

    while output.len() < length {
        let mut block_input = Vec::with_capacity(previous.len() + seed.len() + 1);
        block_input.extend_from_slice(&previous);
        block_input.extend_from_slice(seed);
        block_input.push(counter);

        let block = prf.compute(&block_input);
        output.extend_from_slice(&block);
        previous = block;

        if output.len() < length {
            counter = counter.checked_add(1).ok_or_else(exhausted)?;
        }
    }

    output.truncate(length);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S1 — PRF+ basic expansion with HMAC-SHA1.
    #[test]
    fn prf_plus_basic_expansion() {
        let key = [0u8; 20];
        let prf = Prf::init(PseudoRandomFunction::HmacSha1, &key).unwrap();

        let t1 = prf.compute(b"abc\x01");
        let mut t2_input = t1.clone();
        t2_input.extend_from_slice(b"abc\x02");
        let t2 = prf.compute(&t2_input);

        let mut expected = t1;
        expected.extend_from_slice(&t2);
        expected.truncate(40);

        let actual = prf_plus(&prf, b"abc", 40).unwrap();
        assert_eq!(actual, expected);
        assert_eq!(actual.len(), 40);
    }

    #[test]
    fn prf_plus_exhaustion_is_fatal() {
        let key = [0u8; 20];
        let prf = Prf::init(PseudoRandomFunction::HmacSha1, &key).unwrap();
        // SHA1 produces 20-byte blocks; 256 blocks is 5120 bytes, one past the limit.
        let err = prf_plus(&prf, b"seed", 256 * 20 + 1).unwrap_err();
        assert!(matches!(err, KeyAgreementError::PrfPlusExhausted { .. }));
    }

    #[test]
    fn hmac_md5_is_not_implemented() {
        let err = Prf::init(PseudoRandomFunction::HmacMd5, &[0u8; 16]).unwrap_err();
        assert!(matches!(err, KeyAgreementError::UnsupportedTransform { .. }));
    }
}
