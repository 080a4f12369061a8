//! Cryptographically secure random-number generation bounded by defined
//! minima, as used by the Diffie-Hellman secret exponent draw.

use num_bigint::BigUint;
use rand::RngCore;

use crate::error::KeyAgreementError;

/// 128 bits, all ones: `2^128 - 1`. The rejection floor for `generate_random_number`.
const REJECTION_FLOOR_BYTES: usize = 16;

/// 2048 bits, all ones: one below the open upper bound `2^2048`.
const MAX_DRAW_BYTES: usize = 256;

/// Draw a uniform random integer in `[0, 2^2048)`, rejection-sampling until
/// the value strictly exceeds `2^128 - 1`.
///
/// This gives the caller a defensive lower bound on the magnitude of a DH
/// secret exponent independent of which group it is later reduced into,
/// without ever retrying on anything but CSPRNG failure itself.
pub fn generate_random_number() -> Result<BigUint, KeyAgreementError> {
    let floor = BigUint::from_bytes_be(&[0xffu8; REJECTION_FLOOR_BYTES]);
    loop {
        let mut buf = [0u8; MAX_DRAW_BYTES];
        rand::rngs::OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|source| KeyAgreementError::RandomnessFailure {
                operation: "generate_random_number",
                source,
            })?;
        let candidate = BigUint::from_bytes_be(&buf);
        if candidate > floor {
            return Ok(candidate);
        }
    }
}

/// Draw a single fresh byte from the CSPRNG.
pub fn generate_random_uint8() -> Result<u8, KeyAgreementError> {
    let mut buf = [0u8; 1];
    rand::rngs::OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|source| KeyAgreementError::RandomnessFailure {
            operation: "generate_random_uint8",
            source,
        })?;
    Ok(buf[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_number_respects_bounds() {
        let floor = BigUint::from_bytes_be(&[0xffu8; REJECTION_FLOOR_BYTES]);
        let ceiling = BigUint::from(1u8) << (MAX_DRAW_BYTES * 8);
        for _ in 0..32 {
            let n = generate_random_number().unwrap();
            assert!(n > floor);
            assert!(n < ceiling);
        }
    }

    #[test]
    fn random_uint8_is_fallible_but_usually_succeeds() {
        assert!(generate_random_uint8().is_ok());
    }
}
