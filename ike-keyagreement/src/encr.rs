//! Encryption algorithms: the ENCR family of the Transform Registry.

use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use cbc::{Decryptor, Encryptor};
use ike_transforms::params::TransformType;
use ike_transforms::EncryptionAlgorithm;

use crate::error::KeyAgreementError;

type Aes128CbcEnc = Encryptor<Aes128>;
type Aes128CbcDec = Decryptor<Aes128>;
type Aes192CbcEnc = Encryptor<Aes192>;
type Aes192CbcDec = Decryptor<Aes192>;
type Aes256CbcEnc = Encryptor<Aes256>;
type Aes256CbcDec = Decryptor<Aes256>;

/// Key length in bits for a variable-key-size cipher; `None` for fixed-key ciphers.
pub fn requires_key_length(algorithm: EncryptionAlgorithm) -> bool {
    algorithm.requires_key_length()
}

/// Key length in bytes, resolved against the negotiated attribute for
/// variable-key-size ciphers.
pub fn key_length(algorithm: EncryptionAlgorithm, attribute_bits: Option<u16>) -> Option<usize> {
    match algorithm {
        EncryptionAlgorithm::Null => Some(0),
        EncryptionAlgorithm::Des => Some(8),
        EncryptionAlgorithm::TripleDes => Some(24),
        EncryptionAlgorithm::AesCbc => attribute_bits.map(|bits| bits as usize / 8),
    }
}

/// A keyed encryption instance. `Null` is a no-op pass-through, used for
/// test/debug configurations that negotiate no confidentiality.
#[derive(Debug)]
pub enum Encr {
    /// No encryption: `encrypt`/`decrypt` return their input unchanged
    Null,
    /// AES-CBC with a 128-bit key
    Aes128Cbc(Vec<u8>),
    /// AES-CBC with a 192-bit key
    Aes192Cbc(Vec<u8>),
    /// AES-CBC with a 256-bit key
    Aes256Cbc(Vec<u8>),
}

impl Encr {
    /// The on-wire Transform ID of the algorithm backing this instance.
    pub fn transform_id(&self) -> u16 {
        match self {
            Encr::Null => EncryptionAlgorithm::Null.transform_id(),
            Encr::Aes128Cbc(_) | Encr::Aes192Cbc(_) | Encr::Aes256Cbc(_) => {
                EncryptionAlgorithm::AesCbc.transform_id()
            }
        }
    }

    /// Construct a keyed encryption instance for `algorithm` from `key`.
    ///
    /// Only `Null` and the three AES-CBC key sizes are implemented; `Des`
    /// and `TripleDes` are recognized by the catalog but have no
    /// implementation here, so they are rejected as unsupported rather than
    /// attempted and failed. A key of the wrong length for `AesCbc` is a
    /// `CryptoInitFailure` instead, since the algorithm itself is supported.
    pub fn new_crypto(algorithm: EncryptionAlgorithm, key: &[u8]) -> Result<Self, KeyAgreementError> {
        match algorithm {
            EncryptionAlgorithm::Null => Ok(Encr::Null),
            EncryptionAlgorithm::AesCbc => match key.len() {
                16 => Ok(Encr::Aes128Cbc(key.to_vec())),
                24 => Ok(Encr::Aes192Cbc(key.to_vec())),
                32 => Ok(Encr::Aes256Cbc(key.to_vec())),
                _ => Err(KeyAgreementError::CryptoInitFailure {
                    operation: "Encr::new_crypto",
                    transform_id: algorithm.transform_id(),
                }),
            },
            EncryptionAlgorithm::Des | EncryptionAlgorithm::TripleDes => {
                Err(KeyAgreementError::UnsupportedTransform {
                    operation: "Encr::new_crypto",
                    transform_type: TransformType::EncryptionAlgorithm,
                    transform_id: algorithm.transform_id(),
                })
            }
        }
    }

    /// Encrypt `plaintext` (already padded to the block size) under `iv`.
    pub fn encrypt(&self, iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, KeyAgreementError> {
        let fail = || KeyAgreementError::CryptoInitFailure {
            operation: "Encr::encrypt",
            transform_id: self.transform_id(),
        };
        match self {
            Encr::Null => Ok(plaintext.to_vec()),
            Encr::Aes128Cbc(key) => {
                let mut buf = plaintext.to_vec();
                Aes128CbcEnc::new_from_slices(key, iv)
                    .map_err(|_| fail())?
                    .encrypt_padded_mut::<NoPadding>(
                        &mut buf,
                        plaintext.len(),
                    )
                    .map_err(|_| fail())?;
                Ok(buf)
            }
            Encr::Aes192Cbc(key) => {
                let mut buf = plaintext.to_vec();
                Aes192CbcEnc::new_from_slices(key, iv)
                    .map_err(|_| fail())?
                    .encrypt_padded_mut::<NoPadding>(
                        &mut buf,
                        plaintext.len(),
                    )
                    .map_err(|_| fail())?;
                Ok(buf)
            }
            Encr::Aes256Cbc(key) => {
                let mut buf = plaintext.to_vec();
                Aes256CbcEnc::new_from_slices(key, iv)
                    .map_err(|_| fail())?
                    .encrypt_padded_mut::<NoPadding>(
                        &mut buf,
                        plaintext.len(),
                    )
                    .map_err(|_| fail())?;
                Ok(buf)
            }
        }
    }

    /// Decrypt `ciphertext` under `iv`.
    pub fn decrypt(&self, iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, KeyAgreementError> {
        let fail = || KeyAgreementError::CryptoInitFailure {
            operation: "Encr::decrypt",
            transform_id: self.transform_id(),
        };
        match self {
            Encr::Null => Ok(ciphertext.to_vec()),
            Encr::Aes128Cbc(key) => {
                let mut buf = ciphertext.to_vec();
                Aes128CbcDec::new_from_slices(key, iv)
                    .map_err(|_| fail())?
                    .decrypt_padded_mut::<NoPadding>(&mut buf)
                    .map_err(|_| fail())?;
                Ok(buf)
            }
            Encr::Aes192Cbc(key) => {
                let mut buf = ciphertext.to_vec();
                Aes192CbcDec::new_from_slices(key, iv)
                    .map_err(|_| fail())?
                    .decrypt_padded_mut::<NoPadding>(&mut buf)
                    .map_err(|_| fail())?;
                Ok(buf)
            }
            Encr::Aes256Cbc(key) => {
                let mut buf = ciphertext.to_vec();
                Aes256CbcDec::new_from_slices(key, iv)
                    .map_err(|_| fail())?
                    .decrypt_padded_mut::<NoPadding>(&mut buf)
                    .map_err(|_| fail())?;
                Ok(buf)
            }
        }
    }
}
