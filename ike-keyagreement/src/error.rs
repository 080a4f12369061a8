//! The error taxonomy for the key-agreement and key-derivation core.

use thiserror::Error;

use ike_transforms::params::TransformType;

/// Failure raised by any operation in this crate.
///
/// Every variant carries enough context to name the offending field or
/// transform without the caller needing to re-derive it; no variant wraps
/// an opaque `String` in place of structured data.
#[derive(Debug, Error)]
pub enum KeyAgreementError {
    /// A proposal lacked a required transform category, or a key bundle
    /// lacked a required algorithm descriptor, for the named operation.
    #[error("{operation}: missing required field {field}")]
    MissingField {
        /// The operation that detected the missing field
        operation: &'static str,
        /// Name of the missing field or transform category
        field: &'static str,
    },
    /// A decoded Transform ID (or ID plus attribute combination) is not in
    /// the registry.
    #[error("{operation}: unsupported transform: type {transform_type:?}, id {transform_id}")]
    UnsupportedTransform {
        /// The operation that attempted the decode
        operation: &'static str,
        /// The family the unsupported Transform ID was found in
        transform_type: TransformType,
        /// The offending Transform ID
        transform_id: u16,
    },
    /// The operating system CSPRNG returned an error.
    #[error("{operation}: randomness source failed: {source}")]
    RandomnessFailure {
        /// The operation that requested randomness
        operation: &'static str,
        /// The underlying CSPRNG error
        #[source]
        source: rand::Error,
    },
    /// Cipher construction failed, e.g. a key of the wrong length was
    /// handed to a fixed-key-size primitive.
    #[error("{operation}: failed to initialize cryptographic primitive for transform id {transform_id}")]
    CryptoInitFailure {
        /// The operation that attempted initialization
        operation: &'static str,
        /// The Transform ID of the primitive that failed to initialize
        transform_id: u16,
    },
    /// PRF+ was asked to expand past the 255-block limit of RFC 7296 §2.13.
    #[error("{operation}: PRF+ exhausted: requested output exceeds 255 PRF blocks")]
    PrfPlusExhausted {
        /// The operation that requested the PRF+ expansion
        operation: &'static str,
    },
    /// A chosen bundle could not be re-encoded into a wire Proposal.
    #[error("{operation}: failed to encode attribute for transform id {transform_id}")]
    EncodingFailure {
        /// The operation that attempted the encode
        operation: &'static str,
        /// The Transform ID whose attribute could not be encoded
        transform_id: u16,
    },
}
