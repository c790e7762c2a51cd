//! Error types for keyshare operations.

use thiserror::Error;

/// Errors that can occur while generating, splitting, or reconstructing keys.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyshareError {
    /// A parameter is outside its accepted range (chunk size, key or IV length).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested `threshold_count`/`keys_count` pair cannot be honoured.
    #[error("invalid threshold {threshold} for {keys_count} keys")]
    InvalidThreshold {
        /// Requested reconstruction threshold.
        threshold: usize,
        /// Requested number of shares.
        keys_count: usize,
    },

    /// The padding marker of the final chunk is inconsistent.
    #[error("corrupt padding: {0}")]
    CorruptPadding(&'static str),

    /// Share payloads or chunk columns that should line up have different lengths.
    #[error("share length mismatch: expected {expected}, got {got}")]
    ShareLengthMismatch {
        /// Length of the first sequence.
        expected: usize,
        /// Length of the offending sequence.
        got: usize,
    },

    /// The underlying keypair generation failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// The supplied shares cannot reconstruct a valid secret.
    #[error("reconstruction failed: {0}")]
    ReconstructionFailure(String),

    /// The operation is not defined for this key family.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// A primitive (cipher, padding, signature) rejected its input.
    #[error("crypto failure: {0}")]
    Crypto(String),

    /// An encoded key or field is malformed.
    #[error("malformed field: {0}")]
    Malformed(&'static str),

    /// CBOR serialization or deserialization error.
    #[error("serialization error: {0}")]
    Ser(String),
}
