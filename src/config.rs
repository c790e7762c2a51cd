//! Parameters of a shared-secret request.

use serde::{Deserialize, Serialize};

use crate::errors::KeyshareError;
use crate::types::{KeyAlgorithm, DEFAULT_CHUNK_SIZE};

/// Largest number of shares addressable by a GF(2^8) x-coordinate.
pub const MAX_SHARES: usize = 255;

/// How a private key is generated and split.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SharingParams {
    /// Number of shares to produce (`N`).
    pub keys_count: usize,
    /// Number of shares required to reconstruct (`T`).
    pub threshold_count: usize,
    /// Padding chunk size applied to the serialized key.
    pub chunk_size: usize,
    /// Keypair to generate.
    pub algorithm: KeyAlgorithm,
}

impl Default for SharingParams {
    fn default() -> Self {
        Self {
            keys_count: 3,
            threshold_count: 2,
            chunk_size: DEFAULT_CHUNK_SIZE,
            algorithm: KeyAlgorithm::default(),
        }
    }
}

impl SharingParams {
    pub fn new(keys_count: usize, threshold_count: usize, algorithm: KeyAlgorithm) -> Self {
        Self {
            keys_count,
            threshold_count,
            algorithm,
            ..Self::default()
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Check `1 <= threshold_count <= keys_count <= 255` and the chunk size.
    pub fn validate(&self) -> Result<(), KeyshareError> {
        validate_threshold(self.keys_count, self.threshold_count)?;
        crate::chunks::validate_chunk_size(self.chunk_size)
    }
}

pub(crate) fn validate_threshold(keys_count: usize, threshold_count: usize) -> Result<(), KeyshareError> {
    if threshold_count == 0 || keys_count == 0 || threshold_count > keys_count || keys_count > MAX_SHARES {
        return Err(KeyshareError::InvalidThreshold {
            threshold: threshold_count,
            keys_count,
        });
    }
    Ok(())
}
