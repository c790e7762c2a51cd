//! Threshold-split keypairs.
//!
//! A shared-secret request generates a keypair, serializes its private half
//! and splits those bytes with [`split_secret`]. The public half stays in
//! clear inside the returned [`SharedSecretBundle`]. Nothing is kept between
//! calls.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::SharingParams;
use crate::crypto::{
    deserialize_private_key, deserialize_public_key, generate_keypair_with_rng, serialize_private_key,
    serialize_public_key, PrivateKey, PublicKey,
};
use crate::errors::KeyshareError;
use crate::shamir::{reconstruct_secret, split_secret};
use crate::types::{KeyAlgorithm, KeyKind, Share, SharedSecretBundle, SCHEME_V1, SHARE_FORMAT_V1};

/// Generate a keypair and split its private key into `keys_count` shares.
///
/// Uses the operating system RNG and the default chunk size.
///
/// # Errors
///
/// - [`KeyshareError::InvalidThreshold`] unless `1 <= threshold_count <= keys_count <= 255`
/// - [`KeyshareError::KeyGeneration`] if the keypair cannot be generated
pub fn generate_shared_secret(
    uid: Uuid,
    keys_count: usize,
    threshold_count: usize,
    algorithm: KeyAlgorithm,
) -> Result<SharedSecretBundle, KeyshareError> {
    let params = SharingParams::new(keys_count, threshold_count, algorithm);
    generate_shared_secret_with_rng(&mut OsRng, uid, &params)
}

/// Generate a keypair and split its private key, drawing randomness from `rng`.
///
/// Parameters are validated before any key material is generated, so an
/// invalid request costs nothing and returns no partial bundle.
pub fn generate_shared_secret_with_rng<R: CryptoRng + RngCore>(
    rng: &mut R,
    uid: Uuid,
    params: &SharingParams,
) -> Result<SharedSecretBundle, KeyshareError> {
    params.validate()?;

    let keypair = generate_keypair_with_rng(rng, params.algorithm)?;
    let secret = serialize_private_key(&keypair.private_key)?;
    let public_key = serialize_public_key(&keypair.public_key)?;
    let shares = split_secret(
        rng,
        &secret,
        params.threshold_count,
        params.keys_count,
        params.chunk_size,
    )?;

    info!(
        %uid,
        kind = %params.algorithm.kind(),
        keys_count = params.keys_count,
        threshold_count = params.threshold_count,
        "generated shared secret"
    );

    Ok(SharedSecretBundle {
        v: SHARE_FORMAT_V1,
        scheme: SCHEME_V1.to_string(),
        uid,
        kind: params.algorithm.kind(),
        created_unix: OffsetDateTime::now_utc().unix_timestamp().max(0) as u64,
        public_key,
        // validated above: both fit in a byte
        keys_count: params.keys_count as u8,
        threshold_count: params.threshold_count as u8,
        shares,
    })
}

/// Reconstruct and decode a private key of family `kind` from its shares.
///
/// # Errors
///
/// [`KeyshareError::ReconstructionFailure`] if the shares are insufficient or
/// do not decode to a valid key; [`KeyshareError::ShareLengthMismatch`] if
/// share payloads differ in length.
pub fn reconstruct_private_key(kind: KeyKind, shares: &[Share]) -> Result<PrivateKey, KeyshareError> {
    let secret = reconstruct_secret(shares)?;
    deserialize_private_key(kind, &secret)
        .map_err(|e| KeyshareError::ReconstructionFailure(format!("shares do not decode to a {kind} key: {e}")))
}

impl SharedSecretBundle {
    /// Decode the public key carried in clear.
    pub fn public_key(&self) -> Result<PublicKey, KeyshareError> {
        deserialize_public_key(self.kind, &self.public_key)
    }

    /// Reconstruct the private key from a subset of this bundle's shares.
    ///
    /// Shares carrying a different threshold than the bundle are rejected, as
    /// is any key whose public half differs from the one in the bundle.
    pub fn recover_private_key(&self, shares: &[Share]) -> Result<PrivateKey, KeyshareError> {
        if shares.iter().any(|s| s.threshold != self.threshold_count) {
            return Err(KeyshareError::ReconstructionFailure(
                "share threshold does not match bundle".into(),
            ));
        }
        let key = reconstruct_private_key(self.kind, shares)?;
        if serialize_public_key(&key.public_key())? != self.public_key {
            warn!(uid = %self.uid, "recovered key does not match bundle public key");
            return Err(KeyshareError::ReconstructionFailure(
                "recovered key does not match bundle public key".into(),
            ));
        }
        Ok(key)
    }

    /// Encode the bundle for storage or transport.
    pub fn to_bytes(&self) -> Result<Vec<u8>, KeyshareError> {
        crate::types::to_cbor_canonical(self)
    }

    /// Decode a bundle produced by [`SharedSecretBundle::to_bytes`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, KeyshareError> {
        crate::types::from_cbor(data)
    }
}
