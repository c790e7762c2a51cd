//! Shamir secret sharing over GF(2^8).
//!
//! The secret is first padded into `chunk_size` chunks by the chunk codec.
//! Every padded byte then gets its own random polynomial of degree
//! `threshold - 1` whose constant term is that byte, and share `i` stores the
//! polynomial evaluated at `x = i`. Any `threshold` shares determine each
//! polynomial and thus the secret; fewer leave every byte uniformly
//! distributed.
//!
//! Reconstruction interpolates each byte lane (an offset inside a chunk)
//! independently, hands the lanes to the recombiner to rebuild the chunk
//! stream, and strips the padding.

use std::collections::HashSet;

use rand::{CryptoRng, RngCore};
use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::chunks::{join_chunks, split_as_padded_chunks, strip_padding};
use crate::config::validate_threshold;
use crate::errors::KeyshareError;
use crate::gf256::{lagrange_weights_at_zero, poly_eval, Gf256};
use crate::recombine::recombine_shares_into_bytestring;
use crate::types::{Share, SHARE_FORMAT_V1};

/// Split `secret` into `count` shares, any `threshold` of which recover it.
///
/// # Errors
///
/// - [`KeyshareError::InvalidThreshold`] unless `1 <= threshold <= count <= 255`
/// - [`KeyshareError::InvalidInput`] if `chunk_size` is not in `1..=255`
pub fn split_secret<R: CryptoRng + RngCore>(
    rng: &mut R,
    secret: &[u8],
    threshold: usize,
    count: usize,
    chunk_size: usize,
) -> Result<Vec<Share>, KeyshareError> {
    validate_threshold(count, threshold)?;
    let chunks = Zeroizing::new(split_as_padded_chunks(secret, chunk_size)?);
    let padded = Zeroizing::new(join_chunks(&chunks));

    // Bounds checked above: threshold <= count <= 255, chunk_size <= 255.
    let (threshold, count, chunk_size) = (threshold as u8, count as u8, chunk_size as u8);
    let payloads = split_bytes(rng, &padded, threshold, count);

    debug!(
        secret_len = secret.len(),
        padded_len = padded.len(),
        threshold,
        count,
        "split secret into shares"
    );

    Ok(payloads
        .into_iter()
        .zip(1..=count)
        .map(|(data, index)| Share {
            v: SHARE_FORMAT_V1,
            index,
            threshold,
            chunk_size,
            data,
        })
        .collect())
}

/// Recover the secret bytes from at least `threshold` distinct shares.
///
/// Only the first `threshold` distinct shares take part in interpolation.
///
/// # Errors
///
/// - [`KeyshareError::ReconstructionFailure`] if too few shares are given, or
///   the shares are inconsistent, or the result fails the padding check
/// - [`KeyshareError::ShareLengthMismatch`] if share payloads differ in length
pub fn reconstruct_secret(shares: &[Share]) -> Result<Zeroizing<Vec<u8>>, KeyshareError> {
    let selected = select_shares(shares)?;
    let chunk_size = usize::from(selected[0].chunk_size);

    let points: Vec<(u8, &[u8])> = selected.iter().map(|s| (s.index, s.data.as_slice())).collect();
    let lanes = Zeroizing::new(interpolate_lanes(&points, chunk_size));
    let mut chunks = Zeroizing::new(recombine_shares_into_bytestring(&lanes)?);
    strip_padding(&mut chunks).map_err(|e| {
        warn!(error = %e, "reconstructed secret failed padding check");
        KeyshareError::ReconstructionFailure(format!("shares do not reconstruct a padded secret: {e}"))
    })?;

    debug!(shares = selected.len(), chunks = chunks.len(), "reconstructed secret");
    Ok(Zeroizing::new(join_chunks(&chunks)))
}

/// Validate a share set and return the first `threshold` distinct shares.
fn select_shares(shares: &[Share]) -> Result<Vec<&Share>, KeyshareError> {
    let Some(first) = shares.first() else {
        return Err(KeyshareError::ReconstructionFailure("no shares supplied".into()));
    };
    let threshold = usize::from(first.threshold);
    let chunk_size = usize::from(first.chunk_size);
    let len = first.data.len();

    if first.v != SHARE_FORMAT_V1 {
        return Err(KeyshareError::ReconstructionFailure(format!(
            "unsupported share format version {}",
            first.v
        )));
    }
    if threshold == 0 || chunk_size == 0 {
        return Err(KeyshareError::ReconstructionFailure("share parameters out of range".into()));
    }
    if len == 0 || len % chunk_size != 0 {
        return Err(KeyshareError::ReconstructionFailure(format!(
            "share payload of {len} bytes is not a whole number of {chunk_size}-byte chunks"
        )));
    }

    let mut seen = HashSet::with_capacity(shares.len());
    for share in shares {
        if share.v != first.v || share.threshold != first.threshold || share.chunk_size != first.chunk_size {
            return Err(KeyshareError::ReconstructionFailure("inconsistent share parameters".into()));
        }
        if share.data.len() != len {
            return Err(KeyshareError::ShareLengthMismatch {
                expected: len,
                got: share.data.len(),
            });
        }
        if share.index == 0 {
            return Err(KeyshareError::ReconstructionFailure("share index 0 is reserved".into()));
        }
        if !seen.insert(share.index) {
            return Err(KeyshareError::ReconstructionFailure(format!(
                "duplicate share index {}",
                share.index
            )));
        }
    }

    if shares.len() < threshold {
        warn!(threshold, got = shares.len(), "not enough shares to reconstruct");
        return Err(KeyshareError::ReconstructionFailure(format!(
            "need {threshold} shares, got {}",
            shares.len()
        )));
    }

    Ok(shares.iter().take(threshold).collect())
}

/// Evaluate a fresh random polynomial per secret byte at `x = 1..=count`.
pub(crate) fn split_bytes<R: CryptoRng + RngCore>(
    rng: &mut R,
    secret: &[u8],
    threshold: u8,
    count: u8,
) -> Vec<Vec<u8>> {
    let mut payloads = vec![Vec::with_capacity(secret.len()); usize::from(count)];
    let mut coeffs = vec![Gf256::ZERO; usize::from(threshold)];
    let mut random = vec![0u8; usize::from(threshold) - 1];

    for &byte in secret {
        rng.fill_bytes(&mut random);
        coeffs[0] = Gf256::new(byte);
        for (c, &r) in coeffs[1..].iter_mut().zip(&random) {
            *c = Gf256::new(r);
        }
        for (payload, x) in payloads.iter_mut().zip(1..=count) {
            payload.push(poly_eval(&coeffs, Gf256::new(x)).value());
        }
    }

    random.zeroize();
    coeffs.zeroize();
    payloads
}

/// Interpolate every byte lane of the share payloads at zero.
///
/// Lane `l` holds, for each chunk `j`, the recovered byte at offset
/// `j * chunk_size + l`, as a one-byte chunk.
pub(crate) fn interpolate_lanes(points: &[(u8, &[u8])], chunk_size: usize) -> Vec<Vec<Vec<u8>>> {
    let xs: Vec<Gf256> = points.iter().map(|&(x, _)| Gf256::new(x)).collect();
    let weights = lagrange_weights_at_zero(&xs);
    let rows = points.first().map_or(0, |(_, data)| data.len() / chunk_size);

    (0..chunk_size)
        .map(|lane| {
            (0..rows)
                .map(|row| {
                    let offset = row * chunk_size + lane;
                    let byte = points
                        .iter()
                        .zip(&weights)
                        .fold(Gf256::ZERO, |acc, (&(_, data), &w)| acc + w * Gf256::new(data[offset]));
                    vec![byte.value()]
                })
                .collect()
        })
        .collect()
}
