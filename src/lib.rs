//! # keyshare
//!
//! Threshold splitting of private keys with Shamir secret sharing over GF(2^8).
//!
//! A freshly generated private key is serialized and split into `N` shares
//! such that any `T` of them rebuild the exact key bytes, while `T - 1` or
//! fewer reveal nothing about it.
//!
//! ## Algorithm Suite
//!
//! - **Secret sharing:** Shamir over GF(2^8), modulus 0x11B, one polynomial per byte
//! - **Chunk format:** PKCS#7 padding to a fixed chunk size (default 16 bytes)
//! - **Keypairs:** RSA, DSA, ECC (P-256, P-384, P-521)
//! - **Asymmetric encryption:** RSA-OAEP with SHA-256
//! - **Symmetric encryption:** AES-CBC with PKCS#7, IV prepended
//! - **Signatures:** RSA PKCS#1 v1.5 and DSA, both over SHA-256
//! - **Wire Format:** CBOR with versioned shares and bundles
//!
//! ## Example
//!
//! ```rust,no_run
//! use keyshare::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let uid = uuid::Uuid::new_v4();
//! let bundle = generate_shared_secret(uid, 3, 2, KeyAlgorithm::Rsa { bits: 2048 })?;
//!
//! // Encrypt with the public key kept in clear
//! let ciphertext = encrypt(&bundle.public_key()?, b"Hello, threshold world!")?;
//!
//! // Any two shares recover the private key
//! let private_key = bundle.recover_private_key(&bundle.shares[1..])?;
//! assert_eq!(decrypt(&private_key, &ciphertext)?, b"Hello, threshold world!");
//!
//! // One share is not enough
//! assert!(bundle.recover_private_key(&bundle.shares[..1]).is_err());
//! # Ok(())
//! # }
//! ```
//!
//! ## Security Considerations
//!
//! - Shares carry no integrity protection; tampering is detected only as far
//!   as the padding check and key decoding can detect it
//! - The public key is stored in clear and never split
//! - Secret intermediates are zeroized after use
//! - Randomness is injected through the `*_with_rng` entry points; the others
//!   use the operating system RNG
//!
//! ## License
//!
//! Licensed under the Apache License, Version 2.0.

mod chunks;
mod config;
mod crypto;
mod errors;
mod gf256;
mod recombine;
mod shamir;
mod shared_secret;
mod types;

pub use chunks::{
    join_chunks, split_as_padded_chunks, split_into_padded_chunks, unpad_last_chunk, unpad_last_element,
    MAX_CHUNK_SIZE,
};
pub use config::{SharingParams, MAX_SHARES};
pub use crypto::*;
pub use errors::KeyshareError;
pub use recombine::recombine_shares_into_bytestring;
pub use shamir::{reconstruct_secret, split_secret};
pub use shared_secret::{generate_shared_secret, generate_shared_secret_with_rng, reconstruct_private_key};
pub use types::*;
