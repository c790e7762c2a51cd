use std::fmt;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use signature::{DigestSigner, DigestVerifier, SignatureEncoding, Signer, Verifier};
use tracing::info;
use zeroize::Zeroizing;

use crate::errors::KeyshareError;
use crate::types::{EccCurve, KeyAlgorithm, KeyKind};

/// Smallest RSA modulus accepted for key generation.
pub const MIN_RSA_BITS: usize = 1024;

/// AES block and IV size.
pub const AES_BLOCK_SIZE: usize = 16;

/// Private half of a keypair.
pub enum PrivateKey {
    Rsa(RsaPrivateKey),
    Dsa(dsa::SigningKey),
    P256(p256::SecretKey),
    P384(p384::SecretKey),
    P521(p521::SecretKey),
}

/// Public half of a keypair.
#[derive(Clone)]
pub enum PublicKey {
    Rsa(RsaPublicKey),
    Dsa(dsa::VerifyingKey),
    P256(p256::PublicKey),
    P384(p384::PublicKey),
    P521(p521::PublicKey),
}

/// Matched public/private keys of one family.
#[derive(Debug)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

impl PrivateKey {
    pub fn kind(&self) -> KeyKind {
        match self {
            PrivateKey::Rsa(_) => KeyKind::Rsa,
            PrivateKey::Dsa(_) => KeyKind::Dsa,
            PrivateKey::P256(_) => KeyKind::Ecc(EccCurve::P256),
            PrivateKey::P384(_) => KeyKind::Ecc(EccCurve::P384),
            PrivateKey::P521(_) => KeyKind::Ecc(EccCurve::P521),
        }
    }

    /// Derive the matching public key.
    pub fn public_key(&self) -> PublicKey {
        match self {
            PrivateKey::Rsa(k) => PublicKey::Rsa(k.to_public_key()),
            PrivateKey::Dsa(k) => PublicKey::Dsa(k.verifying_key().clone()),
            PrivateKey::P256(k) => PublicKey::P256(k.public_key()),
            PrivateKey::P384(k) => PublicKey::P384(k.public_key()),
            PrivateKey::P521(k) => PublicKey::P521(k.public_key()),
        }
    }
}

impl PublicKey {
    pub fn kind(&self) -> KeyKind {
        match self {
            PublicKey::Rsa(_) => KeyKind::Rsa,
            PublicKey::Dsa(_) => KeyKind::Dsa,
            PublicKey::P256(_) => KeyKind::Ecc(EccCurve::P256),
            PublicKey::P384(_) => KeyKind::Ecc(EccCurve::P384),
            PublicKey::P521(_) => KeyKind::Ecc(EccCurve::P521),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({})", self.kind())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.kind())
    }
}

/* ---------------- Keygen ---------------- */

/// Generate a keypair using the operating system RNG.
pub fn generate_keypair(algorithm: KeyAlgorithm) -> Result<KeyPair, KeyshareError> {
    generate_keypair_with_rng(&mut OsRng, algorithm)
}

/// Generate a keypair drawing randomness from `rng`.
///
/// RSA keys shorter than [`MIN_RSA_BITS`] are refused. DSA domain parameter
/// generation is slow and dominates the cost of DSA keypairs.
pub fn generate_keypair_with_rng<R: CryptoRng + RngCore>(
    rng: &mut R,
    algorithm: KeyAlgorithm,
) -> Result<KeyPair, KeyshareError> {
    let private_key = match algorithm {
        KeyAlgorithm::Rsa { bits } => {
            if bits < MIN_RSA_BITS {
                return Err(KeyshareError::KeyGeneration(format!(
                    "RSA key length must be at least {MIN_RSA_BITS} bits, got {bits}"
                )));
            }
            let key = RsaPrivateKey::new(rng, bits).map_err(|e| KeyshareError::KeyGeneration(e.to_string()))?;
            PrivateKey::Rsa(key)
        }
        KeyAlgorithm::Dsa { size } => {
            let components = dsa::Components::generate(&mut *rng, size.into());
            PrivateKey::Dsa(dsa::SigningKey::generate(&mut *rng, components))
        }
        KeyAlgorithm::Ecc { curve: EccCurve::P256 } => PrivateKey::P256(p256::SecretKey::random(rng)),
        KeyAlgorithm::Ecc { curve: EccCurve::P384 } => PrivateKey::P384(p384::SecretKey::random(rng)),
        KeyAlgorithm::Ecc { curve: EccCurve::P521 } => PrivateKey::P521(p521::SecretKey::random(rng)),
    };

    info!(kind = %private_key.kind(), "generated keypair");
    Ok(KeyPair {
        public_key: private_key.public_key(),
        private_key,
    })
}

/* ---------------- Key encoding ---------------- */

/// Canonical bytes of a private key: PKCS#8 DER for RSA and DSA, the
/// big-endian secret scalar for ECC.
pub fn serialize_private_key(key: &PrivateKey) -> Result<Zeroizing<Vec<u8>>, KeyshareError> {
    let bytes = match key {
        PrivateKey::Rsa(k) => pkcs8_der(k)?,
        PrivateKey::Dsa(k) => pkcs8_der(k)?,
        PrivateKey::P256(k) => Zeroizing::new(k.to_bytes().to_vec()),
        PrivateKey::P384(k) => Zeroizing::new(k.to_bytes().to_vec()),
        PrivateKey::P521(k) => Zeroizing::new(k.to_bytes().to_vec()),
    };
    Ok(bytes)
}

fn pkcs8_der<K: EncodePrivateKey>(key: &K) -> Result<Zeroizing<Vec<u8>>, KeyshareError> {
    let doc = key
        .to_pkcs8_der()
        .map_err(|e| KeyshareError::Crypto(e.to_string()))?;
    Ok(Zeroizing::new(doc.as_bytes().to_vec()))
}

/// Inverse of [`serialize_private_key`].
pub fn deserialize_private_key(kind: KeyKind, bytes: &[u8]) -> Result<PrivateKey, KeyshareError> {
    if let KeyKind::Ecc(curve) = kind {
        if bytes.len() != curve.scalar_len() {
            return Err(KeyshareError::Malformed("ecc scalar length"));
        }
    }
    let key = match kind {
        KeyKind::Rsa => PrivateKey::Rsa(
            RsaPrivateKey::from_pkcs8_der(bytes).map_err(|_| KeyshareError::Malformed("rsa private key"))?,
        ),
        KeyKind::Dsa => PrivateKey::Dsa(
            dsa::SigningKey::from_pkcs8_der(bytes).map_err(|_| KeyshareError::Malformed("dsa private key"))?,
        ),
        KeyKind::Ecc(EccCurve::P256) => PrivateKey::P256(
            p256::SecretKey::from_slice(bytes).map_err(|_| KeyshareError::Malformed("p256 scalar"))?,
        ),
        KeyKind::Ecc(EccCurve::P384) => PrivateKey::P384(
            p384::SecretKey::from_slice(bytes).map_err(|_| KeyshareError::Malformed("p384 scalar"))?,
        ),
        KeyKind::Ecc(EccCurve::P521) => PrivateKey::P521(
            p521::SecretKey::from_slice(bytes).map_err(|_| KeyshareError::Malformed("p521 scalar"))?,
        ),
    };
    Ok(key)
}

/// SubjectPublicKeyInfo DER for RSA and DSA, SEC1 uncompressed point for ECC.
pub fn serialize_public_key(key: &PublicKey) -> Result<Vec<u8>, KeyshareError> {
    let bytes = match key {
        PublicKey::Rsa(k) => spki_der(k)?,
        PublicKey::Dsa(k) => spki_der(k)?,
        PublicKey::P256(k) => k.to_sec1_bytes().to_vec(),
        PublicKey::P384(k) => k.to_sec1_bytes().to_vec(),
        PublicKey::P521(k) => k.to_sec1_bytes().to_vec(),
    };
    Ok(bytes)
}

fn spki_der<K: EncodePublicKey>(key: &K) -> Result<Vec<u8>, KeyshareError> {
    let doc = key
        .to_public_key_der()
        .map_err(|e| KeyshareError::Crypto(e.to_string()))?;
    Ok(doc.as_bytes().to_vec())
}

/// Inverse of [`serialize_public_key`].
pub fn deserialize_public_key(kind: KeyKind, bytes: &[u8]) -> Result<PublicKey, KeyshareError> {
    let key = match kind {
        KeyKind::Rsa => PublicKey::Rsa(
            RsaPublicKey::from_public_key_der(bytes).map_err(|_| KeyshareError::Malformed("rsa public key"))?,
        ),
        KeyKind::Dsa => PublicKey::Dsa(
            dsa::VerifyingKey::from_public_key_der(bytes).map_err(|_| KeyshareError::Malformed("dsa public key"))?,
        ),
        KeyKind::Ecc(EccCurve::P256) => PublicKey::P256(
            p256::PublicKey::from_sec1_bytes(bytes).map_err(|_| KeyshareError::Malformed("p256 point"))?,
        ),
        KeyKind::Ecc(EccCurve::P384) => PublicKey::P384(
            p384::PublicKey::from_sec1_bytes(bytes).map_err(|_| KeyshareError::Malformed("p384 point"))?,
        ),
        KeyKind::Ecc(EccCurve::P521) => PublicKey::P521(
            p521::PublicKey::from_sec1_bytes(bytes).map_err(|_| KeyshareError::Malformed("p521 point"))?,
        ),
    };
    Ok(key)
}

/* ---------------- Asymmetric encryption ---------------- */

/// RSA-OAEP (SHA-256) encryption with the operating system RNG.
pub fn encrypt(public_key: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>, KeyshareError> {
    encrypt_with_rng(&mut OsRng, public_key, plaintext)
}

/// RSA-OAEP (SHA-256) encryption drawing padding randomness from `rng`.
pub fn encrypt_with_rng<R: CryptoRng + RngCore>(
    rng: &mut R,
    public_key: &PublicKey,
    plaintext: &[u8],
) -> Result<Vec<u8>, KeyshareError> {
    let PublicKey::Rsa(key) = public_key else {
        return Err(KeyshareError::Unsupported("asymmetric encryption requires an RSA key"));
    };
    key.encrypt(rng, Oaep::new::<Sha256>(), plaintext)
        .map_err(|e| KeyshareError::Crypto(e.to_string()))
}

/// RSA-OAEP (SHA-256) decryption.
pub fn decrypt(private_key: &PrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>, KeyshareError> {
    let PrivateKey::Rsa(key) = private_key else {
        return Err(KeyshareError::Unsupported("asymmetric decryption requires an RSA key"));
    };
    key.decrypt(Oaep::new::<Sha256>(), ciphertext)
        .map_err(|e| KeyshareError::Crypto(e.to_string()))
}

/* ---------------- Symmetric (AES-CBC) ---------------- */

/// AES-CBC with PKCS#7 padding and a fresh random IV.
///
/// Output layout: `IV (16 bytes) || ciphertext`. The key selects AES-128,
/// AES-192 or AES-256 by its length.
pub fn encrypt_symmetric(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, KeyshareError> {
    let mut iv = [0u8; AES_BLOCK_SIZE];
    OsRng.fill_bytes(&mut iv);
    encrypt_symmetric_with_iv(key, &iv, plaintext)
}

/// AES-CBC with PKCS#7 padding and a caller-supplied IV.
pub fn encrypt_symmetric_with_iv(
    key: &[u8],
    iv: &[u8; AES_BLOCK_SIZE],
    plaintext: &[u8],
) -> Result<Vec<u8>, KeyshareError> {
    let ciphertext = match key.len() {
        16 => cbc_encrypt::<aes::Aes128>(key, iv, plaintext)?,
        24 => cbc_encrypt::<aes::Aes192>(key, iv, plaintext)?,
        32 => cbc_encrypt::<aes::Aes256>(key, iv, plaintext)?,
        n => return Err(aes_key_len_error(n)),
    };
    let mut out = Vec::with_capacity(AES_BLOCK_SIZE + ciphertext.len());
    out.extend_from_slice(iv);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Inverse of [`encrypt_symmetric`].
pub fn decrypt_symmetric(key: &[u8], data: &[u8]) -> Result<Vec<u8>, KeyshareError> {
    if data.len() < 2 * AES_BLOCK_SIZE || data.len() % AES_BLOCK_SIZE != 0 {
        return Err(KeyshareError::Crypto(format!(
            "aes-cbc input of {} bytes is not IV plus whole blocks",
            data.len()
        )));
    }
    let (iv, ciphertext) = data.split_at(AES_BLOCK_SIZE);
    match key.len() {
        16 => cbc_decrypt::<aes::Aes128>(key, iv, ciphertext),
        24 => cbc_decrypt::<aes::Aes192>(key, iv, ciphertext),
        32 => cbc_decrypt::<aes::Aes256>(key, iv, ciphertext),
        n => Err(aes_key_len_error(n)),
    }
}

fn aes_key_len_error(len: usize) -> KeyshareError {
    KeyshareError::InvalidInput(format!("AES key must be 16, 24 or 32 bytes, got {len}"))
}

fn cbc_encrypt<C>(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, KeyshareError>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let cipher = cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| KeyshareError::InvalidInput("aes-cbc key or iv length".into()))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, KeyshareError>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    let cipher = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| KeyshareError::InvalidInput("aes-cbc key or iv length".into()))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| KeyshareError::Crypto("aes-cbc padding".into()))
}

/* ---------------- Signatures ---------------- */

/// Sign `data`: RSA PKCS#1 v1.5 or DSA (RFC 6979), both over SHA-256.
pub fn sign(private_key: &PrivateKey, data: &[u8]) -> Result<Vec<u8>, KeyshareError> {
    match private_key {
        PrivateKey::Rsa(key) => {
            let signing_key = rsa::pkcs1v15::SigningKey::<Sha256>::new(key.clone());
            let sig = signing_key
                .try_sign(data)
                .map_err(|e| KeyshareError::Crypto(e.to_string()))?;
            Ok(sig.to_vec())
        }
        PrivateKey::Dsa(key) => {
            let sig: dsa::Signature = key
                .try_sign_digest(Sha256::new_with_prefix(data))
                .map_err(|e| KeyshareError::Crypto(e.to_string()))?;
            Ok(sig.to_vec())
        }
        _ => Err(KeyshareError::Unsupported("signing requires an RSA or DSA key")),
    }
}

/// Check a signature produced by [`sign`].
///
/// A wrong or undecodable signature yields `Ok(false)`.
pub fn verify(public_key: &PublicKey, data: &[u8], signature: &[u8]) -> Result<bool, KeyshareError> {
    match public_key {
        PublicKey::Rsa(key) => {
            let Ok(sig) = rsa::pkcs1v15::Signature::try_from(signature) else {
                return Ok(false);
            };
            let verifying_key = rsa::pkcs1v15::VerifyingKey::<Sha256>::new(key.clone());
            Ok(verifying_key.verify(data, &sig).is_ok())
        }
        PublicKey::Dsa(key) => {
            let Ok(sig) = dsa::Signature::try_from(signature) else {
                return Ok(false);
            };
            Ok(key.verify_digest(Sha256::new_with_prefix(data), &sig).is_ok())
        }
        _ => Err(KeyshareError::Unsupported("verification requires an RSA or DSA key")),
    }
}
