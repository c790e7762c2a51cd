//! Wire format types and serialization utilities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::KeyshareError;

/// Sharing scheme identifier recorded in every bundle.
///
/// - Shamir secret sharing over GF(2^8), modulus `x^8 + x^4 + x^3 + x + 1` (0x11B)
/// - Share x-coordinates are `1..=keys_count`
/// - Secret bytes are PKCS#7 padded to a multiple of the chunk size before splitting
pub const SCHEME_V1: &str = "Shamir-GF256-0x11B+PKCS7";

/// Format version of [`Share`] and [`SharedSecretBundle`].
pub const SHARE_FORMAT_V1: u32 = 1;

/// Chunk size used when none is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 16;

/// Named elliptic curves supported for ECC keypairs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EccCurve {
    /// NIST P-256 (secp256r1).
    P256,
    /// NIST P-384 (secp384r1).
    P384,
    /// NIST P-521 (secp521r1).
    P521,
}

impl EccCurve {
    /// Length in bytes of a serialized private scalar on this curve.
    pub fn scalar_len(self) -> usize {
        match self {
            EccCurve::P256 => 32,
            EccCurve::P384 => 48,
            EccCurve::P521 => 66,
        }
    }
}

impl FromStr for EccCurve {
    type Err = KeyshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "p256" | "p-256" | "secp256r1" | "prime256v1" => Ok(EccCurve::P256),
            "p384" | "p-384" | "secp384r1" => Ok(EccCurve::P384),
            "p521" | "p-521" | "secp521r1" => Ok(EccCurve::P521),
            _ => Err(KeyshareError::InvalidInput(format!("unknown curve {s}"))),
        }
    }
}

impl fmt::Display for EccCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EccCurve::P256 => f.write_str("p256"),
            EccCurve::P384 => f.write_str("p384"),
            EccCurve::P521 => f.write_str("p521"),
        }
    }
}

/// DSA domain parameter sizes `(L, N)` in bits.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DsaKeySize {
    /// L = 2048, N = 224.
    L2048N224,
    /// L = 2048, N = 256.
    L2048N256,
    /// L = 3072, N = 256.
    L3072N256,
}

impl From<DsaKeySize> for dsa::KeySize {
    fn from(size: DsaKeySize) -> Self {
        match size {
            DsaKeySize::L2048N224 => dsa::KeySize::DSA_2048_224,
            DsaKeySize::L2048N256 => dsa::KeySize::DSA_2048_256,
            DsaKeySize::L3072N256 => dsa::KeySize::DSA_3072_256,
        }
    }
}

/// Key family, enough to decode a serialized key.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Rsa,
    Dsa,
    Ecc(EccCurve),
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Rsa => f.write_str("rsa"),
            KeyKind::Dsa => f.write_str("dsa"),
            KeyKind::Ecc(curve) => write!(f, "ecc-{curve}"),
        }
    }
}

/// Algorithm and parameters for a keypair request.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    /// RSA with a modulus of `bits` bits (at least 1024).
    Rsa { bits: usize },
    /// DSA with the given domain parameter sizes.
    Dsa { size: DsaKeySize },
    /// ECDSA/ECDH-capable key on a named curve.
    Ecc { curve: EccCurve },
}

impl KeyAlgorithm {
    /// The key family produced by this algorithm.
    pub fn kind(&self) -> KeyKind {
        match self {
            KeyAlgorithm::Rsa { .. } => KeyKind::Rsa,
            KeyAlgorithm::Dsa { .. } => KeyKind::Dsa,
            KeyAlgorithm::Ecc { curve } => KeyKind::Ecc(*curve),
        }
    }
}

impl Default for KeyAlgorithm {
    fn default() -> Self {
        KeyAlgorithm::Rsa { bits: 2048 }
    }
}

/// One share of a split secret.
///
/// `data` holds the evaluation at `index` of every padded secret byte, so its
/// length is a multiple of `chunk_size` and equal across all shares of the
/// same secret.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Share {
    /// Format version number.
    pub v: u32,
    /// Polynomial x-coordinate, never zero.
    pub index: u8,
    /// Number of shares required to reconstruct.
    pub threshold: u8,
    /// Chunk size the secret was padded to.
    pub chunk_size: u8,
    /// Share payload.
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

impl Share {
    /// Iterate over the payload one chunk at a time.
    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks(usize::from(self.chunk_size).max(1))
    }

    /// Encode this share for transport.
    pub fn to_bytes(&self) -> Result<Vec<u8>, KeyshareError> {
        to_cbor_canonical(self)
    }

    /// Decode a share produced by [`Share::to_bytes`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, KeyshareError> {
        from_cbor(data)
    }
}

// Share payloads are secret material; keep them out of debug output.
impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("v", &self.v)
            .field("index", &self.index)
            .field("threshold", &self.threshold)
            .field("chunk_size", &self.chunk_size)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Result of a shared-secret request: the split private key and its public half.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SharedSecretBundle {
    /// Format version number.
    pub v: u32,
    /// Sharing scheme identifier (e.g., `SCHEME_V1`).
    pub scheme: String,
    /// Caller correlation token, carried through untouched.
    pub uid: Uuid,
    /// Family of the split private key.
    pub kind: KeyKind,
    /// Unix timestamp in seconds since epoch.
    pub created_unix: u64,
    /// Public key: SubjectPublicKeyInfo DER for RSA/DSA, SEC1 for ECC.
    #[serde(with = "serde_bytes")]
    pub public_key: Vec<u8>,
    /// Number of shares produced.
    pub keys_count: u8,
    /// Number of shares required to reconstruct.
    pub threshold_count: u8,
    /// Shares in x-coordinate order.
    pub shares: Vec<Share>,
}

/// Serialize a value to canonical CBOR format.
///
/// The output includes a CBOR self-describe tag.
pub fn to_cbor_canonical<T: serde::Serialize>(v: &T) -> Result<Vec<u8>, KeyshareError> {
    let mut buf = Vec::new();
    let mut ser = serde_cbor::ser::Serializer::new(&mut buf);
    ser.self_describe()
        .map_err(|e| KeyshareError::Ser(e.to_string()))?;
    v.serialize(&mut ser)
        .map_err(|e| KeyshareError::Ser(e.to_string()))?;
    Ok(buf)
}

/// Deserialize a value from CBOR format.
pub fn from_cbor<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T, KeyshareError> {
    serde_cbor::from_slice::<T>(data).map_err(|e| KeyshareError::Ser(e.to_string()))
}
