//! Digest-based key material.
//!
//! - Decryption secret: `SHA-256(license_key ++ fingerprint)`
//! - Machine fingerprint: `hex(SHA3-512(serial_number))`

use sha2::{Digest, Sha256};
use sha3::Sha3_512;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the derived AES-256 key in bytes.
pub const SECRET_SIZE: usize = 32;

/// Symmetric decryption secret, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricSecret {
    bytes: [u8; SECRET_SIZE],
}

impl SymmetricSecret {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; SECRET_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; SECRET_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for SymmetricSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricSecret")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive the machine file decryption secret.
///
/// The license key bytes come first, then the fingerprint bytes. No salt and
/// no stretching; this must match the issuer bit for bit.
pub fn derive_secret(license_key: &str, fingerprint: &str) -> SymmetricSecret {
    let mut hasher = Sha256::new();
    hasher.update(license_key.as_bytes());
    hasher.update(fingerprint.as_bytes());
    SymmetricSecret::from_bytes(hasher.finalize().into())
}

/// Compute the machine fingerprint for a hardware serial number.
///
/// Lowercase hex, no separators (128 characters).
pub fn fingerprint_from_serial(serial_number: &str) -> String {
    let hash = Sha3_512::digest(serial_number.as_bytes());
    hex::encode(hash)
}
