//! AES-256-GCM decryption of the machine file dataset.
//!
//! The `enc` field is `<base64(ciphertext)>.<base64(iv)>.<base64(tag)>`.
//! The cipher consumes `ciphertext ++ tag`; the order is fixed by the issuer.

use crate::crypto::digest::SymmetricSecret;
use crate::MachineFileError;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine};

/// Byte length of an AES-GCM nonce (96 bits).
pub const IV_SIZE: usize = 12;

/// Byte length of an AES-GCM authentication tag (128 bits).
pub const TAG_SIZE: usize = 16;

/// Decoded parts of an `enc` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherComponents {
    /// Ciphertext without the tag.
    pub ciphertext: Vec<u8>,
    /// GCM nonce.
    pub iv: [u8; IV_SIZE],
    /// GCM authentication tag.
    pub tag: [u8; TAG_SIZE],
}

impl CipherComponents {
    /// Split and decode an `enc` field.
    ///
    /// Exactly three dot-separated segments are required.
    pub fn parse(enc: &str) -> Result<Self, MachineFileError> {
        let segments: Vec<&str> = enc.split('.').collect();
        let [ciphertext_b64, iv_b64, tag_b64] = segments.as_slice() else {
            return Err(MachineFileError::Decryption(format!(
                "expected 3 dot-separated segments, got {}",
                segments.len()
            )));
        };

        let ciphertext = decode_segment("ciphertext", ciphertext_b64)?;

        let iv: [u8; IV_SIZE] = decode_segment("iv", iv_b64)?.try_into().map_err(|v: Vec<u8>| {
            MachineFileError::Decryption(format!("iv must be {} bytes, got {}", IV_SIZE, v.len()))
        })?;

        let tag: [u8; TAG_SIZE] =
            decode_segment("tag", tag_b64)?.try_into().map_err(|v: Vec<u8>| {
                MachineFileError::Decryption(format!(
                    "tag must be {} bytes, got {}",
                    TAG_SIZE,
                    v.len()
                ))
            })?;

        Ok(Self {
            ciphertext,
            iv,
            tag,
        })
    }

    /// Re-encode as an `enc` field.
    pub fn to_enc(&self) -> String {
        format!(
            "{}.{}.{}",
            STANDARD.encode(&self.ciphertext),
            STANDARD.encode(self.iv),
            STANDARD.encode(self.tag)
        )
    }
}

fn decode_segment(name: &str, segment: &str) -> Result<Vec<u8>, MachineFileError> {
    STANDARD
        .decode(segment)
        .map_err(|e| MachineFileError::Decryption(format!("invalid {} base64: {}", name, e)))
}

/// Authenticated decryption; returns plaintext only if the tag verifies.
pub fn decrypt(
    components: &CipherComponents,
    secret: &SymmetricSecret,
) -> Result<Vec<u8>, MachineFileError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(secret.as_bytes()));
    let nonce = Nonce::from_slice(&components.iv);

    let mut input = Vec::with_capacity(components.ciphertext.len() + TAG_SIZE);
    input.extend_from_slice(&components.ciphertext);
    input.extend_from_slice(&components.tag);

    cipher.decrypt(nonce, input.as_slice()).map_err(|_| {
        MachineFileError::Decryption("authentication tag mismatch".to_string())
    })
}

/// Decrypt an `enc` field to UTF-8 text.
pub fn decrypt_enc(enc: &str, secret: &SymmetricSecret) -> Result<String, MachineFileError> {
    let components = CipherComponents::parse(enc)?;
    let plaintext = decrypt(&components, secret)?;
    String::from_utf8(plaintext)
        .map_err(|_| MachineFileError::Decryption("plaintext is not valid UTF-8".to_string()))
}
