//! Ed25519 signature verification.

use crate::crypto::signing::{build_signing_message, SigningDomain};
use crate::MachineFileError;
use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::RwLock;

/// Cache for decoded verifying keys.
static KEY_CACHE: OnceCell<RwLock<HashMap<String, VerifyingKey>>> = OnceCell::new();

/// Decode a hex-encoded Ed25519 public key.
///
/// The key is cached after first decode for performance.
pub fn decode_public_key(hex_key: &str) -> Result<VerifyingKey, MachineFileError> {
    // Check cache first
    let cache = KEY_CACHE.get_or_init(|| RwLock::new(HashMap::new()));
    if let Ok(guard) = cache.read() {
        if let Some(key) = guard.get(hex_key) {
            return Ok(*key);
        }
    }

    let bytes = hex::decode(hex_key)
        .map_err(|e| MachineFileError::ConfigError(format!("Invalid public key hex: {}", e)))?;

    let key_array: [u8; 32] = bytes
        .try_into()
        .map_err(|_| MachineFileError::ConfigError("Public key must be 32 bytes".to_string()))?;

    let verifying_key = VerifyingKey::from_bytes(&key_array).map_err(|e| {
        MachineFileError::ConfigError(format!("Invalid Ed25519 public key: {}", e))
    })?;

    // Best-effort insert into cache. If locking fails, still return the decoded key.
    if let Ok(mut guard) = cache.write() {
        guard.insert(hex_key.to_string(), verifying_key);
    }

    Ok(verifying_key)
}

/// Verify an Ed25519 signature against a message.
pub fn verify_ed25519(
    signature_b64: &str,
    message: &[u8],
    verifying_key: &VerifyingKey,
) -> Result<(), MachineFileError> {
    let sig_bytes = STANDARD
        .decode(signature_b64)
        .map_err(|e| MachineFileError::Decode(format!("invalid signature base64: {}", e)))?;

    let sig_array: [u8; 64] = sig_bytes
        .try_into()
        .map_err(|_| MachineFileError::SignatureInvalid)?;

    let signature = Signature::from_bytes(&sig_array);

    verifying_key
        .verify(message, &signature)
        .map_err(|_| MachineFileError::SignatureInvalid)?;

    Ok(())
}

/// Verify a machine file signature over `machine/<enc>`.
pub fn verify_machine_signature(
    enc: &str,
    signature_b64: &str,
    verifying_key: &VerifyingKey,
) -> Result<(), MachineFileError> {
    let message = build_signing_message(SigningDomain::Machine, enc);
    verify_ed25519(signature_b64, message.as_bytes(), verifying_key)
}
