//! Verification pipeline composing all machine file checks.
//!
//! This module provides the unified verification flow:
//! 1. Decode the envelope (header/footer, base64, JSON)
//! 2. Gate on the algorithm identifier
//! 3. Verify the Ed25519 signature over `machine/<enc>`
//! 4. Derive the AES key from license key and fingerprint
//! 5. Decrypt and authenticate the dataset
//!
//! Each step runs only if the previous one succeeded.

use crate::config::VerifierConfig;
use crate::crypto::{
    aead::decrypt_enc,
    digest::derive_secret,
    verify::{decode_public_key, verify_machine_signature},
};
use crate::protocol::envelope::decode_machine_file;
use crate::MachineFileError;
use tracing::{debug, warn};

/// Pipeline checkpoints, in the order they are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Envelope decoded into `{enc, sig, alg}`.
    Decoded,
    /// Algorithm identifier accepted.
    AlgorithmAccepted,
    /// Signature verified.
    SignatureVerified,
    /// Decryption secret derived.
    KeyDerived,
    /// Dataset decrypted and authenticated.
    Decrypted,
}

/// Observer notified as the pipeline advances.
pub trait StageObserver: Send + Sync {
    /// Called once per stage reached.
    fn on_stage(&self, stage: Stage);
}

/// Observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {
    fn on_stage(&self, _stage: Stage) {}
}

/// Verify a machine file and decrypt its dataset.
///
/// # Arguments
/// * `machine_file` - Raw machine file text
/// * `license_key` - License key the machine file was issued for
/// * `fingerprint` - Fingerprint of the machine the file was issued for
/// * `config` - Public key and line-ending convention
/// * `observer` - Notified on each stage transition
///
/// # Returns
/// * `Ok(plaintext)` - Machine file is authentic and bound to this machine
/// * `Err(Decode | Parse)` - Envelope malformed
/// * `Err(UnsupportedAlgorithm)` - `alg` is not `aes-256-gcm+ed25519`
/// * `Err(SignatureInvalid)` - Signature does not verify
/// * `Err(Decryption)` - Framing malformed or tag mismatch
pub fn verify_machine_file(
    machine_file: &str,
    license_key: &str,
    fingerprint: &str,
    config: &VerifierConfig,
    observer: &dyn StageObserver,
) -> Result<String, MachineFileError> {
    let result = run_stages(machine_file, license_key, fingerprint, config, observer);
    if let Err(ref e) = result {
        warn!(kind = ?e.kind(), "machine file rejected: {}", e);
    }
    result
}

fn run_stages(
    machine_file: &str,
    license_key: &str,
    fingerprint: &str,
    config: &VerifierConfig,
    observer: &dyn StageObserver,
) -> Result<String, MachineFileError> {
    // 1. Decode envelope
    let envelope = decode_machine_file(machine_file, config.line_ending)?;
    advance(observer, Stage::Decoded);

    // 2. Algorithm gate
    let algorithm = envelope.algorithm()?;
    debug!(algorithm = algorithm.as_str(), "algorithm accepted");
    advance(observer, Stage::AlgorithmAccepted);

    // 3. Verify signature
    let verifying_key = decode_public_key(config.public_key_hex)?;
    verify_machine_signature(&envelope.enc, &envelope.sig, &verifying_key)?;
    advance(observer, Stage::SignatureVerified);

    // 4. Derive secret
    let secret = derive_secret(license_key, fingerprint);
    advance(observer, Stage::KeyDerived);

    // 5. Decrypt
    let plaintext = decrypt_enc(&envelope.enc, &secret)?;
    advance(observer, Stage::Decrypted);

    Ok(plaintext)
}

fn advance(observer: &dyn StageObserver, stage: Stage) {
    debug!(?stage, "machine file stage reached");
    observer.on_stage(stage);
}
