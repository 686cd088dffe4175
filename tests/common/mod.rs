//! Shared machine file fixtures for integration tests.

#![allow(dead_code)]

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::{Signer, SigningKey};
use machinewarden::protocol::envelope::encode_machine_file;
use machinewarden::{LicenseEnvelope, LineEnding, MachineVerifier, VerifierConfig};
use sha2::{Digest, Sha256};

// RFC 8032 test vector 1 (DO NOT USE IN PRODUCTION)
pub const TEST_SIGNING_SEED: &str =
    "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
pub const TEST_VERIFY_KEY_HEX: &str =
    "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

pub const LICENSE_KEY: &str = "ABCD-1234";
pub const FINGERPRINT: &str = "deadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef";
pub const DATASET: &str = r#"{"data":{"id":"3a1e","type":"machines","attributes":{"fingerprint":"deadbeef"}},"meta":{"issued":"2026-10-15T00:00:00Z"}}"#;
pub const ALGORITHM: &str = "aes-256-gcm+ed25519";

/// Build the signed record the way the licensing server does.
pub fn issue_envelope(
    license_key: &str,
    fingerprint: &str,
    dataset: &str,
    alg: &str,
) -> LicenseEnvelope {
    let key: [u8; 32] = Sha256::digest(format!("{}{}", license_key, fingerprint)).into();
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let iv = [0x42u8; 12];
    let mut sealed = cipher
        .encrypt(Nonce::from_slice(&iv), dataset.as_bytes())
        .unwrap();
    let tag = sealed.split_off(sealed.len() - 16);
    let enc = format!(
        "{}.{}.{}",
        STANDARD.encode(&sealed),
        STANDARD.encode(iv),
        STANDARD.encode(&tag)
    );

    let seed: [u8; 32] = hex::decode(TEST_SIGNING_SEED).unwrap().try_into().unwrap();
    let signing_key = SigningKey::from_bytes(&seed);
    let sig = STANDARD.encode(
        signing_key
            .sign(format!("machine/{}", enc).as_bytes())
            .to_bytes(),
    );

    LicenseEnvelope {
        enc,
        sig,
        alg: alg.to_string(),
    }
}

/// Issue an armored machine file.
pub fn issue_machine_file(license_key: &str, fingerprint: &str, dataset: &str, alg: &str) -> String {
    encode_machine_file(&issue_envelope(license_key, fingerprint, dataset, alg)).unwrap()
}

pub fn verifier() -> MachineVerifier {
    MachineVerifier::new(VerifierConfig {
        public_key_hex: TEST_VERIFY_KEY_HEX,
        line_ending: LineEnding::Lf,
    })
    .unwrap()
}
