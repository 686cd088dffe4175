//! Machine Verifier - the main public API for Machinewarden.
//!
//! The `MachineVerifier` ties the pipeline to its inputs:
//! - In-memory machine file text
//! - License key and machine file paths on disk
//! - Host fingerprint from a serial source

use crate::config::VerifierConfig;
use crate::crypto::pipeline::{verify_machine_file, NoopObserver, StageObserver};
use crate::host::{machine_fingerprint, SerialSource};
use crate::loader::{load_license_key, load_machine_file};
use crate::protocol::models::VerificationOutcome;
use crate::MachineFileError;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Main machine file verifier.
///
/// Holds no per-run state; one instance may serve any number of
/// verifications, including from several threads.
pub struct MachineVerifier {
    config: VerifierConfig,
    observer: Arc<dyn StageObserver>,
}

impl MachineVerifier {
    /// Create a new verifier with the given configuration.
    ///
    /// # Errors
    /// Returns an error if configuration validation fails.
    pub fn new(config: VerifierConfig) -> Result<Self, MachineFileError> {
        Self::with_observer(config, Arc::new(NoopObserver))
    }

    /// Create a verifier that reports stage transitions to `observer`.
    pub fn with_observer(
        config: VerifierConfig,
        observer: Arc<dyn StageObserver>,
    ) -> Result<Self, MachineFileError> {
        config.validate()?;
        Ok(Self { config, observer })
    }

    /// Verify a machine file and decrypt its dataset.
    ///
    /// # Errors
    /// - `MissingLicense` - Empty license key
    /// - `Decode` / `Parse` - Machine file is malformed
    /// - `UnsupportedAlgorithm` - `alg` is not supported
    /// - `SignatureInvalid` - Machine file was not issued by the trusted key
    /// - `Decryption` - Machine file is not bound to this key and fingerprint
    pub fn verify(
        &self,
        license_key: &str,
        fingerprint: &str,
        machine_file: &str,
    ) -> Result<String, MachineFileError> {
        if license_key.is_empty() {
            return Err(MachineFileError::MissingLicense);
        }

        let plaintext = verify_machine_file(
            machine_file,
            license_key,
            fingerprint,
            &self.config,
            self.observer.as_ref(),
        )?;
        info!("machine file verified and decrypted");
        Ok(plaintext)
    }

    /// Verify using a license key file and a machine file on disk.
    pub fn verify_files(
        &self,
        license_path: &Path,
        machine_path: &Path,
        fingerprint: &str,
    ) -> Result<String, MachineFileError> {
        let license_key = load_license_key(license_path)?;
        let machine_file = load_machine_file(machine_path)?;
        self.verify(&license_key, fingerprint, &machine_file)
    }

    /// Verify files on disk against this host's fingerprint.
    pub fn verify_host(
        &self,
        license_path: &Path,
        machine_path: &Path,
        serial: &dyn SerialSource,
    ) -> Result<String, MachineFileError> {
        let fingerprint = machine_fingerprint(serial)?;
        self.verify_files(license_path, machine_path, &fingerprint)
    }

    /// Verify and fold the result into a [`VerificationOutcome`].
    pub fn outcome(
        &self,
        license_key: &str,
        fingerprint: &str,
        machine_file: &str,
    ) -> VerificationOutcome {
        VerificationOutcome::from_result(self.verify(license_key, fingerprint, machine_file))
    }

    /// Get the current configuration.
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::host::StaticSerial;
    use crate::protocol::envelope::LineEnding;
    use tempfile::TempDir;

    fn test_config() -> VerifierConfig {
        VerifierConfig {
            public_key_hex: "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a",
            line_ending: LineEnding::Lf,
        }
    }

    #[test]
    fn test_verifier_creation() {
        assert!(MachineVerifier::new(test_config()).is_ok());
    }

    #[test]
    fn test_verifier_rejects_bad_config() {
        let config = VerifierConfig {
            public_key_hex: "short",
            line_ending: LineEnding::Lf,
        };
        assert!(matches!(
            MachineVerifier::new(config),
            Err(MachineFileError::ConfigError(_))
        ));
    }

    #[test]
    fn test_verify_empty_license_key() {
        let verifier = MachineVerifier::new(test_config()).unwrap();
        let result = verifier.verify("", "deadbeef", "");
        assert!(matches!(result, Err(MachineFileError::MissingLicense)));
    }

    #[test]
    fn test_outcome_for_garbage() {
        let verifier = MachineVerifier::new(test_config()).unwrap();
        let outcome = verifier.outcome("ABCD-1234", "deadbeef", "garbage");
        assert!(!outcome.ok);
        assert!(outcome.plaintext.is_none());
        assert_eq!(outcome.error, Some(ErrorKind::Decode));
    }

    #[test]
    fn test_verify_files_missing_machine_file() {
        let dir = TempDir::new().unwrap();
        let license = dir.path().join("license.lic");
        std::fs::write(&license, "ABCD-1234").unwrap();

        let verifier = MachineVerifier::new(test_config()).unwrap();
        let result = verifier.verify_files(&license, &dir.path().join("machine.lic"), "deadbeef");
        assert!(matches!(result, Err(MachineFileError::Io(_))));
    }

    #[test]
    fn test_verify_host_without_serial() {
        let dir = TempDir::new().unwrap();
        let verifier = MachineVerifier::new(test_config()).unwrap();
        let result = verifier.verify_host(
            &dir.path().join("license.lic"),
            &dir.path().join("machine.lic"),
            &StaticSerial::unavailable(),
        );
        assert!(matches!(result, Err(MachineFileError::SerialUnavailable(_))));
    }

    #[test]
    fn test_config_accessor() {
        let verifier = MachineVerifier::new(test_config()).unwrap();
        assert_eq!(verifier.config().line_ending, LineEnding::Lf);
    }

    #[test]
    fn test_verifier_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MachineVerifier>();
    }
}
