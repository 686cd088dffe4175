//! Machinewarden configuration.

use crate::protocol::envelope::LineEnding;

/// Default license key file, relative to the working directory.
pub const DEFAULT_LICENSE_FILE: &str = "license.lic";

/// Default machine file, relative to the working directory.
pub const DEFAULT_MACHINE_FILE: &str = "machine.lic";

/// The only `alg` value accepted in a machine file.
pub const SUPPORTED_ALGORITHM: &str = "aes-256-gcm+ed25519";

/// Keygen account Ed25519 verify key for machine files bound to the host serial.
pub const DEFAULT_PUBLIC_KEY_HEX: &str =
    "7757a98a8188c31ae7a21d76a865800bf77bcf3476f7abbbdf5bb6a4afbe9a23";

/// Keygen account Ed25519 verify key for machine files checked against an
/// explicitly supplied fingerprint.
pub const EXPLICIT_PUBLIC_KEY_HEX: &str =
    "e8601e48b69383ba520245fd07971e983d06d22c4257cfd82304601479cee788";

/// Configuration for machine file verification.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Keygen Ed25519 public key (hex-encoded, 64 characters)
    /// SECURITY: This should be hard-coded in your application, not from environment.
    pub public_key_hex: &'static str,

    /// Line-ending convention of machine files on this host.
    pub line_ending: LineEnding,
}

impl VerifierConfig {
    /// Build a configuration for the given key using the host's line ending.
    pub fn new(public_key_hex: &'static str) -> Self {
        Self {
            public_key_hex,
            line_ending: LineEnding::native(),
        }
    }

    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), crate::MachineFileError> {
        if self.public_key_hex.len() != 64 {
            return Err(crate::MachineFileError::ConfigError(format!(
                "public_key_hex must be 64 hex characters, got {}",
                self.public_key_hex.len()
            )));
        }
        Ok(())
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_KEY_HEX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MachineFileError;

    #[test]
    fn test_default_config_is_valid() {
        assert!(VerifierConfig::default().validate().is_ok());
    }

    #[test]
    fn test_explicit_key_config_is_valid() {
        assert!(VerifierConfig::new(EXPLICIT_PUBLIC_KEY_HEX)
            .validate()
            .is_ok());
        assert!(crate::crypto::verify::decode_public_key(EXPLICIT_PUBLIC_KEY_HEX).is_ok());
    }

    #[test]
    fn test_validate_checks_length_only() {
        let config =
            VerifierConfig::new("your-keygen-ed25519-public-key-hex-00000000000000000000000000000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_public_key_rejected() {
        let config = VerifierConfig::new("abcd");
        assert!(matches!(
            config.validate(),
            Err(MachineFileError::ConfigError(_))
        ));
    }
}
