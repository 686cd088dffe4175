//! Machinewarden error types.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while verifying or decrypting a machine file.
///
/// Messages never carry the license key, the derived secret, or any
/// decrypted bytes.
#[derive(Debug, Error)]
pub enum MachineFileError {
    /// Verifier configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Envelope framing, base64 or UTF-8 decoding failed.
    #[error("Failed to decode machine file: {0}")]
    Decode(String),

    /// Decoded payload is not a well-formed `{enc, sig, alg}` record.
    #[error("Failed to parse machine file: {0}")]
    Parse(String),

    /// The `alg` field names a scheme other than the supported one.
    #[error("Unsupported algorithm: {algorithm}")]
    UnsupportedAlgorithm {
        /// The rejected algorithm identifier.
        algorithm: String,
    },

    /// Ed25519 signature over the envelope did not verify.
    #[error("Invalid machine file")]
    SignatureInvalid,

    /// Key material could not be turned into a decryption secret.
    #[error("Failed to derive decryption key: {0}")]
    KeyDerivation(String),

    /// Ciphertext framing was malformed or the authentication tag did not match.
    #[error("Failed to decrypt machine file: {0}")]
    Decryption(String),

    /// File or host access failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// No license key provided.
    #[error("No license key provided")]
    MissingLicense,

    /// Host serial number could not be obtained.
    #[error("Unable to get serial number: {0}")]
    SerialUnavailable(String),

    /// Reading the serial number requires elevated privileges.
    #[error("Insufficient privileges to read the serial number (run as root)")]
    InsufficientPrivilege,

    /// Host platform has no serial number source.
    #[error("Unsupported platform: {0} (supported: Windows, Linux, macOS)")]
    UnsupportedPlatform(String),
}

/// Fieldless classification of [`MachineFileError`] for structured results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad framing, base64 or encoding.
    Decode,
    /// Malformed structured record.
    Parse,
    /// Algorithm gate rejection.
    UnsupportedAlgorithm,
    /// Signature did not verify.
    SignatureInvalid,
    /// Key derivation failed.
    KeyDerivation,
    /// Authenticated decryption failed.
    Decryption,
    /// File or host access failed (includes serial lookup).
    Io,
    /// Verifier misconfigured or license key missing.
    Config,
}

impl MachineFileError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigError(_) | Self::MissingLicense => ErrorKind::Config,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Parse(_) => ErrorKind::Parse,
            Self::UnsupportedAlgorithm { .. } => ErrorKind::UnsupportedAlgorithm,
            Self::SignatureInvalid => ErrorKind::SignatureInvalid,
            Self::KeyDerivation(_) => ErrorKind::KeyDerivation,
            Self::Decryption(_) => ErrorKind::Decryption,
            Self::Io(_)
            | Self::SerialUnavailable(_)
            | Self::InsufficientPrivilege
            | Self::UnsupportedPlatform(_) => ErrorKind::Io,
        }
    }
}
