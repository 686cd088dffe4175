//! Machine file record structs and the structured verification outcome.

use crate::config::SUPPORTED_ALGORITHM;
use crate::errors::{ErrorKind, MachineFileError};
use serde::{Deserialize, Serialize};

/// Decoded machine file certificate.
///
/// `enc` is three base64 segments joined by `.`: ciphertext, IV, tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LicenseEnvelope {
    /// Encrypted dataset (`<ciphertext>.<iv>.<tag>`).
    pub enc: String,
    /// Base64 Ed25519 signature over `machine/<enc>`.
    pub sig: String,
    /// Algorithm identifier.
    pub alg: String,
}

impl LicenseEnvelope {
    /// Parse the JSON record embedded in a machine file.
    pub fn from_json(json: &str) -> Result<Self, MachineFileError> {
        serde_json::from_str(json).map_err(|e| MachineFileError::Parse(e.to_string()))
    }

    /// Run the algorithm gate over this envelope's `alg` field.
    pub fn algorithm(&self) -> Result<Algorithm, MachineFileError> {
        Algorithm::parse(&self.alg)
    }
}

/// Cipher and signature scheme combinations understood by the verifier.
///
/// New schemes must be added as explicit variants; there is no negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// AES-256-GCM encryption, Ed25519 signature.
    Aes256GcmEd25519,
}

impl Algorithm {
    /// Accept exactly the supported identifier.
    pub fn parse(alg: &str) -> Result<Self, MachineFileError> {
        match alg {
            SUPPORTED_ALGORITHM => Ok(Self::Aes256GcmEd25519),
            other => Err(MachineFileError::UnsupportedAlgorithm {
                algorithm: other.to_string(),
            }),
        }
    }

    /// The wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aes256GcmEd25519 => SUPPORTED_ALGORITHM,
        }
    }
}

/// Result of a verification run, suitable for handing to collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationOutcome {
    /// Whether the machine file verified and decrypted.
    pub ok: bool,
    /// Decrypted payload (present only when `ok`).
    pub plaintext: Option<String>,
    /// Failure class (present only when not `ok`).
    pub error: Option<ErrorKind>,
}

impl VerificationOutcome {
    /// Fold a pipeline result into an outcome.
    pub fn from_result(result: Result<String, MachineFileError>) -> Self {
        match result {
            Ok(plaintext) => Self {
                ok: true,
                plaintext: Some(plaintext),
                error: None,
            },
            Err(e) => Self {
                ok: false,
                plaintext: None,
                error: Some(e.kind()),
            },
        }
    }
}
