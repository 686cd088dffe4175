//! # Machinewarden
//!
//! **Offline verification of [Keygen.sh](https://keygen.sh) machine files for Rust.**
//!
//! A machine file is a signed certificate that binds a license to one
//! machine. Machinewarden checks that the file was signed by your Keygen
//! account and decrypts its dataset with a key derived from the license key
//! and the machine fingerprint, so a file copied to another machine (or used
//! with another license) never decrypts.
//!
//! ## Features
//!
//! - **Ed25519 signature verification** — over the `machine/`-prefixed dataset
//! - **AES-256-GCM decryption** — tag verified before any plaintext is returned
//! - **Strict envelope parsing** — anchored header/footer, no trailing data
//! - **Single algorithm** — `aes-256-gcm+ed25519` only, no negotiation
//! - **Fail-closed** — every stage failure aborts with a typed error
//!
//! ## Quickstart
//!
//! ```no_run
//! use machinewarden::{MachineVerifier, VerifierConfig};
//! use machinewarden::host::{machine_fingerprint, HostSerial};
//!
//! fn main() -> Result<(), machinewarden::MachineFileError> {
//!     let config = VerifierConfig::new(
//!         "your-keygen-ed25519-public-key-hex-00000000000000000000000000000",
//!     );
//!     let verifier = MachineVerifier::new(config)?;
//!
//!     let fingerprint = machine_fingerprint(&HostSerial)?;
//!     let machine_file = std::fs::read_to_string("machine.lic").unwrap();
//!     let dataset = verifier.verify("LICENSE-KEY-HERE", &fingerprint, &machine_file)?;
//!     println!("{}", dataset);
//!     Ok(())
//! }
//! ```
//!
//! ## Threat Model
//!
//! Machinewarden protects against:
//! - **Forged machine files** — signature mismatch
//! - **Cross-machine reuse** — wrong fingerprint yields a tag mismatch
//! - **Cross-type replay** — a `license/` signature is not a `machine/` signature
//!
//! It performs no revocation checking and makes no network calls. Client-side
//! licensing can always be bypassed by a determined attacker with access to
//! the binary.

#![deny(warnings)]
#![deny(missing_docs)]

// Core modules
pub mod config;
pub mod errors;

// Crypto layer
pub mod crypto;

// Protocol layer
pub mod protocol;

// Host layer
pub mod host;
pub mod loader;

// Verifier (main public API)
pub mod manager;

// Re-exports for public API
pub use config::VerifierConfig;
pub use crypto::pipeline::{Stage, StageObserver};
pub use errors::{ErrorKind, MachineFileError};
pub use manager::MachineVerifier;
pub use protocol::envelope::LineEnding;
pub use protocol::models::{LicenseEnvelope, VerificationOutcome};

#[cfg(any(test, feature = "test-seams"))]
pub use host::StaticSerial;
