//! Signing message construction.
//!
//! Keygen signs each certificate type under its own prefix:
//! ```text
//! machine/<enc>
//! license/<enc>
//! ```
//! A signature made for one prefix never verifies under another.

/// Certificate type a signature was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningDomain {
    /// Machine file (`machine/`).
    Machine,
    /// License file (`license/`).
    License,
}

impl SigningDomain {
    /// Prefix prepended to the signed data.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Machine => "machine/",
            Self::License => "license/",
        }
    }
}

/// Build the exact byte string the issuer signed.
pub fn build_signing_message(domain: SigningDomain, enc: &str) -> String {
    let prefix = domain.prefix();
    let mut message = String::with_capacity(prefix.len() + enc.len());
    message.push_str(prefix);
    message.push_str(enc);
    message
}
