//! Cryptographic primitives for machine file verification.

pub mod aead;
pub mod digest;
pub mod pipeline;
pub mod signing;
pub mod verify;
