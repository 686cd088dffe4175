//! Machine file wire format.

pub mod envelope;
pub mod models;
