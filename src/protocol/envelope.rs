//! Machine file envelope decoding.
//!
//! A machine file looks like:
//! ```text
//! -----BEGIN MACHINE FILE-----
//! eyJlbmMiOiIuLi4iLCJzaWciOiIuLi4iLCJhbGciOiJhZXMtMjU2LWdjbStlZDI1NTE5In0=
//! -----END MACHINE FILE-----
//! ```
//!
//! Header and footer are anchored: the header must open the text and the
//! footer must close it (one trailing newline allowed). Content after the
//! footer is never silently dropped.

use crate::protocol::models::LicenseEnvelope;
use crate::MachineFileError;
use base64::{engine::general_purpose::STANDARD, Engine};

/// First line of every machine file.
pub const MACHINE_FILE_HEADER: &str = "-----BEGIN MACHINE FILE-----";

/// Last line of every machine file.
pub const MACHINE_FILE_FOOTER: &str = "-----END MACHINE FILE-----";

/// Line-ending convention of a machine file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n` (Linux, macOS).
    Lf,
    /// `\r\n` (Windows).
    CrLf,
}

impl LineEnding {
    /// Convention of the host this binary was built for.
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::CrLf
        } else {
            Self::Lf
        }
    }

    fn normalize<'a>(&self, raw: &'a str) -> std::borrow::Cow<'a, str> {
        match self {
            Self::Lf => std::borrow::Cow::Borrowed(raw),
            Self::CrLf => std::borrow::Cow::Owned(raw.replace("\r\n", "\n")),
        }
    }
}

/// Strip header, footer and line breaks, leaving the base64 payload.
pub fn extract_payload(raw: &str, line_ending: LineEnding) -> Result<String, MachineFileError> {
    let text = line_ending.normalize(raw);

    let body = text
        .strip_prefix(MACHINE_FILE_HEADER)
        .and_then(|rest| rest.strip_prefix('\n'))
        .ok_or_else(|| MachineFileError::Decode("missing machine file header".to_string()))?;

    let body = body.strip_suffix('\n').unwrap_or(body);
    let body = body
        .strip_suffix(MACHINE_FILE_FOOTER)
        .ok_or_else(|| {
            MachineFileError::Decode("missing or misplaced machine file footer".to_string())
        })?;

    let payload: String = body.split('\n').collect();
    if payload.is_empty() {
        return Err(MachineFileError::Decode("empty machine file body".to_string()));
    }

    Ok(payload)
}

/// Decode raw machine file text into its envelope record.
pub fn decode_machine_file(
    raw: &str,
    line_ending: LineEnding,
) -> Result<LicenseEnvelope, MachineFileError> {
    let payload = extract_payload(raw, line_ending)?;

    let bytes = STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| MachineFileError::Decode(format!("invalid base64: {}", e)))?;

    let json = String::from_utf8(bytes)
        .map_err(|e| MachineFileError::Decode(format!("payload is not UTF-8: {}", e)))?;

    LicenseEnvelope::from_json(&json)
}

/// Wrap a JSON record into machine file text (64-column base64 lines).
pub fn encode_machine_file(envelope: &LicenseEnvelope) -> Result<String, MachineFileError> {
    let json =
        serde_json::to_string(envelope).map_err(|e| MachineFileError::Parse(e.to_string()))?;
    let encoded = STANDARD.encode(json.as_bytes());

    let mut out = String::with_capacity(encoded.len() + 80);
    out.push_str(MACHINE_FILE_HEADER);
    out.push('\n');
    for chunk in encoded.as_bytes().chunks(64) {
        // base64 output is ASCII
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push('\n');
    }
    out.push_str(MACHINE_FILE_FOOTER);
    out.push('\n');
    Ok(out)
}
