//! Loading license keys and machine files from disk.

use crate::MachineFileError;
use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

/// Read a license key file.
///
/// One trailing line terminator is dropped; everything else is kept
/// byte-for-byte since the key feeds straight into key derivation.
pub fn load_license_key(path: &Path) -> Result<Zeroizing<String>, MachineFileError> {
    let bytes = Zeroizing::new(fs::read(path).map_err(|e| {
        MachineFileError::Io(format!("Failed to read license file {}: {}", path.display(), e))
    })?);

    let text = std::str::from_utf8(&bytes).map_err(|_| {
        MachineFileError::KeyDerivation(format!(
            "license file {} is not valid UTF-8",
            path.display()
        ))
    })?;

    let key = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text);

    if key.is_empty() {
        return Err(MachineFileError::MissingLicense);
    }

    Ok(Zeroizing::new(key.to_string()))
}

/// Read a machine file.
pub fn load_machine_file(path: &Path) -> Result<String, MachineFileError> {
    fs::read_to_string(path).map_err(|e| {
        MachineFileError::Io(format!("Failed to read machine file {}: {}", path.display(), e))
    })
}
