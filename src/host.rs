//! Host serial number lookup and machine fingerprinting.
//!
//! The serial source is chosen at compile time per target OS:
//! - Linux: `/sys/class/dmi/id/product_serial` (root only)
//! - Windows: `Win32_BIOS.SerialNumber` via PowerShell CIM
//! - macOS: `IOPlatformSerialNumber` from `ioreg`
//!
//! Any other OS has no serial source and reports `UnsupportedPlatform`.

use crate::crypto::digest::fingerprint_from_serial;
use crate::MachineFileError;
use tracing::debug;

/// Location of the DMI product serial on Linux.
pub const LINUX_SERIAL_PATH: &str = "/sys/class/dmi/id/product_serial";

/// Source of the hardware serial number.
pub trait SerialSource: Send + Sync {
    /// Read the serial number.
    fn serial_number(&self) -> Result<String, MachineFileError>;
}

/// Serial source for the host this binary was built for.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostSerial;

impl SerialSource for HostSerial {
    fn serial_number(&self) -> Result<String, MachineFileError> {
        let serial = read_host_serial()?;
        if serial.trim().is_empty() {
            return Err(MachineFileError::SerialUnavailable(
                "serial number is empty".to_string(),
            ));
        }
        debug!(os = std::env::consts::OS, "host serial number read");
        Ok(serial)
    }
}

#[cfg(target_os = "linux")]
fn read_host_serial() -> Result<String, MachineFileError> {
    read_serial_file(std::path::Path::new(LINUX_SERIAL_PATH))
}

#[cfg(target_os = "windows")]
fn read_host_serial() -> Result<String, MachineFileError> {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use std::process::Command;

    let script = "(Get-CimInstance -ClassName Win32_BIOS | Select-Object -First 1).SerialNumber";
    // -EncodedCommand takes base64 UTF-16LE
    let encoded = STANDARD.encode(
        script
            .encode_utf16()
            .flat_map(|c| c.to_le_bytes())
            .collect::<Vec<u8>>(),
    );
    let output = Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-EncodedCommand", &encoded])
        .output()
        .map_err(|e| MachineFileError::SerialUnavailable(format!("powershell: {}", e)))?;

    if !output.status.success() {
        return Err(MachineFileError::SerialUnavailable(format!(
            "powershell exited with {}",
            output.status
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(target_os = "macos")]
fn read_host_serial() -> Result<String, MachineFileError> {
    use std::process::Command;

    let output = Command::new("ioreg")
        .args(["-rd1", "-c", "IOPlatformExpertDevice"])
        .output()
        .map_err(|e| MachineFileError::SerialUnavailable(format!("ioreg: {}", e)))?;

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .find(|l| l.contains("IOPlatformSerialNumber"))
        .and_then(|l| l.split('"').nth(3))
        .map(String::from)
        .ok_or_else(|| {
            MachineFileError::SerialUnavailable("IOPlatformSerialNumber not found".to_string())
        })
}

#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
fn read_host_serial() -> Result<String, MachineFileError> {
    Err(MachineFileError::UnsupportedPlatform(
        std::env::consts::OS.to_string(),
    ))
}

/// Read a sysfs-style serial file, dropping its trailing newline.
#[cfg_attr(not(any(test, target_os = "linux")), allow(dead_code))]
fn read_serial_file(path: &std::path::Path) -> Result<String, MachineFileError> {
    let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => MachineFileError::InsufficientPrivilege,
        _ => MachineFileError::SerialUnavailable(format!("{}: {}", path.display(), e)),
    })?;
    Ok(raw.strip_suffix('\n').unwrap_or(&raw).to_string())
}

/// Fixed serial source for tests.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug, Clone)]
pub struct StaticSerial {
    serial: Option<String>,
}

#[cfg(any(test, feature = "test-seams"))]
impl StaticSerial {
    /// Source that always returns `serial`.
    pub fn new(serial: impl Into<String>) -> Self {
        Self {
            serial: Some(serial.into()),
        }
    }

    /// Source that always fails as if the host had no serial.
    pub fn unavailable() -> Self {
        Self { serial: None }
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl SerialSource for StaticSerial {
    fn serial_number(&self) -> Result<String, MachineFileError> {
        self.serial
            .clone()
            .ok_or_else(|| MachineFileError::SerialUnavailable("static source".to_string()))
    }
}

/// Compute this machine's fingerprint from its serial number.
pub fn machine_fingerprint(source: &dyn SerialSource) -> Result<String, MachineFileError> {
    let serial = source.serial_number()?;
    Ok(fingerprint_from_serial(&serial))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_machine_fingerprint_from_static_serial() {
        let source = StaticSerial::new("abc");
        let fingerprint = machine_fingerprint(&source).unwrap();
        assert_eq!(fingerprint, fingerprint_from_serial("abc"));
        assert_eq!(fingerprint.len(), 128);
    }

    #[test]
    fn test_machine_fingerprint_unavailable() {
        let result = machine_fingerprint(&StaticSerial::unavailable());
        assert!(matches!(result, Err(MachineFileError::SerialUnavailable(_))));
    }

    #[test]
    fn test_read_serial_file_strips_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("product_serial");
        std::fs::write(&path, "PF2ABCDE\n").unwrap();
        assert_eq!(read_serial_file(&path).unwrap(), "PF2ABCDE");
    }

    #[test]
    fn test_read_serial_file_without_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("product_serial");
        std::fs::write(&path, "PF2ABCDE").unwrap();
        assert_eq!(read_serial_file(&path).unwrap(), "PF2ABCDE");
    }

    #[test]
    fn test_read_serial_file_missing() {
        let dir = TempDir::new().unwrap();
        let result = read_serial_file(&dir.path().join("missing"));
        assert!(matches!(result, Err(MachineFileError::SerialUnavailable(_))));
    }
}
