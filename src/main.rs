//! Machinewarden command-line verifier.
//!
//! Usage:
//!   machinewarden                                      # license.lic + machine.lic + host serial
//!   machinewarden LICENSE_FILE MACHINE_FILE FINGERPRINT
//!
//! Exits non-zero on any verification failure.

use anyhow::{Context, Result};
use clap::Parser;
use machinewarden::config::{
    DEFAULT_LICENSE_FILE, DEFAULT_MACHINE_FILE, DEFAULT_PUBLIC_KEY_HEX, EXPLICIT_PUBLIC_KEY_HEX,
};
use machinewarden::host::HostSerial;
use machinewarden::{MachineVerifier, VerifierConfig};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "machinewarden")]
#[command(about = "Verify and decrypt a Keygen machine file bound to this machine")]
struct Args {
    /// License key file
    #[arg(requires_all = ["machine_file", "fingerprint"])]
    license_file: Option<PathBuf>,

    /// Machine file
    #[arg(requires = "fingerprint")]
    machine_file: Option<PathBuf>,

    /// Machine fingerprint (computed from the host serial number when omitted)
    fingerprint: Option<String>,

    /// Print the decrypted dataset
    #[arg(long)]
    print: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Where the license, machine file and fingerprint come from.
#[derive(Debug, PartialEq, Eq)]
enum Mode {
    /// Default files in the working directory, fingerprint from the host serial.
    Host,
    /// Files and fingerprint given on the command line.
    Explicit {
        license_file: PathBuf,
        machine_file: PathBuf,
        fingerprint: String,
    },
}

impl Mode {
    fn from_args(args: &Args) -> Self {
        match (&args.license_file, &args.machine_file, &args.fingerprint) {
            (Some(license), Some(machine), Some(fingerprint)) => Mode::Explicit {
                license_file: license.clone(),
                machine_file: machine.clone(),
                fingerprint: fingerprint.clone(),
            },
            _ => Mode::Host,
        }
    }

    /// Each mode verifies against its own Keygen account key.
    fn config(&self) -> VerifierConfig {
        match self {
            Mode::Host => VerifierConfig::new(DEFAULT_PUBLIC_KEY_HEX),
            Mode::Explicit { .. } => VerifierConfig::new(EXPLICIT_PUBLIC_KEY_HEX),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let mode = Mode::from_args(&args);
    let verifier = MachineVerifier::new(mode.config())?;

    let dataset = match &mode {
        Mode::Explicit {
            license_file,
            machine_file,
            fingerprint,
        } => verifier.verify_files(license_file, machine_file, fingerprint),
        Mode::Host => verifier.verify_host(
            &PathBuf::from(DEFAULT_LICENSE_FILE),
            &PathBuf::from(DEFAULT_MACHINE_FILE),
            &HostSerial,
        ),
    }
    .context("machine file verification failed")?;

    println!("Machine file was successfully decrypted!");
    if args.print {
        println!("{}", dataset);
    }
    Ok(())
}
