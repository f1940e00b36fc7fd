// Desktop/tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod cargo;
mod check;
mod flash;
mod test;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Cross-compilation target of the RP2040 (Cortex-M0+).
pub const FIRMWARE_TARGET: &str = "thumbv6m-none-eabi";

/// probe-rs chip name.
pub const PROBE_CHIP: &str = "RP2040";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Pico Player development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flash firmware to the RP2040 via probe-rs
    Flash {
        /// Build and flash release version
        #[arg(short, long)]
        release: bool,
    },
    /// Check the firmware for the RP2040 and the host, no_std libraries, lints and formatting
    Check,
    /// Run unit, integration and property tests on the host
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Flash { release } => flash::run(release),
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
    }
}
