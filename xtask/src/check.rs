use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::cargo::{step, OnFailure};
use crate::FIRMWARE_TARGET;

/// Library crates that must build without std for the device.
const NO_STD_CRATES: [&str; 3] = ["platform", "playback", "ui"];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking firmware builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    step(
        "Hardware target (RP2040)",
        &[
            "check",
            "-p",
            "firmware",
            "--target",
            FIRMWARE_TARGET,
            "--features",
            "hardware",
        ],
        OnFailure::Fail,
    )?;

    step(
        "Host build with tracing",
        &["check", "-p", "firmware", "--all-targets", "--features", "tracing"],
        OnFailure::Fail,
    )?;

    for krate in NO_STD_CRATES {
        step(
            &format!("{krate} crate (no_std)"),
            &["check", "-p", krate, "--target", FIRMWARE_TARGET, "--no-default-features"],
            OnFailure::Fail,
        )?;
    }

    step(
        "Clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        OnFailure::Warn,
    )?;

    if step("Formatting", &["fmt", "--all", "--check"], OnFailure::Warn)?.is_none() {
        eprintln!("     Run 'cargo fmt --all' to fix");
    }

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}
