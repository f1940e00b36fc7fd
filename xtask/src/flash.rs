use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

use crate::cargo::{firmware_elf, step, OnFailure};
use crate::{FIRMWARE_TARGET, PROBE_CHIP};

pub fn run(release: bool) -> Result<()> {
    let mode = if release { "release" } else { "debug" };

    println!();
    println!(
        "{}",
        format!("🔨 Building firmware ({mode} mode)...").cyan().bold()
    );
    println!();

    let mut build_args = vec![
        "build",
        "-p",
        "firmware",
        "--target",
        FIRMWARE_TARGET,
        "--features",
        "hardware",
    ];
    if release {
        build_args.push("--release");
    }
    step("Firmware build", &build_args, OnFailure::Fail)?;

    show_binary_size(release);

    println!("{}", format!("📡 Flashing to {PROBE_CHIP}...").cyan().bold());
    println!("   {}", "Connecting to probe...".dimmed());

    let flash_start = Instant::now();
    let flash_output = Command::new("probe-rs")
        .args(["download", "--chip", PROBE_CHIP, "--probe-index", "0"])
        .arg(firmware_elf(release))
        .output()
        .context("Failed to run probe-rs. Is probe-rs installed? (cargo install probe-rs-tools)")?;

    if !flash_output.status.success() {
        eprintln!("{}", "✗ Flash failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&flash_output.stderr));
        anyhow::bail!("Flash failed - check that the probe is connected and the Pico is powered");
    }

    println!(
        "{}",
        format!(
            "✓ Flash successful in {:.2}s",
            flash_start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
    println!(
        "   {}",
        format!("Use 'probe-rs attach --chip {PROBE_CHIP} {}' to view RTT logs", firmware_elf(release))
            .dimmed()
    );
    println!();

    Ok(())
}

fn show_binary_size(release: bool) {
    let output = Command::new("rust-size")
        .arg(firmware_elf(release))
        .arg("-A")
        .output();

    if let Ok(out) = output {
        if out.status.success() {
            println!("{}", "📊 Binary size:".cyan());
            for line in String::from_utf8_lossy(&out.stdout).lines() {
                println!("   {}", line.dimmed());
            }
            println!();
        }
    }
}
