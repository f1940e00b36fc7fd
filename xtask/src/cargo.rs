use anyhow::{Context, Result};
use colored::Colorize;
use std::process::{Command, Output};
use std::time::Instant;

/// What a failed step does to the overall run.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Abort the task.
    Fail,
    /// Print the output and carry on.
    Warn,
}

/// Run `cargo <args>` as one labelled step and report how it went.
///
/// Returns the captured output so callers can pull numbers out of it.
pub fn step(label: &str, args: &[&str], on_failure: OnFailure) -> Result<Option<Output>> {
    println!("{}", format!("  {label}...").cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))?;

    if output.status.success() {
        println!(
            "{}",
            format!("  ✓ {label} passed in {:.2}s", start.elapsed().as_secs_f64()).green()
        );
        println!();
        return Ok(Some(output));
    }

    match on_failure {
        OnFailure::Fail => {
            eprintln!("{}", format!("  ✗ {label} failed").red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            for line in String::from_utf8_lossy(&output.stdout).lines() {
                eprintln!("  {line}");
            }
            anyhow::bail!("{label} failed");
        }
        OnFailure::Warn => {
            eprintln!("{}", format!("  ⚠ {label} reported problems").yellow().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            println!();
            Ok(None)
        }
    }
}

/// Path of the firmware ELF for the given profile.
pub fn firmware_elf(release: bool) -> String {
    let profile = if release { "release" } else { "debug" };
    format!("target/{}/{profile}/firmware", crate::FIRMWARE_TARGET)
}
