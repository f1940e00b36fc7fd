use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::cargo::{step, OnFailure};

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    if !integration_only {
        let output = step(
            "Unit tests",
            &["test", "--lib", "--workspace"],
            OnFailure::Fail,
        )?;
        print_summary(output.as_ref().map(|o| &o.stdout));
    }

    if !unit_only {
        // every crate's tests/ directory, proptest suites included
        let output = step(
            "Integration tests",
            &["test", "--workspace", "--tests", "--exclude", "xtask"],
            OnFailure::Fail,
        )?;
        print_summary(output.as_ref().map(|o| &o.stdout));
    }

    step("Doc tests", &["test", "--doc", "--workspace"], OnFailure::Warn)?;

    println!(
        "{}",
        format!(
            "✓ All tests completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

fn print_summary(stdout: Option<&Vec<u8>>) {
    if let Some(stdout) = stdout {
        let (passed, failed) = count_results(&String::from_utf8_lossy(stdout));
        println!("     {}", format!("{passed} passed, {failed} failed").dimmed());
        println!();
    }
}

/// Sum the pass/fail counts over every "test result:" line.
fn count_results(output: &str) -> (u32, u32) {
    let mut passed = 0u32;
    let mut failed = 0u32;
    for line in output.lines().filter(|l| l.contains("test result:")) {
        for part in line.split(';') {
            let mut words = part.split_whitespace().rev();
            let (Some(kind), Some(count)) = (words.next(), words.next()) else {
                continue;
            };
            let Ok(count) = count.parse::<u32>() else {
                continue;
            };
            match kind {
                "passed" => passed = passed.saturating_add(count),
                "failed" => failed = failed.saturating_add(count),
                _ => {}
            }
        }
    }
    (passed, failed)
}

#[cfg(test)]
mod tests {
    use super::count_results;

    #[test]
    fn sums_across_binaries() {
        let out = "\
test result: ok. 5 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out
running 3 tests
test result: FAILED. 2 passed; 1 failed; 0 ignored; 0 measured; 0 filtered out
";
        assert_eq!(count_results(out), (7, 1));
    }

    #[test]
    fn no_result_lines_is_zero() {
        assert_eq!(count_results("compiling..."), (0, 0));
    }
}
