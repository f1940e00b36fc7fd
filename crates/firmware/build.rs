//! Places `memory.x` on the linker search path for RP2040 builds.

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");

    // host builds and tests link without a memory map
    if env::var_os("CARGO_FEATURE_HARDWARE").is_none() {
        return Ok(());
    }

    let out = PathBuf::from(env::var_os("OUT_DIR").ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "OUT_DIR not set by cargo")
    })?);
    fs::write(out.join("memory.x"), include_bytes!("../../memory.x"))?;

    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=../../memory.x");
    Ok(())
}
