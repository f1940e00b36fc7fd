//! Hardware Abstraction Layer (HAL) for the Pico Player
//!
//! This crate provides trait-based abstractions and pure hardware-facing
//! types, enabling development and testing without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: tasks, ISR, supervisor)
//!         ↓
//! Feature Layers (playback, ui)
//!         ↓
//! Platform HAL (this crate - traits and board types)
//!         ↓
//! Hardware Layer (embassy-rp)
//! ```
//!
//! # Abstractions
//!
//! - [`UartPeripheral`] - byte link to the MP3 module
//! - [`InputSource`] - polled button panel + rotary encoder
//! - [`FlushTarget`] / [`Region`] - OLED drawing and clamped updates
//! - [`StatusLed`] - blink-code output
//!
//! # Features
//!
//! - `std`: expose [`mocks`] to other crates' tests
//! - `defmt`: derive `defmt::Format` on platform types

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: executors are per-core, Send bounds not needed

pub mod config;
pub mod display;
pub mod gpio;
pub mod input;
pub mod mocks;
pub mod peripheral;

pub use display::{DisplayError, FlushTarget, Region};
pub use gpio::StatusLed;
pub use input::{Button, ButtonLevels, InputSnapshot, InputSource};
pub use peripheral::{DataBits, Parity, StopBits, UartConfig, UartPeripheral};
