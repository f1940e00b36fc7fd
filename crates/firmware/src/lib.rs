//! Pico Player firmware
//!
//! Firmware for an RP2040 media player: a 128x64 OLED, four buttons and a
//! rotary encoder, and a UART-attached MP3 module.
//!
//! # Architecture
//!
//! ```text
//! encoder edge IRQ ──► QuadratureDecoder ──► UI task (core 1) ──► CommandChannel
//! UI timer (20 ms) ──► UiTick ─────────────┘        │                  │
//!                                                 OLED            player task (core 0)
//!                                                                      │
//!                                                   Guard<PlayerLink> ─┴─► UART ─► MP3 module
//! ```
//!
//! All shared state lives in one [`context::SubsystemContext`] created before
//! any task runs.
//!
//! # Features
//!
//! - `hardware` - Build for the RP2040 (embassy-rp, defmt, entry point)
//! - `tracing` - Host log output through `tracing`
//! - `std` - Enable standard library (for testing)
//!
//! ```bash
//! cargo build --release --target thumbv6m-none-eabi -p firmware --features hardware
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline
#![warn(clippy::print_stdout)]
#![warn(clippy::dbg_macro)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unused_async)]

#[macro_use]
mod log;

pub mod boot;
pub mod channel;
pub mod config;
pub mod context;
pub mod display;
pub mod encoder;
pub mod exception_handlers;
pub mod guard;
pub mod panel;
pub mod player;
pub mod supervisor;
pub mod timer;
pub mod ui_task;

#[cfg(feature = "hardware")]
pub mod hal;

pub use channel::{ChannelFull, CommandChannel, ReceiveTimeout};
pub use context::{SharedLed, SubsystemContext};
pub use display::Oled;
pub use encoder::{PhaseLevels, QuadratureDecoder, RotationReader};
pub use guard::{Guard, GuardTimeout};
pub use panel::{ButtonBank, PanelInput};
pub use player::{player_cycle, CycleOutcome, PlayerError, PlayerLink};
pub use supervisor::{FatalError, StackMonitor, StackRegion};
pub use ui_task::{TickReport, UiLoop};
