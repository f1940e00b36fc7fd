//! Application configuration and constants
//!
//! This module defines central configuration values used across the
//! application. Board geometry, wire settings and queue sizing should
//! reference these constants rather than hardcoding values.

/// The application name
pub const APP_NAME: &str = "Pico Player";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// OLED width in pixels.
pub const DISPLAY_WIDTH: u8 = 128;

/// OLED height in pixels.
pub const DISPLAY_HEIGHT: u8 = 64;

/// 7-bit I2C address of the OLED controller.
pub const OLED_I2C_ADDRESS: u8 = 0x3C;

/// Baud rate of the MP3 module link.
pub const PLAYER_UART_BAUD: u32 = 9_600;

/// Capacity of the UI → player command queue.
pub const COMMAND_QUEUE_DEPTH: usize = 10;
