//! Application UI layer: input gestures and the now-playing screen.
//!
//! This crate is `no_std` by default; it only uses `core`, `heapless` and
//! `embedded-graphics`.

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

pub mod gesture;
pub mod now_playing;

pub use gesture::{GestureMapper, TickCommands};
pub use now_playing::NowPlayingView;
