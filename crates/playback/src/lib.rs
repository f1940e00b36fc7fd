//! MP3 module control: wire frames, volume, and the playback state machine
#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]

pub mod command;
pub mod engine;
pub mod frame;
pub mod handshake;
pub mod volume;

pub use command::PlayerCommand;
pub use engine::{transition, PlaybackEngine, PlaybackError, PlaybackMode, PlaybackState};
pub use frame::{DeviceCommand, Frame, FrameError, FRAME_LEN};
pub use handshake::{Handshake, HandshakeError, HandshakeStep, MediaSource, TrackCountReply};
pub use volume::Volume;
