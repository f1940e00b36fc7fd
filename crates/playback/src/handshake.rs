//! Start-up handshake with the MP3 module.
//!
//! After power-up the module needs about two seconds before it listens.
//! The firmware then selects the storage source with a
//! [`DeviceCommand::QuerySource`] frame and reads back one 10-byte response.
//! A response that fails to decode, reports [`RESPONSE_ERROR`], or never
//! arrives counts as a failed attempt. [`Handshake`] decides whether to try
//! again or give up.
//!
//! Once the module is ready the firmware asks how many tracks the selected
//! source holds. The query requests feedback, so the module may send a plain
//! acknowledgement before the frame carrying the count.

use thiserror_no_std::Error;

use crate::frame::{DeviceCommand, Frame, FrameError, RESPONSE_ACK, RESPONSE_ERROR};

/// Storage the module plays from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MediaSource {
    /// USB mass storage.
    UDisk = 0x01,
    /// microSD card.
    TfCard = 0x02,
    /// On-board SPI flash.
    Flash = 0x04,
}

impl MediaSource {
    /// Short label for log output.
    pub fn label(self) -> &'static str {
        match self {
            Self::UDisk => "udisk",
            Self::TfCard => "tf",
            Self::Flash => "flash",
        }
    }
}

/// Frame selecting `source`: high parameter byte 0x01, low byte the source
/// code.
pub fn source_query_frame(source: MediaSource) -> Frame {
    Frame::new(
        DeviceCommand::QuerySource,
        u16::from_be_bytes([0x01, source as u8]),
    )
}

/// Why one handshake attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakeError {
    /// Writing the query failed.
    #[error("uart write failed")]
    Link,
    /// No complete response within the response timeout.
    #[error("no response")]
    Timeout,
    /// Response bytes did not form a valid frame.
    #[error("malformed response: {0}")]
    Malformed(FrameError),
    /// Module answered with its error code; the parameter carries the reason.
    #[error("device reported error {0:#06x}")]
    Device(u16),
    /// Module answered a query with some other command byte.
    #[error("unexpected response {0:#04x}")]
    Unexpected(u8),
}

impl HandshakeError {
    /// Short label for log output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Timeout => "timeout",
            Self::Malformed(_) => "malformed",
            Self::Device(_) => "device-error",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

/// Judge the module's answer to a source query.
pub fn check_response(raw: &[u8]) -> Result<Frame, HandshakeError> {
    let frame = Frame::decode(raw).map_err(HandshakeError::Malformed)?;
    if frame.command_byte() == RESPONSE_ERROR {
        return Err(HandshakeError::Device(frame.param()));
    }
    Ok(frame)
}

/// Frame asking how many tracks `source` holds, with feedback requested.
/// `None` for sources the module cannot count.
pub fn track_count_query(source: MediaSource) -> Option<Frame> {
    let command = match source {
        MediaSource::UDisk => DeviceCommand::TrackCountUDisk,
        MediaSource::TfCard => DeviceCommand::TrackCountTf,
        MediaSource::Flash => return None,
    };
    Some(Frame::from_parts(command.code(), true, 0))
}

/// One frame received while waiting for a track count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrackCountReply {
    /// Plain acknowledgement; the count follows.
    Ack,
    /// Tracks on the queried source.
    Count(u16),
}

/// Judge one frame received after `query`.
pub fn check_track_count(raw: &[u8], query: &Frame) -> Result<TrackCountReply, HandshakeError> {
    let frame = Frame::decode(raw).map_err(HandshakeError::Malformed)?;
    match frame.command_byte() {
        RESPONSE_ACK => Ok(TrackCountReply::Ack),
        RESPONSE_ERROR => Err(HandshakeError::Device(frame.param())),
        code if code == query.command_byte() => Ok(TrackCountReply::Count(frame.param())),
        other => Err(HandshakeError::Unexpected(other)),
    }
}

/// What the player task does after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakeStep {
    /// Module is ready.
    Ready,
    /// Wait the settle time and send the query again.
    Retry,
    /// Out of attempts. The device stays in `Error` for this boot.
    GiveUp,
}

/// Bounded-retry handshake policy.
#[derive(Debug, Clone, Copy)]
pub struct Handshake {
    max_attempts: u8,
    attempts: u8,
}

impl Handshake {
    /// Attempts made before giving up when nothing else is configured.
    pub const DEFAULT_ATTEMPTS: u8 = 3;

    /// Policy allowing `max_attempts` tries (at least one).
    pub const fn new(max_attempts: u8) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            attempts: 0,
        }
    }

    /// Attempts made so far.
    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    /// Record the outcome of one attempt.
    pub fn record<T>(&mut self, outcome: &Result<T, HandshakeError>) -> HandshakeStep {
        self.attempts = self.attempts.saturating_add(1);
        match outcome {
            Ok(_) => HandshakeStep::Ready,
            Err(_) if self.attempts < self.max_attempts => HandshakeStep::Retry,
            Err(_) => HandshakeStep::GiveUp,
        }
    }
}

impl Default for Handshake {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS)
    }
}
