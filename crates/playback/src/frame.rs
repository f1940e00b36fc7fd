//! Wire codec for the TF-16P / DFPlayer-class MP3 module.
//!
//! Every command and every response is one fixed 10-byte frame:
//!
//! ```text
//! 0      1     2     3    4         5        6        7       8       9
//! 0x7E   0xFF  0x06  CMD  FEEDBACK  PARAM_HI PARAM_LO CHK_HI  CHK_LO  0xEF
//! ```
//!
//! `CHK` is the 16-bit two's-complement negation of the sum of bytes 1..=6,
//! so adding the checksum to that sum yields zero modulo 2^16.

use thiserror_no_std::Error;

/// Total frame length in bytes.
pub const FRAME_LEN: usize = 10;
/// Start marker.
pub const START_BYTE: u8 = 0x7E;
/// Protocol version byte.
pub const VERSION_BYTE: u8 = 0xFF;
/// Length byte (bytes covered between version and checksum).
pub const LENGTH_BYTE: u8 = 0x06;
/// End marker.
pub const END_BYTE: u8 = 0xEF;

/// Command byte the module answers with when it rejects a request or fails
/// to initialise its storage.
pub const RESPONSE_ERROR: u8 = 0x40;
/// Command byte of a plain acknowledgement.
pub const RESPONSE_ACK: u8 = 0x41;

/// Command codes the firmware sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DeviceCommand {
    /// Skip to the next track.
    Next = 0x01,
    /// Skip to the previous track.
    Previous = 0x02,
    /// Play the track given in the parameter.
    Play = 0x03,
    /// Set output volume (parameter 0..=30).
    SetVolume = 0x06,
    /// Select the playback source (U-disk, TF card or flash).
    QuerySource = 0x09,
    /// Resume after pause.
    Resume = 0x0D,
    /// Pause playback.
    Pause = 0x0E,
    /// Stop playback.
    Stop = 0x16,
    /// Ask how many tracks the U-disk holds.
    TrackCountUDisk = 0x47,
    /// Ask how many tracks the TF card holds.
    TrackCountTf = 0x48,
}

impl DeviceCommand {
    /// Raw command byte.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Short label for log output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Play => "play",
            Self::SetVolume => "set-volume",
            Self::QuerySource => "query-source",
            Self::Resume => "resume",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::TrackCountUDisk => "track-count-udisk",
            Self::TrackCountTf => "track-count-tf",
        }
    }
}

/// Frame decoding failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Input is not exactly [`FRAME_LEN`] bytes.
    #[error("frame must be 10 bytes, got {0}")]
    Length(usize),
    /// Start, version, length or end marker is wrong.
    #[error("frame markers corrupt")]
    Framing,
    /// Checksum does not match the body.
    #[error("checksum mismatch: expected {expected:#06x}, found {found:#06x}")]
    Checksum {
        /// Checksum computed from the body.
        expected: u16,
        /// Checksum carried by the frame.
        found: u16,
    },
}

/// Checksum over the six body bytes (version through `PARAM_LO`).
pub fn checksum(body: &[u8; 6]) -> u16 {
    let sum = body
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)));
    0u16.wrapping_sub(sum)
}

/// One encoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    bytes: [u8; FRAME_LEN],
}

impl Frame {
    /// Encode `command` with a 16-bit parameter and no feedback request.
    pub fn new(command: DeviceCommand, param: u16) -> Self {
        Self::from_parts(command.code(), false, param)
    }

    /// Encode a raw command byte. `feedback` asks the module to acknowledge.
    pub fn from_parts(command: u8, feedback: bool, param: u16) -> Self {
        let [param_hi, param_lo] = param.to_be_bytes();
        let body = [
            VERSION_BYTE,
            LENGTH_BYTE,
            command,
            u8::from(feedback),
            param_hi,
            param_lo,
        ];
        let [chk_hi, chk_lo] = checksum(&body).to_be_bytes();
        let [version, length, cmd, fb, hi, lo] = body;
        Self {
            bytes: [
                START_BYTE, version, length, cmd, fb, hi, lo, chk_hi, chk_lo, END_BYTE,
            ],
        }
    }

    /// Parse and verify a received frame.
    pub fn decode(raw: &[u8]) -> Result<Self, FrameError> {
        let bytes: [u8; FRAME_LEN] = raw
            .try_into()
            .map_err(|_| FrameError::Length(raw.len()))?;
        let [start, version, length, cmd, fb, hi, lo, chk_hi, chk_lo, end] = bytes;
        if start != START_BYTE || version != VERSION_BYTE || length != LENGTH_BYTE || end != END_BYTE
        {
            return Err(FrameError::Framing);
        }
        let expected = checksum(&[version, length, cmd, fb, hi, lo]);
        let found = u16::from_be_bytes([chk_hi, chk_lo]);
        if expected != found {
            return Err(FrameError::Checksum { expected, found });
        }
        Ok(Self { bytes })
    }

    /// The ten bytes to put on the wire.
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }

    /// Command byte (offset 3).
    pub fn command_byte(&self) -> u8 {
        let [_, _, _, cmd, ..] = self.bytes;
        cmd
    }

    /// Whether the feedback flag is set.
    pub fn wants_feedback(&self) -> bool {
        let [_, _, _, _, fb, ..] = self.bytes;
        fb != 0
    }

    /// 16-bit parameter (offsets 5..=6).
    pub fn param(&self) -> u16 {
        let [_, _, _, _, _, hi, lo, ..] = self.bytes;
        u16::from_be_bytes([hi, lo])
    }

    /// Checksum carried by the frame (offsets 7..=8).
    pub fn checksum(&self) -> u16 {
        let [_, _, _, _, _, _, _, hi, lo, _] = self.bytes;
        u16::from_be_bytes([hi, lo])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_volume_30_reference_vector() {
        let frame = Frame::new(DeviceCommand::SetVolume, 30);
        assert_eq!(
            frame.as_bytes(),
            &[0x7E, 0xFF, 0x06, 0x06, 0x00, 0x00, 0x1E, 0xFE, 0xD7, 0xEF]
        );
        assert_eq!(frame.checksum(), 0xFED7);
    }

    #[test]
    fn checksum_cancels_body_sum() {
        let body = [0xFF, 0x06, 0x03, 0x00, 0x00, 0x01];
        let sum: u16 = body.iter().map(|&b| u16::from(b)).sum();
        assert_eq!(sum.wrapping_add(checksum(&body)), 0);
    }

    #[test]
    fn decode_accepts_encoded_frame() {
        let frame = Frame::new(DeviceCommand::Play, 0x0102);
        let parsed = Frame::decode(frame.as_bytes()).unwrap();
        assert_eq!(parsed.command_byte(), 0x03);
        assert_eq!(parsed.param(), 0x0102);
        assert!(!parsed.wants_feedback());
    }

    #[test]
    fn decode_rejects_short_input() {
        assert_eq!(Frame::decode(&[0x7E, 0xFF]), Err(FrameError::Length(2)));
    }

    #[test]
    fn decode_rejects_bad_end_marker() {
        let mut raw = *Frame::new(DeviceCommand::Stop, 0).as_bytes();
        raw[9] = 0x00;
        assert_eq!(Frame::decode(&raw), Err(FrameError::Framing));
    }

    #[test]
    fn decode_rejects_corrupted_param() {
        let mut raw = *Frame::new(DeviceCommand::SetVolume, 10).as_bytes();
        raw[6] = 11;
        assert!(matches!(
            Frame::decode(&raw),
            Err(FrameError::Checksum { .. })
        ));
    }

    #[test]
    fn command_codes_match_module_table() {
        assert_eq!(DeviceCommand::Play.code(), 0x03);
        assert_eq!(DeviceCommand::Pause.code(), 0x0E);
        assert_eq!(DeviceCommand::Resume.code(), 0x0D);
        assert_eq!(DeviceCommand::Stop.code(), 0x16);
        assert_eq!(DeviceCommand::Next.code(), 0x01);
        assert_eq!(DeviceCommand::Previous.code(), 0x02);
        assert_eq!(DeviceCommand::SetVolume.code(), 0x06);
        assert_eq!(DeviceCommand::QuerySource.code(), 0x09);
        assert_eq!(DeviceCommand::TrackCountUDisk.code(), 0x47);
        assert_eq!(DeviceCommand::TrackCountTf.code(), 0x48);
    }
}
