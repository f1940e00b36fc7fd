//! Output volume of the MP3 module.
//!
//! The module accepts volume levels 0 through 30. [`Volume`] makes an out of
//! range level unrepresentable: every constructor clamps, so a level that
//! reaches the wire is always valid.

use thiserror_no_std::Error;

/// Highest level the module accepts.
pub const MAX_VOLUME: u8 = 30;

/// Level assumed after power-up until the first explicit set.
pub const DEFAULT_VOLUME: u8 = 20;

/// Volume level clamped to `0..=30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Volume(u8);

/// Returned by [`Volume::try_new`] for levels above [`MAX_VOLUME`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("volume {0} out of range 0..=30")]
pub struct VolumeOutOfRange(pub u8);

impl Volume {
    /// Silent.
    pub const MUTE: Volume = Volume(0);
    /// Loudest.
    pub const MAX: Volume = Volume(MAX_VOLUME);
    /// Power-up assumption.
    pub const DEFAULT: Volume = Volume(DEFAULT_VOLUME);

    /// Clamp `level` to the valid range.
    pub const fn new(level: u8) -> Self {
        if level > MAX_VOLUME {
            Volume(MAX_VOLUME)
        } else {
            Volume(level)
        }
    }

    /// Clamp any requested level, including negative ones, to `0..=30`.
    pub fn from_request(level: i32) -> Self {
        // clamp keeps the value inside u8 range
        Volume(u8::try_from(level.clamp(0, i32::from(MAX_VOLUME))).unwrap_or(MAX_VOLUME))
    }

    /// Strict constructor.
    pub fn try_new(level: u8) -> Result<Self, VolumeOutOfRange> {
        if level > MAX_VOLUME {
            Err(VolumeOutOfRange(level))
        } else {
            Ok(Volume(level))
        }
    }

    /// Raw level.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// One level louder, stopping at [`MAX_VOLUME`].
    pub fn step_up(self) -> Self {
        Volume::new(self.0.saturating_add(1))
    }

    /// One level quieter, stopping at 0.
    pub fn step_down(self) -> Self {
        Volume(self.0.saturating_sub(1))
    }
}

impl Default for Volume {
    fn default() -> Self {
        Volume::DEFAULT
    }
}
