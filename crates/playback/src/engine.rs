//! Playback state machine.
//!
//! [`transition`] is a pure function from the current [`PlaybackState`] and a
//! [`PlayerCommand`] to the next state plus the frame that must go out on the
//! UART. It performs no I/O: the player task applies the result, writes the
//! frame and waits out the module's settle time. This keeps every rule of the
//! machine testable on the host.
//!
//! A device that has not completed its handshake (`Uninitialized`) or has
//! failed it (`Error`) rejects every command without producing a frame. In
//! every other mode each command yields exactly one frame.

use thiserror_no_std::Error;

use crate::command::PlayerCommand;
use crate::frame::{DeviceCommand, Frame};
use crate::volume::Volume;

/// Coarse mode of the MP3 module as tracked by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackMode {
    /// Handshake not done yet.
    Uninitialized,
    /// Handshake done, nothing played yet.
    Ready,
    /// A track is playing.
    Playing,
    /// Playback suspended; resume continues the same track.
    Paused,
    /// Playback stopped; play restarts the current track.
    Stopped,
    /// Handshake failed. Terminal until the next boot.
    Error,
}

impl PlaybackMode {
    /// Whether commands are accepted in this mode.
    pub fn is_device_ready(self) -> bool {
        !matches!(self, Self::Uninitialized | Self::Error)
    }

    /// Short label for log output and the display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "init",
            Self::Ready => "ready",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Error => "error",
        }
    }
}

/// Everything the firmware knows about the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackState {
    /// Current mode.
    pub mode: PlaybackMode,
    /// 1-based index of the current track.
    pub track: u16,
    /// Last volume sent to the module.
    pub volume: Volume,
    /// Tracks on the selected source, once the module has reported them.
    pub track_count: Option<u16>,
}

impl PlaybackState {
    /// Power-up state: uninitialised, track 1, default volume.
    pub const fn new() -> Self {
        Self {
            mode: PlaybackMode::Uninitialized,
            track: 1,
            volume: Volume::DEFAULT,
            track_count: None,
        }
    }

    /// Whether the handshake succeeded.
    pub fn is_device_ready(&self) -> bool {
        self.mode.is_device_ready()
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors returned by [`PlaybackEngine`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackError {
    /// Command arrived before a successful handshake, or after a failed one.
    #[error("device not ready")]
    NotReady(PlaybackMode),
}

/// Apply `command` to `state`.
///
/// Returns the next state and the frame to transmit. The frame is `None`
/// exactly when the device is not ready; the state is then unchanged.
pub fn transition(state: PlaybackState, command: PlayerCommand) -> (PlaybackState, Option<Frame>) {
    use PlaybackMode::{Paused, Playing, Stopped};

    if !state.is_device_ready() {
        return (state, None);
    }

    let mut next = state;
    let frame = match (state.mode, command) {
        (Paused, PlayerCommand::Play) => {
            next.mode = Playing;
            Frame::new(DeviceCommand::Resume, 0)
        }
        (_, PlayerCommand::Play) => {
            next.mode = Playing;
            Frame::new(DeviceCommand::Play, state.track)
        }
        (Playing, PlayerCommand::Pause) => {
            next.mode = Paused;
            Frame::new(DeviceCommand::Pause, 0)
        }
        (_, PlayerCommand::Pause) => Frame::new(DeviceCommand::Pause, 0),
        (_, PlayerCommand::Stop) => {
            next.mode = Stopped;
            Frame::new(DeviceCommand::Stop, 0)
        }
        (_, PlayerCommand::Next) => {
            next.mode = Playing;
            next.track = match state.track_count {
                Some(last) => state.track.saturating_add(1).min(last),
                None => state.track.saturating_add(1),
            };
            Frame::new(DeviceCommand::Next, 0)
        }
        (_, PlayerCommand::Previous) => {
            next.mode = Playing;
            next.track = state.track.saturating_sub(1).max(1);
            Frame::new(DeviceCommand::Previous, 0)
        }
        (_, PlayerCommand::VolumeUp) => {
            next.volume = state.volume.step_up();
            Frame::new(DeviceCommand::SetVolume, u16::from(next.volume.get()))
        }
        (_, PlayerCommand::VolumeDown) => {
            next.volume = state.volume.step_down();
            Frame::new(DeviceCommand::SetVolume, u16::from(next.volume.get()))
        }
    };
    (next, Some(frame))
}

/// Frame setting the module to `volume`.
pub fn set_volume_frame(volume: Volume) -> Frame {
    Frame::new(DeviceCommand::SetVolume, u16::from(volume.get()))
}

/// Owner of the current [`PlaybackState`].
///
/// Thin stateful wrapper over [`transition`] used by the player task.
pub struct PlaybackEngine {
    state: PlaybackState,
}

impl PlaybackEngine {
    /// Create a new engine in the `Uninitialized` mode.
    pub const fn new() -> Self {
        Self {
            state: PlaybackState::new(),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current mode.
    pub fn mode(&self) -> PlaybackMode {
        self.state.mode
    }

    /// Work out what `command` would do without recording it.
    ///
    /// Returns the state to [`commit`](Self::commit) once the frame has
    /// reached the module.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NotReady`] when the handshake has not succeeded.
    pub fn prepare(&self, command: PlayerCommand) -> Result<(PlaybackState, Frame), PlaybackError> {
        match transition(self.state, command) {
            (next, Some(frame)) => Ok((next, frame)),
            (_, None) => Err(PlaybackError::NotReady(self.state.mode)),
        }
    }

    /// Record a state returned by [`prepare`](Self::prepare).
    pub fn commit(&mut self, next: PlaybackState) {
        self.state = next;
    }

    /// Prepare and commit in one step.
    pub fn apply(&mut self, command: PlayerCommand) -> Result<Frame, PlaybackError> {
        let (next, frame) = self.prepare(command)?;
        self.commit(next);
        Ok(frame)
    }

    /// Record how many tracks the source holds. Zero means the module could
    /// not count them, which leaves `Next` unbounded.
    pub fn set_track_count(&mut self, count: u16) {
        self.state.track_count = (count > 0).then_some(count);
        if let Some(last) = self.state.track_count {
            self.state.track = self.state.track.min(last);
        }
    }

    /// Record the handshake outcome.
    ///
    /// Success moves `Uninitialized` to `Ready` and returns the frame that
    /// pushes the tracked volume to the module. Failure is terminal.
    /// Calls after the first outcome are ignored.
    pub fn complete_handshake(&mut self, success: bool) -> Option<Frame> {
        if self.state.mode != PlaybackMode::Uninitialized {
            return None;
        }
        if success {
            self.state.mode = PlaybackMode::Ready;
            Some(set_volume_frame(self.state.volume))
        } else {
            self.state.mode = PlaybackMode::Error;
            None
        }
    }
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new()
    }
}
