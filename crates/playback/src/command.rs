//! Commands flowing from the UI to the player task.

/// Something the user asked the player to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerCommand {
    /// Start playback, or resume when paused.
    Play,
    /// Pause playback.
    Pause,
    /// Stop playback.
    Stop,
    /// Next track.
    Next,
    /// Previous track.
    Previous,
    /// One volume step up.
    VolumeUp,
    /// One volume step down.
    VolumeDown,
}

impl PlayerCommand {
    /// Short label for log output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::VolumeUp => "volume-up",
            Self::VolumeDown => "volume-down",
        }
    }
}
