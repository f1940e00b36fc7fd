//! Timing configuration for the firmware tasks.
//!
//! All delays and timeouts live here so tests can shrink them. Production
//! code uses the `Default` impls.

use embassy_time::Duration;

/// Period of the UI timer tick.
pub const UI_TICK_PERIOD: Duration = Duration::from_millis(20);

/// Minimum spacing between two accepted encoder edges, in microseconds.
pub const ENCODER_DEBOUNCE_US: u64 = 100;

/// UI core stack size in bytes.
pub const UI_STACK_SIZE: usize = 8 * 1024;

/// Untouched UI stack below which the supervisor halts.
pub const UI_STACK_HEADROOM_MIN: usize = 256;

/// Player task timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerTiming {
    /// How long one cycle waits for a command.
    pub receive_timeout: Duration,
    /// How long one cycle waits for the player guard before skipping.
    pub guard_timeout: Duration,
    /// Quiet time after each frame, held under the guard.
    pub settle: Duration,
    /// Yield at the end of every cycle.
    pub cycle_yield: Duration,
    /// Module power-up time before the handshake.
    pub boot_delay: Duration,
    /// Bound on reading one handshake response.
    pub response_timeout: Duration,
    /// Handshake attempts before entering `Error`.
    pub handshake_attempts: u8,
}

impl Default for PlayerTiming {
    fn default() -> Self {
        Self {
            receive_timeout: Duration::from_millis(10),
            guard_timeout: Duration::from_millis(20),
            settle: Duration::from_millis(200),
            cycle_yield: Duration::from_millis(5),
            boot_delay: Duration::from_millis(2_000),
            response_timeout: Duration::from_millis(1_000),
            handshake_attempts: playback::Handshake::DEFAULT_ATTEMPTS,
        }
    }
}

/// UI task timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiTiming {
    /// Longest wait for a tick before the UI polls anyway.
    pub tick_timeout: Duration,
}

impl Default for UiTiming {
    fn default() -> Self {
        Self {
            tick_timeout: Duration::from_millis(UI_TICK_PERIOD.as_millis().saturating_mul(2)),
        }
    }
}
