//! Player task: owns the UART link to the MP3 module.
//!
//! Each cycle the task waits briefly for a command, takes the player guard
//! with a bounded timeout, applies the command to the playback state machine
//! and transmits the resulting frame. After every frame the module needs a
//! settle time before it accepts the next one; the guard stays held for that
//! time so no other frame can interleave.
//!
//! On start the task waits for the module to power up and runs the source
//! handshake. Until it succeeds every command is rejected.

use embassy_time::{with_timeout, Timer};
use platform::UartPeripheral;
use playback::frame::FRAME_LEN;
use playback::handshake::{
    check_response, check_track_count, source_query_frame, track_count_query,
};
use playback::{
    Frame, Handshake, HandshakeError, HandshakeStep, MediaSource, PlaybackEngine, PlaybackError,
    PlaybackMode, PlaybackState, PlayerCommand, TrackCountReply,
};
use thiserror_no_std::Error;

use crate::channel::CommandChannel;
use crate::config::PlayerTiming;
use crate::guard::Guard;

/// Why a command produced no frame on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerError {
    /// Handshake pending or failed.
    #[error("device not ready")]
    NotReady(PlaybackMode),
    /// UART refused the frame.
    #[error("uart write failed")]
    Link,
}

impl From<PlaybackError> for PlayerError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::NotReady(mode) => PlayerError::NotReady(mode),
        }
    }
}

/// Playback state plus the UART it drives. Lives inside the player guard.
pub struct PlayerLink<U> {
    engine: PlaybackEngine,
    uart: U,
    source: MediaSource,
}

impl<U: UartPeripheral> PlayerLink<U> {
    /// Link over `uart`, handshaking for `source`.
    pub const fn new(uart: U, source: MediaSource) -> Self {
        Self {
            engine: PlaybackEngine::new(),
            uart,
            source,
        }
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.engine.state()
    }

    /// The underlying UART.
    pub fn uart(&self) -> &U {
        &self.uart
    }

    /// Mutable access to the underlying UART.
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut PlaybackEngine {
        &mut self.engine
    }

    /// Write one frame, then hold off for `settle`.
    pub async fn transmit(
        &mut self,
        frame: &Frame,
        settle: embassy_time::Duration,
    ) -> Result<(), PlayerError> {
        self.uart
            .write(frame.as_bytes())
            .await
            .map_err(|_| PlayerError::Link)?;
        trace!("uart: sent command {}", frame.command_byte());
        Timer::after(settle).await;
        Ok(())
    }

    /// Transmit the frame for `command`; the new state is kept only once the
    /// frame is on the wire.
    pub async fn execute(
        &mut self,
        command: PlayerCommand,
        timing: &PlayerTiming,
    ) -> Result<(), PlayerError> {
        let (next, frame) = self.engine.prepare(command)?;
        self.transmit(&frame, timing.settle).await?;
        self.engine.commit(next);
        Ok(())
    }

    /// Select the media source and wait for the module's answer, retrying
    /// per [`Handshake`]. Returns the resulting mode (`Ready` or `Error`).
    pub async fn handshake(&mut self, timing: &PlayerTiming) -> PlaybackMode {
        let mut policy = Handshake::new(timing.handshake_attempts);
        loop {
            let outcome = self.handshake_attempt(timing).await;
            match policy.record(&outcome) {
                HandshakeStep::Ready => {
                    info!(
                        "player: module ready on {} after {} attempt(s)",
                        self.source.label(),
                        policy.attempts()
                    );
                    if let Some(frame) = self.engine.complete_handshake(true) {
                        if self.transmit(&frame, timing.settle).await.is_err() {
                            warn!("player: initial volume sync failed");
                        }
                    }
                    self.sync_track_count(timing).await;
                    break;
                }
                HandshakeStep::Retry => {
                    if let Err(err) = outcome {
                        warn!("player: handshake attempt failed ({}), retrying", err.label());
                    }
                    Timer::after(timing.settle).await;
                }
                HandshakeStep::GiveUp => {
                    error!(
                        "player: handshake failed after {} attempts, device disabled",
                        policy.attempts()
                    );
                    self.engine.complete_handshake(false);
                    break;
                }
            }
        }
        self.engine.mode()
    }

    /// Ask the module how many tracks the source holds so `Next` stops at
    /// the last one. A missing or failed answer leaves the count unknown.
    async fn sync_track_count(&mut self, timing: &PlayerTiming) {
        let Some(query) = track_count_query(self.source) else {
            return;
        };
        let reply = with_timeout(timing.response_timeout, self.track_count_exchange(&query)).await;
        match reply {
            Ok(Ok(count)) => {
                info!("player: {} tracks on {}", count, self.source.label());
                self.engine.set_track_count(count);
            }
            Ok(Err(err)) => warn!("player: track count query failed ({})", err.label()),
            Err(_) => warn!("player: no track count from module"),
        }
        Timer::after(timing.settle).await;
    }

    async fn track_count_exchange(&mut self, query: &Frame) -> Result<u16, HandshakeError> {
        self.uart
            .write(query.as_bytes())
            .await
            .map_err(|_| HandshakeError::Link)?;
        // The module may acknowledge the query before it answers.
        loop {
            let mut response = [0u8; FRAME_LEN];
            self.uart
                .read(&mut response)
                .await
                .map_err(|_| HandshakeError::Link)?;
            match check_track_count(&response, query)? {
                TrackCountReply::Ack => trace!("player: track count query acknowledged"),
                TrackCountReply::Count(count) => return Ok(count),
            }
        }
    }

    async fn handshake_attempt(&mut self, timing: &PlayerTiming) -> Result<Frame, HandshakeError> {
        let query = source_query_frame(self.source);
        self.uart
            .write(query.as_bytes())
            .await
            .map_err(|_| HandshakeError::Link)?;
        let mut response = [0u8; FRAME_LEN];
        match with_timeout(timing.response_timeout, self.uart.read(&mut response)).await {
            Ok(Ok(())) => check_response(&response),
            Ok(Err(_)) => Err(HandshakeError::Link),
            Err(_) => Err(HandshakeError::Timeout),
        }
    }
}

/// What one player cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// No command arrived.
    Idle,
    /// Frame sent.
    Executed(PlayerCommand),
    /// Guard stayed busy; the command was dropped for this cycle.
    GuardBusy(PlayerCommand),
    /// Command not sent.
    Failed(PlayerCommand, PlayerError),
}

/// One cycle: receive (bounded), acquire the guard (bounded), execute.
pub async fn player_cycle<U: UartPeripheral>(
    commands: &CommandChannel,
    link: &Guard<PlayerLink<U>>,
    timing: &PlayerTiming,
) -> CycleOutcome {
    let Ok(command) = commands.receive(timing.receive_timeout).await else {
        return CycleOutcome::Idle;
    };
    let Ok(mut held) = link.acquire(timing.guard_timeout).await else {
        warn!("player: guard busy, skipping {}", command.label());
        return CycleOutcome::GuardBusy(command);
    };
    match held.execute(command, timing).await {
        Ok(()) => {
            debug!(
                "player: {} -> {}",
                command.label(),
                held.state().mode.label()
            );
            CycleOutcome::Executed(command)
        }
        Err(err) => {
            match err {
                PlayerError::NotReady(mode) => {
                    warn!("player: {} rejected, device {}", command.label(), mode.label());
                }
                PlayerError::Link => error!("player: uart write failed for {}", command.label()),
            }
            CycleOutcome::Failed(command, err)
        }
    }
}

/// Power-up delay and handshake, run once before the command loop.
pub async fn start<U: UartPeripheral>(link: &Guard<PlayerLink<U>>, timing: &PlayerTiming) -> PlaybackMode {
    Timer::after(timing.boot_delay).await;
    loop {
        if let Ok(mut held) = link.acquire(timing.guard_timeout).await {
            return held.handshake(timing).await;
        }
    }
}

/// Player task body.
pub async fn run<U: UartPeripheral>(
    commands: &CommandChannel,
    link: &Guard<PlayerLink<U>>,
    timing: PlayerTiming,
) -> ! {
    let mode = start(link, &timing).await;
    info!("player: entering command loop ({})", mode.label());
    loop {
        player_cycle(commands, link, &timing).await;
        Timer::after(timing.cycle_yield).await;
    }
}
