//! Bounded UI → player command queue.
//!
//! Producers run in task context and never block: a full queue drops the new
//! command and reports [`ChannelFull`]. Retrying in a loop is not allowed; the
//! user simply presses again. The single consumer (player task) waits for a
//! bounded time so it can keep servicing the module between commands.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{with_timeout, Duration};
use platform::config::COMMAND_QUEUE_DEPTH;
use playback::PlayerCommand;
use thiserror_no_std::Error;

/// Queue was full; the command was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("command queue full, dropped {}", .0.label())]
pub struct ChannelFull(pub PlayerCommand);

/// Nothing arrived within the receive timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("no command within timeout")]
pub struct ReceiveTimeout;

/// FIFO of [`PlayerCommand`]s with capacity [`COMMAND_QUEUE_DEPTH`].
pub struct CommandChannel {
    // CriticalSectionRawMutex: producer and consumer run on different cores.
    inner: Channel<CriticalSectionRawMutex, PlayerCommand, COMMAND_QUEUE_DEPTH>,
}

impl CommandChannel {
    /// Empty queue.
    pub const fn new() -> Self {
        Self {
            inner: Channel::new(),
        }
    }

    /// Enqueue without waiting. Task context only.
    pub fn try_send(&self, command: PlayerCommand) -> Result<(), ChannelFull> {
        self.inner
            .try_send(command)
            .map_err(|_| ChannelFull(command))
    }

    /// Wait up to `timeout` for the oldest queued command.
    pub async fn receive(&self, timeout: Duration) -> Result<PlayerCommand, ReceiveTimeout> {
        with_timeout(timeout, self.inner.receive())
            .await
            .map_err(|_| ReceiveTimeout)
    }

    /// Take the oldest command if one is queued.
    pub fn try_receive(&self) -> Option<PlayerCommand> {
        self.inner.try_receive().ok()
    }

    /// Commands currently queued.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Capacity of the queue.
    pub const fn capacity(&self) -> usize {
        COMMAND_QUEUE_DEPTH
    }
}

impl Default for CommandChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn eleventh_send_fails_with_ten_queued() {
        let ch = CommandChannel::new();
        for _ in 0..10 {
            ch.try_send(PlayerCommand::VolumeUp).unwrap();
        }
        assert_eq!(
            ch.try_send(PlayerCommand::Stop),
            Err(ChannelFull(PlayerCommand::Stop))
        );
        assert_eq!(ch.len(), 10);
    }

    #[test]
    fn delivery_is_fifo() {
        let ch = CommandChannel::new();
        ch.try_send(PlayerCommand::Play).unwrap();
        ch.try_send(PlayerCommand::Pause).unwrap();
        ch.try_send(PlayerCommand::Stop).unwrap();
        assert_eq!(ch.try_receive(), Some(PlayerCommand::Play));
        assert_eq!(ch.try_receive(), Some(PlayerCommand::Pause));
        assert_eq!(ch.try_receive(), Some(PlayerCommand::Stop));
        assert!(ch.is_empty());
    }

    #[tokio::test]
    async fn receive_times_out_when_empty() {
        let ch = CommandChannel::new();
        assert_eq!(
            ch.receive(Duration::from_millis(10)).await,
            Err(ReceiveTimeout)
        );
    }

    #[tokio::test]
    async fn receive_returns_queued_command() {
        let ch = CommandChannel::new();
        ch.try_send(PlayerCommand::Next).unwrap();
        assert_eq!(
            ch.receive(Duration::from_millis(10)).await,
            Ok(PlayerCommand::Next)
        );
    }

    #[tokio::test]
    async fn space_frees_after_receive() {
        let ch = CommandChannel::new();
        for _ in 0..10 {
            ch.try_send(PlayerCommand::Play).unwrap();
        }
        assert!(ch.try_send(PlayerCommand::Play).is_err());
        ch.receive(Duration::from_millis(10)).await.unwrap();
        assert!(ch.try_send(PlayerCommand::Play).is_ok());
    }
}
