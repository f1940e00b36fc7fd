//! Mutual-exclusion guard with bounded acquisition.
//!
//! Wraps an async mutex whose lock attempt gives up after a timeout. A caller
//! that times out must skip the guarded operation for this cycle rather than
//! retry immediately; the owner is busy (typically waiting out the MP3
//! module's settle time) and the next cycle will try again.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_time::{with_timeout, Duration};
use thiserror_no_std::Error;

/// The guard stayed held for the whole timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("guard busy")]
pub struct GuardTimeout;

/// Exclusive access token holder.
pub type Held<'a, T> = MutexGuard<'a, CriticalSectionRawMutex, T>;

/// Ownership token over `T`, shareable across cores.
pub struct Guard<T> {
    inner: Mutex<CriticalSectionRawMutex, T>,
}

impl<T> Guard<T> {
    /// Guard `value`.
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    /// Wait up to `timeout` for exclusive access.
    pub async fn acquire(&self, timeout: Duration) -> Result<Held<'_, T>, GuardTimeout> {
        with_timeout(timeout, self.inner.lock())
            .await
            .map_err(|_| GuardTimeout)
    }

    /// Exclusive access if nobody holds the guard right now.
    pub fn try_acquire(&self) -> Option<Held<'_, T>> {
        self.inner.try_lock().ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn free_guard_is_acquired() {
        let g = Guard::new(5u8);
        let mut held = g.acquire(Duration::from_millis(5)).await.unwrap();
        *held += 1;
        drop(held);
        assert_eq!(*g.try_acquire().unwrap(), 6);
    }

    #[tokio::test]
    async fn held_guard_times_out() {
        let g = Guard::new(());
        let _held = g.try_acquire().unwrap();
        assert_eq!(
            g.acquire(Duration::from_millis(10)).await.err(),
            Some(GuardTimeout)
        );
        assert!(g.try_acquire().is_none());
    }

    #[tokio::test]
    async fn released_guard_is_available_again() {
        let g = Guard::new(());
        {
            let _held = g.acquire(Duration::from_millis(5)).await.unwrap();
        }
        assert!(g.acquire(Duration::from_millis(5)).await.is_ok());
    }
}
