//! Periodic UI tick.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};

/// Latest tick number. Unconsumed ticks collapse into one.
pub type UiTick = Signal<CriticalSectionRawMutex, u32>;

/// Raise `tick` every `period`, forever.
pub async fn run(tick: &UiTick, period: Duration) -> ! {
    let mut ticker = Ticker::every(period);
    let mut count: u32 = 0;
    loop {
        ticker.next().await;
        count = count.wrapping_add(1);
        tick.signal(count);
    }
}
