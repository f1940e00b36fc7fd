//! Resources shared between tasks.
//!
//! Everything here is created once, before the first task runs, and handed to
//! each task as a `&'static` reference.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use platform::{StatusLed, UartPeripheral};
use playback::MediaSource;

use crate::channel::CommandChannel;
use crate::config::ENCODER_DEBOUNCE_US;
use crate::encoder::QuadratureDecoder;
use crate::guard::Guard;
use crate::player::PlayerLink;
use crate::supervisor::{halt_and_signal, FatalError};
use crate::timer::UiTick;

/// Status LED reachable from either core.
pub struct SharedLed<L> {
    inner: BlockingMutex<CriticalSectionRawMutex, RefCell<L>>,
}

impl<L: StatusLed> SharedLed<L> {
    /// Wrap `led`.
    pub const fn new(led: L) -> Self {
        Self {
            inner: BlockingMutex::new(RefCell::new(led)),
        }
    }

    /// Switch the LED.
    pub fn set_lit(&self, lit: bool) {
        self.inner.lock(|led| {
            if let Ok(mut led) = led.try_borrow_mut() {
                led.set_lit(lit);
            }
        });
    }

    /// Blink `error` forever. The critical section is never released, so
    /// the other core stalls at its next shared access.
    pub fn halt(&self, error: FatalError) -> ! {
        loop {
            self.inner.lock(|led| {
                if let Ok(mut led) = led.try_borrow_mut() {
                    halt_and_signal(&mut *led, error);
                }
            });
        }
    }
}

/// Channel, player guard, encoder state, UI tick and LED.
pub struct SubsystemContext<U, L> {
    /// UI to player commands.
    pub commands: CommandChannel,
    /// Playback state and UART, one owner at a time.
    pub player: Guard<PlayerLink<U>>,
    /// Fed by the edge task, drained by the UI.
    pub encoder: QuadratureDecoder,
    /// Raised every UI period by the timer task.
    pub ui_tick: UiTick,
    /// Status LED.
    pub led: SharedLed<L>,
}

impl<U: UartPeripheral, L: StatusLed> SubsystemContext<U, L> {
    /// Context driving the module behind `uart` from `source`.
    pub const fn new(uart: U, source: MediaSource, led: L) -> Self {
        Self {
            commands: CommandChannel::new(),
            player: Guard::new(PlayerLink::new(uart, source)),
            encoder: QuadratureDecoder::new(ENCODER_DEBOUNCE_US),
            ui_tick: UiTick::new(),
            led: SharedLed::new(led),
        }
    }
}
