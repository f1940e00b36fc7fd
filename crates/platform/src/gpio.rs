//! Status LED
//!
//! The on-board LED is the only output available before the display is up,
//! so fatal start-up errors are reported by blinking it. Any
//! [`embedded_hal::digital::OutputPin`] can serve as the LED.

use embedded_hal::digital::OutputPin;

/// A single indicator LED.
pub trait StatusLed {
    /// Switch the LED on or off.
    ///
    /// Infallible by contract: the LED is the error reporting channel of
    /// last resort, so a failed write is ignored.
    fn set_lit(&mut self, lit: bool);
}

impl<P: OutputPin> StatusLed for P {
    fn set_lit(&mut self, lit: bool) {
        let _ = if lit { self.set_high() } else { self.set_low() };
    }
}
