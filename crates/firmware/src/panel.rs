//! Front panel input: four buttons plus the rotary encoder.

use platform::{ButtonLevels, InputSnapshot, InputSource};

use crate::encoder::{QuadratureDecoder, RotationReader};

/// Sampled button lines.
pub trait ButtonBank {
    /// Current pressed set.
    fn levels(&mut self) -> ButtonLevels;
}

/// Combines the button lines with the encoder count into one
/// [`InputSnapshot`] per UI tick.
pub struct PanelInput<'a, B> {
    buttons: B,
    decoder: &'a QuadratureDecoder,
    reader: RotationReader,
}

impl<'a, B: ButtonBank> PanelInput<'a, B> {
    /// Panel reading `buttons` and the counts collected by `decoder`.
    pub const fn new(buttons: B, decoder: &'a QuadratureDecoder) -> Self {
        Self {
            buttons,
            decoder,
            reader: RotationReader::new(),
        }
    }

    /// Quarter steps carried over to the next tick.
    pub fn encoder_remainder(&self) -> i64 {
        self.reader.remainder()
    }
}

impl<B: ButtonBank> InputSource for PanelInput<'_, B> {
    fn poll(&mut self) -> InputSnapshot {
        InputSnapshot {
            buttons: self.buttons.levels(),
            encoder_delta: self.reader.take_steps(self.decoder),
        }
    }
}

/// Active-low button lines on RP2040 GPIO.
#[cfg(feature = "hardware")]
pub struct GpioButtons {
    /// Enter / play.
    pub enter: embassy_rp::gpio::Input<'static>,
    /// Back / pause.
    pub back: embassy_rp::gpio::Input<'static>,
    /// Up / next.
    pub up: embassy_rp::gpio::Input<'static>,
    /// Down / previous.
    pub down: embassy_rp::gpio::Input<'static>,
}

#[cfg(feature = "hardware")]
impl ButtonBank for GpioButtons {
    fn levels(&mut self) -> ButtonLevels {
        ButtonLevels::from_active_low(
            self.enter.is_high(),
            self.back.is_high(),
            self.up.is_high(),
            self.down.is_high(),
        )
    }
}
