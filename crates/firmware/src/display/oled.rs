//! SSD1306 128x64 OLED over I2C.
//!
//! The `ssd1306` driver keeps the frame in RAM and remembers the box of
//! pixels drawn since its last flush. A flush points the controller's column
//! and page window at that box and streams only those bytes, so the UI only
//! has to draw the rows that changed.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::i2c::I2c;
use platform::config::OLED_I2C_ADDRESS;
use platform::{DisplayError, FlushTarget, Region};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

type Panel<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Buffered OLED panel on a blocking I2C bus.
pub struct Oled<I2C> {
    panel: Panel<I2C>,
}

impl<I2C: I2c> Oled<I2C> {
    /// Wrap the bus. Nothing is sent until [`Oled::init`].
    pub fn new(i2c: I2C) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, OLED_I2C_ADDRESS);
        let panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        Self { panel }
    }

    /// Send the controller's power-up sequence and clear the frame.
    ///
    /// The clear only marks the whole frame dirty; the first flush pushes it.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.panel.init().map_err(|_| DisplayError::Bus)?;
        debug!("oled: init ok at {}", OLED_I2C_ADDRESS);
        Ok(())
    }
}

impl<I2C: I2c> OriginDimensions for Oled<I2C> {
    fn size(&self) -> Size {
        self.panel.size()
    }
}

impl<I2C: I2c> DrawTarget for Oled<I2C> {
    type Color = BinaryColor;
    type Error = DisplayError;

    fn draw_iter<P>(&mut self, pixels: P) -> Result<(), Self::Error>
    where
        P: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.panel.draw_iter(pixels).map_err(|_| DisplayError::Bus)
    }
}

impl<I2C: I2c> FlushTarget for Oled<I2C> {
    fn flush_region(&mut self, region: Region) -> Result<(), DisplayError> {
        // The driver's own dirty box covers exactly what was drawn; `region`
        // is the caller's view of the same box.
        trace!(
            "oled: flush pages {}..={}",
            region.first_page(),
            region.last_page()
        );
        self.panel.flush().map_err(|_| DisplayError::Bus)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    /// Records every write; fails all of them once `fail` is set.
    #[derive(Default)]
    struct RecordingBus {
        writes: Vec<(u8, Vec<u8>)>,
        fail: bool,
    }

    impl ErrorType for RecordingBus {
        type Error = ErrorKind;
    }

    impl I2c for RecordingBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations.iter() {
                if let Operation::Write(bytes) = op {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    #[test]
    fn nack_during_init_is_a_bus_error() {
        let mut bus = RecordingBus {
            fail: true,
            ..RecordingBus::default()
        };
        let mut oled = Oled::new(&mut bus);
        assert_eq!(oled.init(), Err(DisplayError::Bus));
    }

    #[test]
    fn init_starts_with_display_off() {
        let mut bus = RecordingBus::default();
        Oled::new(&mut bus).init().unwrap();

        let (addr, first) = &bus.writes[0];
        assert_eq!(*addr, OLED_I2C_ADDRESS);
        assert_eq!(first.as_slice(), &[0x00, 0xAE]);
    }

    #[test]
    fn flush_without_drawing_sends_nothing() {
        let mut bus = RecordingBus::default();
        let mut oled = Oled::new(&mut bus);
        oled.flush_region(Region::FULL).unwrap();
        drop(oled);
        assert!(bus.writes.is_empty());
    }

    #[test]
    fn drawn_rows_are_streamed_as_data() {
        let mut bus = RecordingBus::default();
        let mut oled = Oled::new(&mut bus);
        let region = Region::clamped(0, 8, 16, 8).unwrap();
        Rectangle::new(Point::new(0, 8), Size::new(16, 8))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut oled)
            .unwrap();
        oled.flush_region(region).unwrap();
        drop(oled);

        let data: Vec<u8> = bus
            .writes
            .iter()
            .filter(|(_, bytes)| bytes.first() == Some(&0x40))
            .flat_map(|(_, bytes)| bytes[1..].iter().copied())
            .collect();
        // One page of 16 lit columns.
        assert_eq!(data, vec![0xFF; 16]);
    }

    #[test]
    fn failed_flush_is_a_bus_error() {
        let mut bus = RecordingBus {
            fail: true,
            ..RecordingBus::default()
        };
        let mut oled = Oled::new(&mut bus);
        // Drawing only touches the RAM frame.
        Pixel(Point::new(3, 3), BinaryColor::On)
            .draw(&mut oled)
            .unwrap();
        assert_eq!(oled.flush_region(Region::FULL), Err(DisplayError::Bus));
    }
}
