//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests.

#![cfg(any(test, feature = "std"))]

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::display::{DisplayError, FlushTarget, Region};
use crate::input::{InputSnapshot, InputSource};
use crate::peripheral::UartPeripheral;

/// Length of one MP3-module frame, used to split the write log.
const FRAME_LEN: usize = 10;

/// Errors a [`MockUart`] can be told to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockUartError {
    /// Write rejected because [`MockUart::fail_writes`] was set.
    WriteFailed,
    /// Write log is full.
    Overflow,
}

/// Mock UART link to the MP3 module.
///
/// Every written byte is logged. Reads are served from a queue of scripted
/// response bytes; when the queue runs dry a read never completes, like a
/// silent device on a real line, so callers must bound it with a timeout.
pub struct MockUart {
    written: heapless::Vec<u8, 1024>,
    responses: heapless::Deque<u8, 128>,
    fail_writes: bool,
}

impl MockUart {
    /// Create a silent mock UART.
    pub fn new() -> Self {
        Self {
            written: heapless::Vec::new(),
            responses: heapless::Deque::new(),
            fail_writes: false,
        }
    }

    /// Queue bytes the "device" will answer with.
    pub fn push_response(&mut self, bytes: &[u8]) -> Result<(), u8> {
        for &b in bytes {
            self.responses.push_back(b)?;
        }
        Ok(())
    }

    /// Make every following write fail.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Raw bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Written bytes split into 10-byte frames.
    pub fn frames(&self) -> impl Iterator<Item = &[u8]> {
        self.written.chunks_exact(FRAME_LEN)
    }

    /// Command byte (offset 3) of every written frame, in order.
    pub fn command_bytes(&self) -> heapless::Vec<u8, 128> {
        self.frames()
            .filter_map(|frame| frame.get(3).copied())
            .collect()
    }

    /// Forget everything written so far.
    pub fn clear_written(&mut self) {
        self.written.clear();
    }
}

impl Default for MockUart {
    fn default() -> Self {
        Self::new()
    }
}

impl UartPeripheral for MockUart {
    type Error = MockUartError;

    async fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockUartError::WriteFailed);
        }
        self.written
            .extend_from_slice(data)
            .map_err(|_| MockUartError::Overflow)
    }

    async fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        if self.responses.len() < buffer.len() {
            return core::future::pending().await;
        }
        for slot in buffer.iter_mut() {
            if let Some(b) = self.responses.pop_front() {
                *slot = b;
            }
        }
        Ok(())
    }
}

/// Mock input device
///
/// Returns queued snapshots one per poll, then idle snapshots.
pub struct MockInput {
    snapshots: heapless::Deque<InputSnapshot, 32>,
    polls: usize,
}

impl MockInput {
    /// Create new mock input
    pub fn new() -> Self {
        Self {
            snapshots: heapless::Deque::new(),
            polls: 0,
        }
    }

    /// Queue the result of a future poll.
    pub fn push(&mut self, snapshot: InputSnapshot) -> Result<(), InputSnapshot> {
        self.snapshots.push_back(snapshot)
    }

    /// Number of polls made so far.
    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl Default for MockInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for MockInput {
    fn poll(&mut self) -> InputSnapshot {
        self.polls = self.polls.saturating_add(1);
        self.snapshots.pop_front().unwrap_or_default()
    }
}

/// Mock LED recording every level change.
pub struct MockLed {
    lit: bool,
    switch_ons: usize,
}

impl MockLed {
    /// LED starts off.
    pub fn new() -> Self {
        Self {
            lit: false,
            switch_ons: 0,
        }
    }

    /// Current state.
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// How many times the LED went from off to on.
    pub fn switch_ons(&self) -> usize {
        self.switch_ons
    }
}

impl Default for MockLed {
    fn default() -> Self {
        Self::new()
    }
}

impl embedded_hal::digital::ErrorType for MockLed {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for MockLed {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.lit {
            self.switch_ons = self.switch_ons.saturating_add(1);
        }
        self.lit = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.lit = false;
        Ok(())
    }
}

/// Mock panel recording what was drawn and flushed.
///
/// Drawn pixels are not stored; the mock keeps the bounding box of every
/// pixel drawn since the last flush and the list of flushed regions.
pub struct MockDisplay {
    drawn: Option<Region>,
    flushes: heapless::Vec<Region, 32>,
    fail_flushes: bool,
}

impl MockDisplay {
    /// Create new mock display
    pub fn new() -> Self {
        Self {
            drawn: None,
            flushes: heapless::Vec::new(),
            fail_flushes: false,
        }
    }

    /// Box around everything drawn since the last successful flush.
    pub fn drawn(&self) -> Option<Region> {
        self.drawn
    }

    /// Regions flushed so far, oldest first.
    pub fn flushes(&self) -> &[Region] {
        &self.flushes
    }

    /// Make every following flush fail with a bus error.
    pub fn fail_flushes(&mut self, fail: bool) {
        self.fail_flushes = fail;
    }
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for MockDisplay {
    fn size(&self) -> Size {
        Size::new(u32::from(DISPLAY_WIDTH), u32::from(DISPLAY_HEIGHT))
    }
}

impl DrawTarget for MockDisplay {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, _) in pixels {
            let (Ok(x), Ok(y)) = (i16::try_from(point.x), i16::try_from(point.y)) else {
                continue;
            };
            if let Some(pixel) = Region::clamped(x, y, 1, 1) {
                self.drawn = Some(self.drawn.map_or(pixel, |d| d.union(&pixel)));
            }
        }
        Ok(())
    }
}

impl FlushTarget for MockDisplay {
    fn flush_region(&mut self, region: Region) -> Result<(), DisplayError> {
        if self.fail_flushes {
            return Err(DisplayError::Bus);
        }
        self.drawn = None;
        let _ = self.flushes.push(region);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gpio::StatusLed;
    use crate::input::{Button, ButtonLevels};

    #[tokio::test]
    async fn test_mock_uart_logs_frames() {
        let mut uart = MockUart::new();
        uart.write(&[0x7E, 0xFF, 0x06, 0x03, 0, 0, 1, 0xFE, 0xF7, 0xEF])
            .await
            .unwrap();
        uart.write(&[0x7E, 0xFF, 0x06, 0x0E, 0, 0, 0, 0xFE, 0xED, 0xEF])
            .await
            .unwrap();
        assert_eq!(uart.frames().count(), 2);
        assert_eq!(uart.command_bytes().as_slice(), &[0x03, 0x0E]);
    }

    #[tokio::test]
    async fn test_mock_uart_serves_scripted_response() {
        let mut uart = MockUart::new();
        uart.push_response(&[1, 2, 3]).unwrap();
        let mut buf = [0u8; 3];
        uart.read(&mut buf).await.unwrap();
        assert_eq!(buf, [1, 2, 3]);
    }

    #[tokio::test]
    async fn test_mock_uart_write_failure() {
        let mut uart = MockUart::new();
        uart.fail_writes(true);
        assert_eq!(uart.write(&[0]).await, Err(MockUartError::WriteFailed));
        assert!(uart.written().is_empty());
    }

    #[test]
    fn test_mock_input() {
        let mut input = MockInput::new();
        let pressed = InputSnapshot {
            buttons: ButtonLevels::NONE.with(Button::Enter),
            encoder_delta: 2,
        };
        input.push(pressed).unwrap();
        assert_eq!(input.poll(), pressed);
        assert_eq!(input.poll(), InputSnapshot::default());
        assert_eq!(input.polls(), 2);
    }

    #[test]
    fn test_mock_led_counts_blinks() {
        let mut led = MockLed::new();
        for _ in 0..3 {
            led.set_lit(true);
            led.set_lit(true);
            led.set_lit(false);
        }
        assert_eq!(led.switch_ons(), 3);
        assert!(!led.is_lit());
    }

    #[test]
    fn test_mock_display_tracks_drawn_box() {
        let mut display = MockDisplay::new();
        Pixel(Point::new(3, 9), BinaryColor::On).draw(&mut display).unwrap();
        Pixel(Point::new(40, 20), BinaryColor::Off).draw(&mut display).unwrap();
        Pixel(Point::new(-1, 200), BinaryColor::On).draw(&mut display).unwrap();
        let drawn = display.drawn().unwrap();
        assert_eq!((drawn.x, drawn.y, drawn.right(), drawn.bottom()), (3, 9, 41, 21));

        display.flush_region(drawn).unwrap();
        assert_eq!(display.drawn(), None);
        assert_eq!(display.flushes(), &[drawn]);

        display.fail_flushes(true);
        assert_eq!(display.flush_region(drawn), Err(DisplayError::Bus));
    }
}
