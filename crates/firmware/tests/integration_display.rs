//! Display integration tests: now-playing view → buffered SSD1306 → I2C.
//!
//! Run with: cargo test -p firmware --test integration_display
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use firmware::Oled;
use platform::config::OLED_I2C_ADDRESS;
use platform::{DisplayError, FlushTarget, Region};
use playback::{PlaybackState, Volume};
use ui::NowPlayingView;

/// Bus that keeps every write for inspection.
#[derive(Default)]
struct Recorder {
    writes: Vec<Vec<u8>>,
}

impl ErrorType for Recorder {
    type Error = ErrorKind;
}

impl I2c for Recorder {
    fn transaction(&mut self, address: u8, ops: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        assert_eq!(address, OLED_I2C_ADDRESS);
        for op in ops.iter() {
            if let Operation::Write(bytes) = op {
                self.writes.push(bytes.to_vec());
            }
        }
        Ok(())
    }
}

impl Recorder {
    /// Display RAM bytes sent (data writes, control byte stripped).
    fn data_bytes(&self) -> usize {
        self.writes
            .iter()
            .filter(|w| w.first() == Some(&0x40))
            .map(|w| w.len() - 1)
            .sum()
    }

    /// `(first, last)` of every page-address command sent.
    fn page_windows(&self) -> Vec<(u8, u8)> {
        self.writes
            .iter()
            .filter(|w| w.len() == 4 && w[..2] == [0x00, 0x22])
            .map(|w| (w[2], w[3]))
            .collect()
    }
}

#[test]
fn first_frame_streams_every_page() {
    let mut bus = Recorder::default();
    let mut oled = Oled::new(&mut bus);
    oled.init().unwrap();
    let view = NowPlayingView::from_state(&PlaybackState::new());
    let region = view.render_changes(None, &mut oled).unwrap().unwrap();
    assert_eq!(region, Region::FULL);
    oled.flush_region(region).unwrap();
    drop(oled);

    assert_eq!(bus.data_bytes(), 128 * 8);
}

#[test]
fn volume_change_leaves_title_untouched() {
    let mut bus = Recorder::default();
    let mut oled = Oled::new(&mut bus);
    oled.init().unwrap();
    let mut state = PlaybackState::new();
    let before = NowPlayingView::from_state(&state);
    let full = before.render_changes(None, &mut oled).unwrap().unwrap();
    oled.flush_region(full).unwrap();
    drop(oled);
    let sent_before = bus.writes.len();

    let mut oled = Oled::new(&mut bus);
    state.volume = Volume::new(29);
    let after = NowPlayingView::from_state(&state);
    let region = after
        .render_changes(Some(&before), &mut oled)
        .unwrap()
        .expect("volume change redraws something");
    oled.flush_region(region).unwrap();
    drop(oled);

    // title and track lines live in pages 0..=2
    assert!(region.first_page() >= 3);
    let tail = Recorder {
        writes: bus.writes.split_off(sent_before),
    };
    assert!(tail.data_bytes() > 0);
    for (first, _) in tail.page_windows() {
        assert!(first >= 3);
    }
}

#[test]
fn identical_view_sends_nothing() {
    let mut bus = Recorder::default();
    let mut oled = Oled::new(&mut bus);
    let view = NowPlayingView::from_state(&PlaybackState::new());
    assert_eq!(view.render_changes(Some(&view), &mut oled).unwrap(), None);
    oled.flush_region(Region::FULL).unwrap();
    drop(oled);
    assert!(bus.writes.is_empty());
}

#[test]
fn missing_panel_fails_init() {
    let expected = [I2cTransaction::write(OLED_I2C_ADDRESS, vec![0x00, 0xAE])
        .with_error(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))];
    let mut i2c = I2cMock::new(&expected);
    let mut oled = Oled::new(i2c.clone());
    assert_eq!(oled.init(), Err(DisplayError::Bus));
    i2c.done();
}
