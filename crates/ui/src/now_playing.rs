//! Now-playing screen: track, volume and player mode on the OLED.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use platform::config::{APP_NAME, DISPLAY_WIDTH};
use platform::Region;
use playback::volume::MAX_VOLUME;
use playback::{PlaybackMode, PlaybackState};

/// Text line buffer; 21 columns of FONT_6X10 fit the panel.
pub type Line = heapless::String<24>;

/// Snapshot of what the now-playing screen shows.
///
/// The UI task keeps the last rendered view and redraws only when a new
/// snapshot differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NowPlayingView {
    /// Player mode.
    pub mode: PlaybackMode,
    /// 1-based track index.
    pub track: u16,
    /// Tracks on the source, when known.
    pub track_count: Option<u16>,
    /// Volume 0..=30.
    pub volume: u8,
}

impl NowPlayingView {
    const TITLE_Y: i32 = 0;
    const TRACK_Y: i32 = 12;
    const VOLUME_Y: i32 = 24;
    const MODE_Y: i32 = 36;
    const BAR_Y: i32 = 52;
    const BAR_HEIGHT: u32 = 10;
    const LINE_HEIGHT: u32 = 10;
    /// Fillable width inside the volume bar outline.
    pub const BAR_INNER_WIDTH: u32 = DISPLAY_WIDTH as u32 - 10;

    /// View of the given player state.
    pub fn from_state(state: &PlaybackState) -> Self {
        Self {
            mode: state.mode,
            track: state.track,
            track_count: state.track_count,
            volume: state.volume.get(),
        }
    }

    /// "Track NNN", or "Track NNN/MMM" once the count is known.
    pub fn track_line(&self) -> Line {
        let mut line = Line::new();
        let _ = match self.track_count {
            Some(count) => write!(line, "Track {:03}/{:03}", self.track, count),
            None => write!(line, "Track {:03}", self.track),
        };
        line
    }

    /// "Vol NN/30"
    pub fn volume_line(&self) -> Line {
        let mut line = Line::new();
        let _ = write!(line, "Vol {:2}/{}", self.volume, MAX_VOLUME);
        line
    }

    /// Filled width of the volume bar in pixels.
    pub fn bar_fill(&self) -> u32 {
        let level = u32::from(self.volume.min(MAX_VOLUME));
        level.saturating_mul(Self::BAR_INNER_WIDTH) / u32::from(MAX_VOLUME)
    }

    fn text_style() -> MonoTextStyle<'static, BinaryColor> {
        // opaque background so overdrawing a line erases the old glyphs
        MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(BinaryColor::On)
            .background_color(BinaryColor::Off)
            .build()
    }

    fn line<D>(target: &mut D, text: &str, y: i32) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let mut padded = Line::new();
        let _ = write!(padded, "{text:<21}");
        Text::with_baseline(&padded, Point::new(0, y), Self::text_style(), Baseline::Top)
            .draw(target)?;
        Ok(())
    }

    /// Full-width band of rows starting at `y`, cut to the panel.
    fn band(y: i32, height: u32) -> Option<Region> {
        Region::clamped(
            0,
            i16::try_from(y).ok()?,
            i16::from(DISPLAY_WIDTH),
            i16::try_from(height).ok()?,
        )
    }

    fn grow(changed: Option<Region>, band: Option<Region>) -> Option<Region> {
        match (changed, band) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        }
    }

    /// Draw the whole screen. Every pixel the screen owns is written, so no
    /// clear is needed first.
    pub fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        Self::line(target, APP_NAME, Self::TITLE_Y)?;
        Self::line(target, &self.track_line(), Self::TRACK_Y)?;
        self.render_volume(target)?;
        Self::line(target, self.mode.label(), Self::MODE_Y)?;
        Ok(())
    }

    /// Redraw only the rows that differ from `shown` and return the area to
    /// flush. With nothing shown yet the whole screen is drawn.
    pub fn render_changes<D>(
        &self,
        shown: Option<&Self>,
        target: &mut D,
    ) -> Result<Option<Region>, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let Some(shown) = shown else {
            self.render(target)?;
            return Ok(Some(Region::FULL));
        };
        let mut changed = None;
        if (self.track, self.track_count) != (shown.track, shown.track_count) {
            Self::line(target, &self.track_line(), Self::TRACK_Y)?;
            changed = Self::grow(changed, Self::band(Self::TRACK_Y, Self::LINE_HEIGHT));
        }
        if self.volume != shown.volume {
            self.render_volume(target)?;
            changed = Self::grow(changed, Self::band(Self::VOLUME_Y, Self::LINE_HEIGHT));
            changed = Self::grow(changed, Self::band(Self::BAR_Y, Self::BAR_HEIGHT));
        }
        if self.mode != shown.mode {
            Self::line(target, self.mode.label(), Self::MODE_Y)?;
            changed = Self::grow(changed, Self::band(Self::MODE_Y, Self::LINE_HEIGHT));
        }
        Ok(changed)
    }

    fn render_volume<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        Self::line(target, &self.volume_line(), Self::VOLUME_Y)?;

        let outline = Rectangle::new(
            Point::new(4, Self::BAR_Y),
            Size::new(Self::BAR_INNER_WIDTH + 2, Self::BAR_HEIGHT),
        );
        outline
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(target)?;

        let fill = self.bar_fill();
        let inner_top = Point::new(5, Self::BAR_Y + 1);
        let inner_height = Self::BAR_HEIGHT - 2;
        Rectangle::new(inner_top, Size::new(fill, inner_height))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(target)?;
        Rectangle::new(
            inner_top + Point::new(i32::try_from(fill).unwrap_or(0), 0),
            Size::new(Self::BAR_INNER_WIDTH.saturating_sub(fill), inner_height),
        )
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
        .draw(target)?;
        Ok(())
    }
}
