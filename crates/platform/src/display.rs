//! OLED display abstraction
//!
//! The panel is a 128×64 monochrome OLED. SSD1306-class controllers address
//! it as 8 horizontal *pages* of 8 pixel rows each, so an update always
//! covers whole pages.
//!
//! UI code draws through [`embedded_graphics::draw_target::DrawTarget`] and
//! then asks the [`FlushTarget`] to push the [`Region`] it changed. Update
//! requests go through [`Region::clamped`], which cuts them to the panel.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use thiserror_no_std::Error;

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Number of pixel rows covered by one page.
pub const PAGE_HEIGHT: u8 = 8;

/// Rectangular area of the display in pixel coordinates.
///
/// Regions produced by [`Region::clamped`] always lie fully inside the panel
/// and are never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Region {
    /// Left column.
    pub x: u8,
    /// Top row.
    pub y: u8,
    /// Width in columns.
    pub width: u8,
    /// Height in rows.
    pub height: u8,
}

impl Region {
    /// The whole panel.
    pub const FULL: Region = Region {
        x: 0,
        y: 0,
        width: DISPLAY_WIDTH,
        height: DISPLAY_HEIGHT,
    };

    /// Clamp an update request to the panel bounds.
    ///
    /// Coordinates may be negative or overshoot the panel; the part that falls
    /// outside is cut off. Returns `None` when nothing of the request is on
    /// screen.
    pub fn clamped(x: i16, y: i16, width: i16, height: i16) -> Option<Region> {
        let x0 = x.clamp(0, i16::from(DISPLAY_WIDTH));
        let y0 = y.clamp(0, i16::from(DISPLAY_HEIGHT));
        let x1 = x.saturating_add(width).clamp(0, i16::from(DISPLAY_WIDTH));
        let y1 = y.saturating_add(height).clamp(0, i16::from(DISPLAY_HEIGHT));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Region {
            x: u8::try_from(x0).ok()?,
            y: u8::try_from(y0).ok()?,
            width: u8::try_from(x1.saturating_sub(x0)).ok()?,
            height: u8::try_from(y1.saturating_sub(y0)).ok()?,
        })
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u8 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u8 {
        self.y.saturating_add(self.height)
    }

    /// First page touched by this region.
    pub fn first_page(&self) -> u8 {
        self.y / PAGE_HEIGHT
    }

    /// Last page touched by this region (inclusive).
    pub fn last_page(&self) -> u8 {
        self.bottom().saturating_sub(1) / PAGE_HEIGHT
    }

    /// Smallest region covering both `self` and `other`.
    pub fn union(&self, other: &Region) -> Region {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Region {
            x,
            y,
            width: self.right().max(other.right()).saturating_sub(x),
            height: self.bottom().max(other.bottom()).saturating_sub(y),
        }
    }
}

/// A panel that is drawn on first and updated afterwards.
///
/// Drawing lands in the driver's RAM copy of the panel; nothing reaches the
/// glass until [`FlushTarget::flush_region`] runs.
pub trait FlushTarget: DrawTarget<Color = BinaryColor> {
    /// Push `region` to the panel.
    ///
    /// Regions built with [`Region::clamped`] always lie on the panel. A
    /// driver may push more than `region`, never less.
    fn flush_region(&mut self, region: Region) -> Result<(), DisplayError>;
}

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Transfer to the controller failed.
    #[error("display bus error")]
    Bus,
}

impl DisplayError {
    /// Short label for log output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bus => "bus",
        }
    }
}
