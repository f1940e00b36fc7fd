//! OLED panel driver.

pub mod oled;

pub use oled::Oled;
