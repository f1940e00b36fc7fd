//! Peripheral abstraction layer
//!
//! The MP3 module hangs off a plain UART. Firmware code talks to it through
//! [`UartPeripheral`] so the player logic runs against [`crate::mocks::MockUart`]
//! on the host and the RP2040 UART on hardware.

/// UART peripheral abstraction
pub trait UartPeripheral {
    /// Error type
    type Error: core::fmt::Debug;

    /// Write all of `data`.
    fn write(&mut self, data: &[u8])
        -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Fill `buffer` completely.
    fn read(
        &mut self,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate
    pub baud_rate: u32,
    /// Data bits
    pub data_bits: DataBits,
    /// Parity
    pub parity: Parity,
    /// Stop bits
    pub stop_bits: StopBits,
}

impl UartConfig {
    /// 8N1 at the given baud rate.
    pub const fn eight_n_one(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl Default for UartConfig {
    /// The MP3 module's fixed line settings: 9600 8N1.
    fn default() -> Self {
        Self::eight_n_one(crate::config::PLAYER_UART_BAUD)
    }
}

/// Data bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    /// 7 data bits
    Seven,
    /// 8 data bits
    Eight,
}

/// Parity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    /// No parity
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

/// Stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    /// 1 stop bit
    One,
    /// 2 stop bits
    Two,
}
