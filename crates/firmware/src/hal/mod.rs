//! RP2040 glue: adapters from embassy-rp drivers to the platform traits.

use embassy_rp::peripherals::UART1;
use embassy_rp::uart::{self, Async, Uart};
use platform::{DataBits, Parity, StopBits, UartConfig, UartPeripheral};

/// UART1 wired to the MP3 module.
pub struct PlayerUart(pub Uart<'static, UART1, Async>);

impl UartPeripheral for PlayerUart {
    type Error = uart::Error;

    async fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write(data).await
    }

    async fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.0.read(buffer).await
    }
}

/// embassy-rp line settings for `config`.
pub fn uart_config(config: &UartConfig) -> uart::Config {
    let mut out = uart::Config::default();
    out.baudrate = config.baud_rate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    out.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    out
}
