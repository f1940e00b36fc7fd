//! Boot order and board wiring.
//!
//! Start-up must create every shared resource before the task that uses it
//! runs, and must paint the UI stack before core 1 touches it.

/// Ordered start-up steps. `main` follows this order; the fatal blink code
/// for each failing step is given in brackets.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "1. Clocks + peripherals: embassy_rp::init, status LED off",
    "2. Paint core 1 stack with the watermark pattern",
    "3. Shared context: channel, player guard, encoder, UI tick [2]",
    "4. Encoder: seed phase from live levels, enable edge counting",
    "5. Interrupt executor: encoder edge task [5], UI timer task [3]",
    "6. Core 1: OLED init, UI task [5]",
    "7. Core 0 thread executor: LED task, player task [5]",
];

/// RP2040 GPIO numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    /// Enter button, active low.
    pub button_enter: u8,
    /// Back button, active low.
    pub button_back: u8,
    /// Up button, active low.
    pub button_up: u8,
    /// Down button, active low.
    pub button_down: u8,
    /// Encoder line A.
    pub encoder_a: u8,
    /// Encoder line B.
    pub encoder_b: u8,
    /// UART1 TX to the module's RX.
    pub player_tx: u8,
    /// UART1 RX from the module's TX.
    pub player_rx: u8,
    /// I2C0 SDA.
    pub oled_sda: u8,
    /// I2C0 SCL.
    pub oled_scl: u8,
    /// On-board LED.
    pub status_led: u8,
}

impl PinMap {
    /// All pins in declaration order.
    pub const fn all(&self) -> [u8; 11] {
        [
            self.button_enter,
            self.button_back,
            self.button_up,
            self.button_down,
            self.encoder_a,
            self.encoder_b,
            self.player_tx,
            self.player_rx,
            self.oled_sda,
            self.oled_scl,
            self.status_led,
        ]
    }
}

/// Pico board wiring.
pub const PINS: PinMap = PinMap {
    button_enter: 12,
    button_back: 13,
    button_up: 14,
    button_down: 15,
    encoder_a: 16,
    encoder_b: 17,
    player_tx: 4,
    player_rx: 5,
    oled_sda: 8,
    oled_scl: 9,
    status_led: 25,
};

/// OLED bus clock.
pub const OLED_I2C_FREQUENCY_HZ: u32 = 400_000;
