//! Button panel and rotary encoder input
//!
//! The panel has four momentary buttons wired active-low with internal
//! pull-ups, and a quadrature rotary encoder. The UI polls both once per tick
//! through [`InputSource`], receiving an [`InputSnapshot`].

/// Physical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Confirm / play
    Enter,
    /// Back / pause
    Back,
    /// Up
    Up,
    /// Down
    Down,
}

impl Button {
    /// Every button, in bit order of [`ButtonLevels`].
    pub const ALL: [Button; 4] = [Button::Enter, Button::Back, Button::Up, Button::Down];

    fn mask(self) -> u8 {
        match self {
            Button::Enter => 1 << 0,
            Button::Back => 1 << 1,
            Button::Up => 1 << 2,
            Button::Down => 1 << 3,
        }
    }

    /// Short label for log output.
    pub fn label(self) -> &'static str {
        match self {
            Button::Enter => "enter",
            Button::Back => "back",
            Button::Up => "up",
            Button::Down => "down",
        }
    }
}

/// Which buttons are held, one bit per [`Button`].
///
/// Built from raw active-low pin levels with [`ButtonLevels::from_active_low`],
/// so a set bit always means "pressed" regardless of wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonLevels(u8);

impl ButtonLevels {
    /// Nothing pressed.
    pub const NONE: ButtonLevels = ButtonLevels(0);

    /// Decode raw pin levels (`true` = line high). A low line is a press.
    pub fn from_active_low(enter: bool, back: bool, up: bool, down: bool) -> Self {
        let mut levels = ButtonLevels::NONE;
        for (button, high) in Button::ALL.into_iter().zip([enter, back, up, down]) {
            if !high {
                levels = levels.with(button);
            }
        }
        levels
    }

    /// Copy of `self` with `button` pressed.
    pub fn with(self, button: Button) -> Self {
        ButtonLevels(self.0 | button.mask())
    }

    /// Whether `button` is held.
    pub fn is_pressed(self, button: Button) -> bool {
        self.0 & button.mask() != 0
    }

    /// Buttons held now but not in `previous`.
    pub fn pressed_since(self, previous: ButtonLevels) -> ButtonLevels {
        ButtonLevels(self.0 & !previous.0)
    }

    /// Buttons held in `previous` but no longer.
    pub fn released_since(self, previous: ButtonLevels) -> ButtonLevels {
        ButtonLevels(previous.0 & !self.0)
    }

    /// Iterate the held buttons.
    pub fn iter(self) -> impl Iterator<Item = Button> {
        Button::ALL.into_iter().filter(move |b| self.is_pressed(*b))
    }
}

/// One poll of the input hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSnapshot {
    /// Buttons held at the moment of the poll.
    pub buttons: ButtonLevels,
    /// Whole encoder detents since the previous poll (positive = clockwise).
    pub encoder_delta: i16,
}

/// Input device polled once per UI tick.
pub trait InputSource {
    /// Sample the buttons and take the encoder movement since the last call.
    fn poll(&mut self) -> InputSnapshot;
}
