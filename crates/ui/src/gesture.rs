//! Input gestures to player commands.
//!
//! The UI task feeds one [`InputSnapshot`] per tick into a [`GestureMapper`].
//! Button *presses* (not levels) become commands, so holding a button does not
//! repeat it. Holding Back long enough additionally stops playback. Every
//! whole encoder detent becomes one volume step; detents that do not fit in
//! one tick carry over to the next.
//!
//! | Gesture            | Command                     |
//! |--------------------|-----------------------------|
//! | Enter press        | `Play`                      |
//! | Back press         | `Pause`                     |
//! | Back held ~1 s     | `Stop`                      |
//! | Up press           | `Next`                      |
//! | Down press         | `Previous`                  |
//! | Encoder clockwise  | `VolumeUp` per detent       |
//! | Encoder counter-cw | `VolumeDown` per detent     |

use platform::{Button, ButtonLevels, InputSnapshot};
use playback::PlayerCommand;

/// Most commands one tick can produce. Detents beyond the remaining room wait
/// for the following ticks.
pub const MAX_COMMANDS_PER_TICK: usize = 8;

/// Ticks Back must stay held before it counts as a stop (50 × 20 ms).
pub const LONG_PRESS_TICKS: u16 = 50;

/// Commands produced by one tick, in the order they should be sent.
pub type TickCommands = heapless::Vec<PlayerCommand, MAX_COMMANDS_PER_TICK>;

fn press_command(button: Button) -> PlayerCommand {
    match button {
        Button::Enter => PlayerCommand::Play,
        Button::Back => PlayerCommand::Pause,
        Button::Up => PlayerCommand::Next,
        Button::Down => PlayerCommand::Previous,
    }
}

/// Edge and hold detector over successive input snapshots.
#[derive(Debug, Default)]
pub struct GestureMapper {
    previous: ButtonLevels,
    back_held: u16,
    detents: i32,
}

impl GestureMapper {
    /// Mapper assuming all buttons start released.
    pub const fn new() -> Self {
        Self {
            previous: ButtonLevels::NONE,
            back_held: 0,
            detents: 0,
        }
    }

    /// Detents seen but not yet turned into commands.
    pub fn pending_detents(&self) -> i32 {
        self.detents
    }

    /// Translate one tick of input.
    pub fn on_tick(&mut self, snapshot: InputSnapshot) -> TickCommands {
        let mut out = TickCommands::new();

        for button in snapshot.buttons.pressed_since(self.previous).iter() {
            let _ = out.push(press_command(button));
        }

        if snapshot.buttons.is_pressed(Button::Back) {
            self.back_held = self.back_held.saturating_add(1);
            if self.back_held == LONG_PRESS_TICKS {
                let _ = out.push(PlayerCommand::Stop);
            }
        } else {
            self.back_held = 0;
        }
        self.previous = snapshot.buttons;

        self.detents = self
            .detents
            .saturating_add(i32::from(snapshot.encoder_delta));
        while self.detents != 0 {
            let (step, unit) = if self.detents > 0 {
                (PlayerCommand::VolumeUp, 1)
            } else {
                (PlayerCommand::VolumeDown, -1)
            };
            if out.push(step).is_err() {
                break;
            }
            self.detents = self.detents.saturating_sub(unit);
        }

        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn buttons(list: &[Button]) -> InputSnapshot {
        InputSnapshot {
            buttons: list.iter().fold(ButtonLevels::NONE, |l, b| l.with(*b)),
            encoder_delta: 0,
        }
    }

    fn turn(delta: i16) -> InputSnapshot {
        InputSnapshot {
            buttons: ButtonLevels::NONE,
            encoder_delta: delta,
        }
    }

    #[test]
    fn press_fires_once_while_held() {
        let mut m = GestureMapper::new();
        assert_eq!(m.on_tick(buttons(&[Button::Enter])).as_slice(), &[PlayerCommand::Play]);
        assert!(m.on_tick(buttons(&[Button::Enter])).is_empty());
        assert!(m.on_tick(buttons(&[])).is_empty());
        assert_eq!(m.on_tick(buttons(&[Button::Enter])).as_slice(), &[PlayerCommand::Play]);
    }

    #[test]
    fn each_button_maps_to_its_command() {
        let cases = [
            (Button::Enter, PlayerCommand::Play),
            (Button::Back, PlayerCommand::Pause),
            (Button::Up, PlayerCommand::Next),
            (Button::Down, PlayerCommand::Previous),
        ];
        for (button, cmd) in cases {
            let mut m = GestureMapper::new();
            assert_eq!(m.on_tick(buttons(&[button])).as_slice(), &[cmd]);
        }
    }

    #[test]
    fn long_back_hold_adds_stop_once() {
        let mut m = GestureMapper::new();
        let mut seen = Vec::new();
        for _ in 0..(LONG_PRESS_TICKS + 20) {
            seen.extend(m.on_tick(buttons(&[Button::Back])));
        }
        assert_eq!(seen, vec![PlayerCommand::Pause, PlayerCommand::Stop]);
    }

    #[test]
    fn encoder_detents_become_volume_steps() {
        let mut m = GestureMapper::new();
        assert_eq!(
            m.on_tick(turn(2)).as_slice(),
            &[PlayerCommand::VolumeUp, PlayerCommand::VolumeUp]
        );
        assert_eq!(m.on_tick(turn(-1)).as_slice(), &[PlayerCommand::VolumeDown]);
        assert!(m.on_tick(turn(0)).is_empty());
    }

    #[test]
    fn fast_spin_is_capped_per_tick() {
        let mut m = GestureMapper::new();
        let out = m.on_tick(InputSnapshot {
            buttons: ButtonLevels::NONE.with(Button::Up),
            encoder_delta: i16::MIN,
        });
        assert_eq!(out.len(), MAX_COMMANDS_PER_TICK);
        assert_eq!(out.first(), Some(&PlayerCommand::Next));
        assert!(out.iter().skip(1).all(|c| *c == PlayerCommand::VolumeDown));
    }

    #[test]
    fn detents_past_the_cap_carry_to_later_ticks() {
        let mut m = GestureMapper::new();
        let mut downs = 0;
        let mut ticks = 0;
        let mut out = m.on_tick(InputSnapshot {
            buttons: ButtonLevels::NONE.with(Button::Up),
            encoder_delta: -20,
        });
        while !out.is_empty() {
            downs += out.iter().filter(|c| **c == PlayerCommand::VolumeDown).count();
            ticks += 1;
            out = m.on_tick(turn(0));
        }
        assert_eq!(downs, 20);
        assert_eq!(ticks, 3);
        assert_eq!(m.pending_detents(), 0);
    }

    #[test]
    fn opposite_turn_cancels_carried_detents() {
        let mut m = GestureMapper::new();
        assert_eq!(m.on_tick(turn(12)).len(), MAX_COMMANDS_PER_TICK);
        assert_eq!(m.pending_detents(), 4);
        assert_eq!(
            m.on_tick(turn(-3)).as_slice(),
            &[PlayerCommand::VolumeUp]
        );
        assert_eq!(m.pending_detents(), 0);
    }
}
