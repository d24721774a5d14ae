/*!
Discrete player commands and their dispatch into the game state.
*/

use crate::{FeedbackMsgs, GameState};

/// A discrete, zero-argument player input.
///
/// An input source (keyboard, bot, ...) translates its events into commands
/// and applies them synchronously with [`GameState::handle`]. Movement
/// commands are subject to the game's "can move" guard (not paused, not
/// mid-line-clear, not over); pause and the level adjustments always apply.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Moves the piece once to the left.
    MoveLeft,
    /// Moves the piece once to the right.
    MoveRight,
    /// Soft drop: moves the piece down one cell and grants the gravity grace
    /// tick.
    MoveDown,
    /// Rotates the piece by +90° (clockwise).
    RotateCw,
    /// Rotates the piece by -90° (counterclockwise).
    RotateCcw,
    /// Hard drop: drops the piece until it rests, then fixes it immediately.
    HardDrop,
    /// Toggles the pause flag.
    Pause,
    /// Raises the player-requested level offset by one.
    IncLevel,
    /// Lowers the level offset by one, clamped at zero.
    DecLevel,
}

impl GameState {
    /// Applies one player command, returning any feedback it caused.
    pub fn handle(&mut self, command: Command) -> FeedbackMsgs {
        let mut msgs = Vec::new();
        match command {
            Command::MoveLeft => {
                self.move_left();
            }
            Command::MoveRight => {
                self.move_right();
            }
            Command::MoveDown => {
                self.move_down();
            }
            Command::RotateCw => {
                self.rotate_cw();
            }
            Command::RotateCcw => {
                self.rotate_ccw();
            }
            Command::HardDrop => self.hard_drop(&mut msgs),
            Command::Pause => self.toggle_pause(),
            Command::IncLevel => self.inc_level(),
            Command::DecLevel => self.dec_level(),
        }
        msgs
    }
}
