/*!
# Blockfall Engine

`blockfall_engine` implements the logic of a falling-block puzzle game:
a 10×20 grid, seven tetromino pieces with naive transpose rotation, a fair
7-bag piece randomizer, level-based gravity timing, line clearing with a
short animation window, and scoring.

The engine is driven cooperatively: a frontend calls [`GameState::tick`] at a
fixed rate with the current in-game time and applies discrete player
[`Command`]s in between. The engine never reads the wall clock, never draws,
and never touches the filesystem - rendering, keyboard handling, audio, and
persistence are left to a surrounding application.

# Examples

```
use std::time::Duration;
use blockfall_engine::{Command, GameState};

let mut game = GameState::builder().seed(42).build();

// Player input is applied synchronously.
game.handle(Command::MoveLeft);
game.handle(Command::RotateCw);

// Time only advances when the driver says so.
let feedback = game.tick(Duration::from_millis(10));
assert!(feedback.is_empty());

// A frontend renders from read accessors, e.g. `game.render_grid()`.
```
*/

#![warn(missing_docs)]

mod command;
mod game;
mod grid;
mod piece;
mod piece_bag;
mod vec2;

use std::{fmt, num::NonZeroU8, time::Duration};

use rand_chacha::ChaCha12Rng;

pub use command::Command;
pub use game::{
    progression, score_for, Feedback, FeedbackMsgs, GameBuilder, GameState, Message, Phase,
    LINE_CLEAR_DURATION, MESSAGE_DURATION,
};
pub use grid::{Grid, COLS, ROWS};
pub use piece::{Piece, Tetromino};
pub use piece_bag::PieceBag;
pub use vec2::Vec2;

/// Identifier for which type of tile occupies a cell; matches the canonical
/// id (1..=7) of the [`Tetromino`] the tile came from.
pub type TileTypeID = NonZeroU8;
/// A single cell of a piece matrix or of the playing grid; `None` is empty.
pub type Tile = Option<TileTypeID>;
/// The type used to identify points on a game's internal timeline.
pub type GameTime = Duration;
/// The internal RNG used by a [`PieceBag`].
pub type GameRng = ChaCha12Rng;

/// An error signalling a broken internal invariant of the game logic.
///
/// These indicate a logic defect, not bad player input, so callers inside
/// the engine treat them as fatal for the operation that raised them.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
pub enum GameError {
    /// A line-clear event reported a number of cleared lines outside `0..=4`,
    /// which no single piece can cause.
    InvalidLineCount(u32),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidLineCount(n) => {
                write!(f, "invalid number of lines cleared at once: {n}")
            }
        }
    }
}

impl std::error::Error for GameError {}
