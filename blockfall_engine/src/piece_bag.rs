/*!
This module handles random generation of [`Tetromino`]s via the 7-bag.
*/

use rand::seq::SliceRandom;
use rand_chacha::rand_core::SeedableRng;

use crate::{GameRng, Tetromino};

/// A fair shuffle-and-drain tetromino source.
///
/// The bag holds a working copy of the seven canonical pieces; drawing yields
/// them one at a time and reshuffles once the buffer is drained. This
/// guarantees every tetromino appears exactly once per 7 consecutive draws
/// counted from a reshuffle boundary - but *not* globally uniform i.i.d.
/// behavior.
///
/// Two bags constructed with the same seed produce identical infinite
/// sequences, which is relied upon for reproducible two-player boards.
#[derive(Eq, PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceBag {
    buffer: [Tetromino; 7],
    cursor: usize,
    rng: GameRng,
    seed: u64,
}

impl PieceBag {
    /// Creates a free-running bag, seeded from the thread RNG.
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Creates a deterministic bag that replays the same piece sequence for
    /// every instance built with the same `seed`.
    pub fn with_seed(seed: u64) -> Self {
        let mut bag = Self {
            buffer: Tetromino::VARIANTS,
            cursor: 0,
            rng: GameRng::seed_from_u64(seed),
            seed,
        };
        bag.buffer.shuffle(&mut bag.rng);
        bag
    }

    /// The seed this bag was constructed with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws the next tetromino, reshuffling the bag when it is exhausted.
    pub fn draw(&mut self) -> Tetromino {
        if self.cursor == self.buffer.len() {
            self.buffer.shuffle(&mut self.rng);
            self.cursor = 0;
        }
        let tetromino = self.buffer[self.cursor];
        self.cursor += 1;
        tetromino
    }
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}
