/*!
Tetromino shapes and the matrix-based pieces made from them.
*/

use std::fmt;

use crate::{Tile, TileTypeID, Vec2};

/// Represents one of the seven tetromino shapes.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tetromino {
    /// 'I'-Tetromino, four squares in a straight line.
    I = 0,
    /// 'J'-Tetromino.
    J,
    /// 'L'-Tetromino.
    L,
    /// 'O'-Tetromino, a 2×2 square.
    O,
    /// 'S'-Tetromino.
    S,
    /// 'T'-Tetromino.
    T,
    /// 'Z'-Tetromino.
    Z,
}

impl Tetromino {
    /// All `Tetromino` enum variants in order.
    ///
    /// Note that `Tetromino::VARIANTS[t as usize] == t` always holds.
    pub const VARIANTS: [Self; 7] = {
        use Tetromino::*;
        [I, J, L, O, S, T, Z]
    };

    /// Returns the convened-on standard tile id corresponding to the given tetromino.
    ///
    /// Every occupied cell of a [`Piece`] spawned from this tetromino carries
    /// exactly this id, in all orientations.
    pub const fn tile_type_id(self) -> TileTypeID {
        let id = self as u8 + 1;
        // SAFETY: Ye, `id > 0`.
        unsafe { TileTypeID::new_unchecked(id) }
    }

    /// The canonical single-letter name of the tetromino.
    pub const fn letter(self) -> char {
        use Tetromino::*;
        match self {
            I => 'I',
            J => 'J',
            L => 'L',
            O => 'O',
            S => 'S',
            T => 'T',
            Z => 'Z',
        }
    }

    /// Creates a fresh [`Piece`] in this tetromino's canonical spawn orientation.
    pub fn spawn_piece(self) -> Piece {
        #[rustfmt::skip]
        let pattern: &[&[u8]] = match self {
            Tetromino::I => &[&[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0]],
            Tetromino::J => &[&[0, 1, 0], &[0, 1, 0], &[1, 1, 0]],
            Tetromino::L => &[&[0, 1, 0], &[0, 1, 0], &[0, 1, 1]],
            Tetromino::O => &[&[1, 1], &[1, 1]],
            Tetromino::S => &[&[1, 1, 0], &[0, 1, 1]],
            Tetromino::T => &[&[0, 0, 0], &[1, 1, 1], &[0, 1, 0]],
            Tetromino::Z => &[&[0, 1, 1], &[1, 1, 0]],
        };
        let id = self.tile_type_id();
        let cells = pattern
            .iter()
            .map(|row| row.iter().map(|&c| (c != 0).then_some(id)).collect())
            .collect();
        Piece {
            tetromino: self,
            cells,
        }
    }
}

/// A tetromino piece as a small rectangular matrix of [`Tile`]s.
///
/// A `Piece` is an immutable value: rotation returns a new piece and never
/// mutates in place. Equality is by tetromino id plus matrix contents.
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    tetromino: Tetromino,
    cells: Vec<Vec<Tile>>,
}

impl Piece {
    /// Which of the seven tetrominos this piece is.
    pub fn tetromino(&self) -> Tetromino {
        self.tetromino
    }

    /// The piece's cell matrix, row-major, top row first.
    pub fn cells(&self) -> &[Vec<Tile>] {
        &self.cells
    }

    /// Iterates over the occupied cells as (offset, tile id) pairs.
    pub fn tiles(&self) -> impl Iterator<Item = (Vec2, TileTypeID)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter().enumerate().filter_map(move |(x, tile)| {
                tile.map(|id| (Vec2::of(x as i32, y as i32), id))
            })
        })
    }

    /// Returns this piece rotated 90° clockwise.
    ///
    /// Rotation is a plain bounding-box transpose + reversal, not a
    /// geometry-aware per-piece table. Non-square pieces (notably 'I')
    /// therefore rotate within their own bounding box, which may push tiles
    /// against a wall and require the caller's horizontal nudge to fit.
    pub fn rotate_cw(&self) -> Piece {
        let (h, w) = (self.cells.len(), self.cells[0].len());
        let cells = (0..w)
            .map(|y| (0..h).map(|x| self.cells[x][w - 1 - y]).collect())
            .collect();
        Piece {
            tetromino: self.tetromino,
            cells,
        }
    }

    /// Returns this piece rotated 90° counterclockwise.
    pub fn rotate_ccw(&self) -> Piece {
        let (h, w) = (self.cells.len(), self.cells[0].len());
        let cells = (0..w)
            .map(|y| (0..h).map(|x| self.cells[h - 1 - x][y]).collect())
            .collect();
        Piece {
            tetromino: self.tetromino,
            cells,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for tile in row {
                match tile {
                    Some(id) => write!(f, "{id}")?,
                    None => write!(f, ".")?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_rotations_are_identity() {
        for tetromino in Tetromino::VARIANTS {
            let piece = tetromino.spawn_piece();
            let cw4 = piece.rotate_cw().rotate_cw().rotate_cw().rotate_cw();
            assert_eq!(piece, cw4, "{}: cw^4 != id", tetromino.letter());
            let ccw4 = piece.rotate_ccw().rotate_ccw().rotate_ccw().rotate_ccw();
            assert_eq!(piece, ccw4, "{}: ccw^4 != id", tetromino.letter());
        }
    }

    #[test]
    fn cw_then_ccw_is_identity() {
        for tetromino in Tetromino::VARIANTS {
            let piece = tetromino.spawn_piece();
            assert_eq!(piece, piece.rotate_cw().rotate_ccw());
            assert_eq!(piece, piece.rotate_ccw().rotate_cw());
        }
    }

    #[test]
    fn occupied_cells_carry_own_id() {
        for tetromino in Tetromino::VARIANTS {
            let mut piece = tetromino.spawn_piece();
            for _ in 0..4 {
                assert_eq!(piece.tiles().count(), 4);
                for (_, id) in piece.tiles() {
                    assert_eq!(id, tetromino.tile_type_id());
                }
                piece = piece.rotate_cw();
            }
        }
    }

    #[test]
    fn rotation_swaps_bounding_box() {
        let s = Tetromino::S.spawn_piece();
        assert_eq!((s.cells().len(), s.cells()[0].len()), (2, 3));
        let s_cw = s.rotate_cw();
        assert_eq!((s_cw.cells().len(), s_cw.cells()[0].len()), (3, 2));
    }

    #[test]
    fn i_piece_rotates_within_its_bounding_box() {
        // The vertical 'I' spawn matrix occupies column 1; one clockwise turn
        // turns it into a full horizontal row inside the same 4x4 box.
        let i = Tetromino::I.spawn_piece();
        let i_cw = i.rotate_cw();
        let occupied: Vec<Vec2> = i_cw.tiles().map(|(offset, _)| offset).collect();
        assert_eq!(
            occupied,
            vec![
                Vec2::of(0, 2),
                Vec2::of(1, 2),
                Vec2::of(2, 2),
                Vec2::of(3, 2)
            ]
        );
    }

    #[test]
    fn display_uses_dots_for_empty_cells() {
        let o = Tetromino::O.spawn_piece();
        assert_eq!(o.to_string(), "44\n44");
    }
}
