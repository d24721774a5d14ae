/*!
The fixed-size playing grid that settled pieces are stamped into.
*/

use std::fmt;

use crate::{Piece, Tile, Vec2};

/// Grid width in cells.
pub const COLS: usize = 10;
/// Grid height in cells.
pub const ROWS: usize = 20;

/// The 10×20 cell matrix of settled tiles.
///
/// The grid owns no piece positions; a [`Piece`] becomes part of it only by
/// [`Grid::place`] copy-stamping its occupied cells at an offset. Cloning
/// deep-copies all rows, so a rendering snapshot never aliases the
/// authoritative grid.
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    cells: Vec<[Tile; COLS]>,
}

impl Grid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self {
            cells: vec![[None; COLS]; ROWS],
        }
    }

    /// The grid's rows, top row first.
    pub fn cells(&self) -> &[[Tile; COLS]] {
        &self.cells
    }

    /// Whether the piece's occupied cells all map to empty in-range grid
    /// cells when anchored at `pos` (top-left of the piece's bounding box).
    ///
    /// Returns `true` even when the piece's *bounding box* sticks out, as
    /// long as every occupied cell lands inside `[0,COLS)×[0,ROWS)` on an
    /// empty cell.
    pub fn fits(&self, piece: &Piece, pos: Vec2) -> bool {
        piece.tiles().all(|(offset, _)| {
            let cell = pos + offset;
            (0..COLS as i32).contains(&cell.x)
                && (0..ROWS as i32).contains(&cell.y)
                && self.cells[cell.y as usize][cell.x as usize].is_none()
        })
    }

    /// Copy-stamps the piece's occupied cells into the grid at `pos`.
    ///
    /// Callers pre-check [`Grid::fits`]; stamping out of range is a
    /// programming error.
    pub fn place(&mut self, piece: &Piece, pos: Vec2) {
        for (offset, id) in piece.tiles() {
            let cell = pos + offset;
            debug_assert!(
                (0..COLS as i32).contains(&cell.x) && (0..ROWS as i32).contains(&cell.y),
                "place() called with out-of-range position {pos}",
            );
            self.cells[cell.y as usize][cell.x as usize] = Some(id);
        }
    }

    /// Indices of clear-eligible rows (every cell occupied), bottom-to-top.
    pub fn full_rows(&self) -> Vec<usize> {
        (0..ROWS)
            .rev()
            .filter(|&y| self.cells[y].iter().all(Tile::is_some))
            .collect()
    }

    /// Rebuilds the grid with the given rows removed and as many empty rows
    /// pushed in at the top.
    pub fn compacted(&self, cleared_rows: &[usize]) -> Grid {
        let mut cells = vec![[None; COLS]; cleared_rows.len()];
        cells.extend(
            self.cells
                .iter()
                .enumerate()
                .filter(|(y, _)| !cleared_rows.contains(y))
                .map(|(_, row)| *row),
        );
        debug_assert_eq!(cells.len(), ROWS);
        Grid { cells }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Grid {
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
    use crate::Tetromino;

    #[test]
    fn fits_rejects_out_of_range_and_collisions() {
        let mut grid = Grid::new();
        let o = Tetromino::O.spawn_piece();
        assert!(grid.fits(&o, Vec2::ZERO));
        assert!(grid.fits(&o, Vec2::of(8, 18)));
        // Any occupied cell outside the grid fails.
        assert!(!grid.fits(&o, Vec2::of(-1, 0)));
        assert!(!grid.fits(&o, Vec2::of(9, 0)));
        assert!(!grid.fits(&o, Vec2::of(0, 19)));
        // Any occupied cell colliding with a settled tile fails.
        grid.place(&o, Vec2::of(4, 18));
        assert!(!grid.fits(&o, Vec2::of(4, 18)));
        assert!(!grid.fits(&o, Vec2::of(3, 17)));
        assert!(grid.fits(&o, Vec2::of(6, 18)));
    }

    #[test]
    fn fits_allows_bounding_box_overhang() {
        // The vertical 'I' matrix only occupies its column 1, so the 4x4
        // bounding box may stick out to the left by one.
        let grid = Grid::new();
        let i = Tetromino::I.spawn_piece();
        assert!(grid.fits(&i, Vec2::of(-1, 0)));
        assert!(!grid.fits(&i, Vec2::of(-2, 0)));
    }

    #[test]
    fn full_row_detection_is_exact() {
        let mut grid = Grid::new();
        let id = Tetromino::I.tile_type_id();
        // Fill the bottom row except column 3.
        for x in (0..COLS).filter(|&x| x != 3) {
            grid.cells[ROWS - 1][x] = Some(id);
        }
        assert!(grid.full_rows().is_empty());
        grid.cells[ROWS - 1][3] = Some(id);
        assert_eq!(grid.full_rows(), vec![ROWS - 1]);
    }

    #[test]
    fn compacted_removes_rows_and_pads_top() {
        let mut grid = Grid::new();
        let id = Tetromino::Z.tile_type_id();
        for x in 0..COLS {
            grid.cells[ROWS - 1][x] = Some(id);
        }
        grid.cells[ROWS - 2][0] = Some(id);
        let compacted = grid.compacted(&[ROWS - 1]);
        // The stray tile above the cleared row dropped down by one.
        assert_eq!(compacted.cells[ROWS - 1][0], Some(id));
        assert!(compacted.cells[0].iter().all(Tile::is_none));
        assert!(compacted.full_rows().is_empty());
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let mut grid = Grid::new();
        let snapshot = grid.clone();
        grid.place(&Tetromino::O.spawn_piece(), Vec2::of(0, 18));
        assert!(snapshot.cells[18][0].is_none());
    }
}
