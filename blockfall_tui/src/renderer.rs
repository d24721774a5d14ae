//! Naive full-redraw board renderer on top of crossterm.
//!
//! Reads the game states once per frame through their public accessors and
//! never holds on to engine internals.

use std::io::{self, Write};

use blockfall_engine::{GameState, Piece, TileTypeID, COLS, ROWS};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
};

use crate::application::Player;

/// Horizontal space each player's panel (board + sidebar) occupies.
const PANEL_WIDTH: u16 = 2 * COLS as u16 + 24;

/// The convened-on display color for each tile id.
///
/// Any id outside 1..=7 cannot come from the seven tetrominos and indicates
/// a broken invariant, so it is treated as fatal.
fn tile_color(id: TileTypeID) -> Color {
    match id.get() {
        1 => Color::Cyan,
        2 => Color::Blue,
        3 => Color::DarkYellow,
        4 => Color::Yellow,
        5 => Color::Green,
        6 => Color::Magenta,
        7 => Color::Red,
        n => unreachable!("tile id {n} has no color; ids are always 1..=7"),
    }
}

/// Draws all players side by side and flushes the frame.
pub fn draw<W: Write>(out: &mut W, players: &[Player]) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    for (i, player) in players.iter().enumerate() {
        draw_panel(out, &player.game, i)?;
    }
    let hints_row = ROWS as u16 + 3;
    queue!(
        out,
        MoveTo(0, hints_row),
        Print("F5 save   F9 load   F2 reset   Esc pause all   Ctrl-C quit".dim()),
    )?;
    out.flush()
}

fn draw_panel<W: Write>(out: &mut W, game: &GameState, index: usize) -> io::Result<()> {
    let x0 = index as u16 * PANEL_WIDTH;
    draw_board(out, game, x0)?;
    draw_sidebar(out, game, x0 + 2 * COLS as u16 + 4, index)?;
    Ok(())
}

fn draw_board<W: Write>(out: &mut W, game: &GameState, x0: u16) -> io::Result<()> {
    let inner = "─".repeat(2 * COLS);
    queue!(out, MoveTo(x0, 0), Print(format!("┌{inner}┐")))?;

    let grid = game.render_grid();
    let clearing = game.clearing_rows();
    for (y, row) in grid.cells().iter().enumerate() {
        queue!(out, MoveTo(x0, y as u16 + 1), Print("│"))?;
        for tile in row {
            match tile {
                // Rows mid-clear are dimmed out until the window elapses.
                Some(_) if clearing.contains(&y) => {
                    queue!(out, PrintStyledContent("▒▒".dark_grey()))?
                }
                Some(id) => queue!(out, PrintStyledContent("██".with(tile_color(*id))))?,
                None => queue!(out, Print("  "))?,
            }
        }
        queue!(out, Print("│"))?;
    }
    queue!(
        out,
        MoveTo(x0, ROWS as u16 + 1),
        Print(format!("└{inner}┘"))
    )?;

    // Status banner overlaid mid-board.
    let banner = if game.is_over() {
        Some("GAME  OVER")
    } else if game.is_paused() {
        Some("  PAUSED  ")
    } else {
        None
    };
    if let Some(text) = banner {
        let x = x0 + (2 * COLS as u16 + 2 - text.len() as u16) / 2;
        queue!(
            out,
            MoveTo(x, ROWS as u16 / 2),
            PrintStyledContent(text.negative())
        )?;
    }
    Ok(())
}

fn draw_sidebar<W: Write>(
    out: &mut W,
    game: &GameState,
    x: u16,
    index: usize,
) -> io::Result<()> {
    queue!(
        out,
        MoveTo(x, 1),
        Print(format!("PLAYER {}", index + 1).bold()),
        MoveTo(x, 3),
        Print(format!("Score {:>7}", game.score())),
        MoveTo(x, 4),
        Print(format!("Level {:>7}", game.level())),
        MoveTo(x, 5),
        Print(format!("Lines {:>7}", game.total_lines())),
        MoveTo(x, 7),
        Print("Next"),
    )?;
    if let Some(piece) = game.preview().front() {
        draw_preview(out, piece, x, 8)?;
    }
    for (i, message) in game.messages().take(4).enumerate() {
        let mut text = message.text.clone();
        text.truncate(18);
        queue!(out, MoveTo(x, 14 + i as u16), Print(text.dim()))?;
    }
    Ok(())
}

fn draw_preview<W: Write>(out: &mut W, piece: &Piece, x: u16, y: u16) -> io::Result<()> {
    for (dy, row) in piece.cells().iter().enumerate() {
        queue!(out, MoveTo(x, y + dy as u16))?;
        for tile in row {
            match tile {
                Some(id) => queue!(out, PrintStyledContent("██".with(tile_color(*id))))?,
                None => queue!(out, Print("  "))?,
            }
        }
    }
    Ok(())
}
