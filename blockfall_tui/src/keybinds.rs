//! Keyboard-to-command mappings for one or two players on a shared keyboard.

use std::collections::HashMap;

use blockfall_engine::Command;
use crossterm::event::KeyCode;

/// Player 1: arrow keys plus space.
pub fn player_one() -> HashMap<KeyCode, Command> {
    HashMap::from([
        (KeyCode::Left, Command::MoveLeft),
        (KeyCode::Right, Command::MoveRight),
        (KeyCode::Down, Command::MoveDown),
        (KeyCode::Up, Command::RotateCw),
        (KeyCode::Char('.'), Command::RotateCcw),
        (KeyCode::Char(' '), Command::HardDrop),
        (KeyCode::Char('p'), Command::Pause),
        (KeyCode::Char('+'), Command::IncLevel),
        (KeyCode::Char('-'), Command::DecLevel),
    ])
}

/// Player 2: WASD cluster.
pub fn player_two() -> HashMap<KeyCode, Command> {
    HashMap::from([
        (KeyCode::Char('a'), Command::MoveLeft),
        (KeyCode::Char('d'), Command::MoveRight),
        (KeyCode::Char('s'), Command::MoveDown),
        (KeyCode::Char('w'), Command::RotateCw),
        (KeyCode::Char('q'), Command::RotateCcw),
        (KeyCode::Char('x'), Command::HardDrop),
        (KeyCode::Char('e'), Command::Pause),
        (KeyCode::Char('2'), Command::IncLevel),
        (KeyCode::Char('1'), Command::DecLevel),
    ])
}
