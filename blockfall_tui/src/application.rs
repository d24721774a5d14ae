//! Terminal application: owns the terminal mode, the frame loop, the save
//! file and the players' game states; translates key events into game
//! commands.

use std::{
    collections::HashMap,
    io::{self, Write},
    time::{Duration, Instant},
};

use blockfall_engine::{Command, Feedback, FeedbackMsgs, GameState, GameTime};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::{
    audio::{AudioSink, Muted, TerminalBell},
    keybinds,
    renderer,
    save_file::{SaveError, SaveFileRepository},
};

/// Ticking faster than this gains nothing over typical terminal refresh.
const MAX_TICK_RATE: u32 = 120;

/// One participant: a game plus the keys steering it.
pub struct Player {
    pub game: GameState,
    keybinds: HashMap<KeyCode, Command>,
}

pub struct Application<W: Write> {
    out: W,
    repository: SaveFileRepository,
    audio: Box<dyn AudioSink>,
    players: Vec<Player>,
    /// Wall-clock anchor; `clock.elapsed()` is the game timeline.
    clock: Instant,
    tick_duration: Duration,
}

impl<W: Write> Application<W> {
    pub fn new(out: W, seed: Option<u64>, two_player: bool, tick_rate: u32, mute: bool) -> Self {
        // Both players draw from identically-seeded bags so piece sequences match.
        let seed = seed.unwrap_or_else(rand::random);
        let mut players = vec![Player {
            game: GameState::builder().seed(seed).build(),
            keybinds: keybinds::player_one(),
        }];
        if two_player {
            players.push(Player {
                game: GameState::builder().seed(seed).build(),
                keybinds: keybinds::player_two(),
            });
        }
        let audio: Box<dyn AudioSink> = if mute {
            Box::new(Muted)
        } else {
            Box::new(TerminalBell)
        };
        Self {
            out,
            repository: SaveFileRepository::at_default_path(),
            audio,
            players,
            clock: Instant::now(),
            tick_duration: Duration::from_secs(1).div_f64(f64::from(tick_rate.clamp(1, MAX_TICK_RATE))),
        }
    }

    /// Runs the application until the user quits, returning the exit message.
    pub fn run(&mut self) -> io::Result<String> {
        terminal::enable_raw_mode()?;
        execute!(self.out, EnterAlternateScreen, cursor::Hide)?;
        let result = self.main_loop();
        execute!(self.out, cursor::Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        result
    }

    fn main_loop(&mut self) -> io::Result<String> {
        loop {
            let frame_deadline = Instant::now() + self.tick_duration;
            // Drain input until the next frame is due.
            while let Some(remaining) = frame_deadline.checked_duration_since(Instant::now()).filter(|d| !d.is_zero()) {
                if !event::poll(remaining)? {
                    break;
                }
                if let Event::Key(key) = event::read()? {
                    if let Some(exit_msg) = self.handle_key(key) {
                        return Ok(exit_msg);
                    }
                }
            }
            let now = self.clock.elapsed();
            for i in 0..self.players.len() {
                let feedback = self.players[i].game.tick(now);
                self.process_feedback(i, feedback);
            }
            renderer::draw(&mut self.out, &self.players)?;
        }
    }

    /// Handles one key event; `Some` means the application should exit.
    fn handle_key(&mut self, key: KeyEvent) -> Option<String> {
        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            return None;
        }
        let now = self.clock.elapsed();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some("Thanks for playing!".to_string());
            }
            KeyCode::Esc => {
                for player in &mut self.players {
                    player.game.handle(Command::Pause);
                }
            }
            KeyCode::F(5) => self.save_games(),
            KeyCode::F(9) => self.load_games(now),
            KeyCode::F(2) => self.reset_games(now),
            code => {
                for i in 0..self.players.len() {
                    let Some(&command) = self.players[i].keybinds.get(&code) else {
                        continue;
                    };
                    if self.players[i].game.is_over() {
                        continue;
                    }
                    let feedback = self.players[i].game.handle(command);
                    self.process_feedback(i, feedback);
                }
            }
        }
        None
    }

    fn save_games(&mut self) {
        let games: Vec<GameState> = self.players.iter().map(|p| p.game.clone()).collect();
        let note = match self.repository.save(&games) {
            Ok(()) => "Game saved.".to_string(),
            Err(err) => format!("Save failed: {err}"),
        };
        self.broadcast(note);
    }

    /// Restores saved snapshots, leaving the running games untouched on any
    /// failure (including a player-count mismatch).
    fn load_games(&mut self, now: GameTime) {
        let note = match self.repository.load() {
            Ok(games) if games.len() != self.players.len() => format!(
                "Save holds {} game(s), not {}.",
                games.len(),
                self.players.len()
            ),
            Ok(games) => {
                for (player, loaded) in self.players.iter_mut().zip(&games) {
                    player.game.apply_load(loaded);
                    player.game.rebase(now);
                }
                "Game loaded.".to_string()
            }
            Err(SaveError::NoSavePresent) => "No saved game found.".to_string(),
            Err(err) => format!("Load failed: {err}"),
        };
        self.broadcast(note);
    }

    fn reset_games(&mut self, now: GameTime) {
        let seed = rand::random();
        for player in &mut self.players {
            player.game.apply_load(&GameState::builder().seed(seed).build());
            player.game.rebase(now);
        }
        self.broadcast("New game.".to_string());
    }

    fn broadcast(&mut self, text: String) {
        for player in &mut self.players {
            player.game.add_message(text.clone());
        }
    }

    fn process_feedback(&mut self, player_idx: usize, feedback: FeedbackMsgs) {
        for (_time, event) in feedback {
            match event {
                Feedback::PieceLocked => self.audio.feedback_cue(),
                Feedback::LinesClearing { rows } => self.audio.line_clear_cue(rows.len() as u32),
                Feedback::LinesCleared { lines, score_bonus } => {
                    self.players[player_idx]
                        .game
                        .add_message(format!("+{score_bonus} points ({lines} lines)"));
                }
                Feedback::GameEnded => {
                    self.players[player_idx].game.add_message("Game over.".to_string());
                }
                Feedback::Text(text) => self.players[player_idx].game.add_message(text),
            }
        }
    }
}
