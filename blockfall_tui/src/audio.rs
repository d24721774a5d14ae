//! Audio cues, reduced to what a terminal can do: the bell.

use std::io::{self, Write};

/// Something that can play the game's two kinds of cue.
pub trait AudioSink {
    /// Cue for `lines` (1..=4) lines starting to clear.
    fn line_clear_cue(&mut self, lines: u32);
    /// Generic feedback cue, e.g. a piece locking without a clear.
    fn feedback_cue(&mut self);
}

/// Rings the terminal bell, once per cleared line.
pub struct TerminalBell;

impl TerminalBell {
    fn ring(&self, times: u32) {
        let mut stdout = io::stdout();
        for _ in 0..times {
            let _ = stdout.write_all(b"\x07");
        }
        let _ = stdout.flush();
    }
}

impl AudioSink for TerminalBell {
    fn line_clear_cue(&mut self, lines: u32) {
        self.ring(lines);
    }

    fn feedback_cue(&mut self) {
        self.ring(1);
    }
}

/// Plays nothing; used with `--mute`.
pub struct Muted;

impl AudioSink for Muted {
    fn line_clear_cue(&mut self, _lines: u32) {}

    fn feedback_cue(&mut self) {}
}
