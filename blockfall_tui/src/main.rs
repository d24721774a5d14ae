mod application;
mod audio;
mod keybinds;
mod renderer;
mod save_file;

use std::io::{self, Write};

use clap::Parser;

use crate::application::Application;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Custom starting seed, given as a 64-bit integer.
    /// This determines the sequence of pieces; in two-player mode both
    /// players share it and receive identical piece orders.
    /// Example: `./blockfall_tui --seed=42` or `./blockfall_tui -s 42`.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Run two simultaneous players sharing one screen
    /// (player 2 plays on WASD).
    #[arg(short, long)]
    two_player: bool,
    /// Target scheduler rate in ticks per second (max: 120).
    #[arg(long, default_value_t = 100)]
    tick_rate: u32,
    /// Disable the terminal-bell audio cues.
    #[arg(short, long)]
    mute: bool,
    /// Delete the save file and exit.
    #[arg(long)]
    delete_save: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Read commandline arguments.
    let args = Args::parse();

    if args.delete_save {
        let repository = save_file::SaveFileRepository::at_default_path();
        repository.delete()?;
        println!("Save file deleted.");
        return Ok(());
    }

    // Catch panics and write error to separate file, so it isn't lost due to app's terminal shenanigans.
    std::panic::set_hook(Box::new(|panic_info| {
        let crash_file_name = format!(
            "blockfall_crash-msg_{}.txt",
            chrono::Utc::now().format("%Y-%m-%d_%Hh%Mm%Ss")
        );
        if let Ok(mut file) = std::fs::File::create(crash_file_name) {
            let _ = file.write(panic_info.to_string().as_bytes());
        }
    }));

    // Initialize and run main application.
    let stdout = io::BufWriter::new(io::stdout());
    let mut app = Application::new(
        stdout,
        args.seed,
        args.two_player,
        args.tick_rate,
        args.mute,
    );
    let exit_msg = app.run()?;
    println!("{exit_msg}");

    Ok(())
}
