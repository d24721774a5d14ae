//! The save-file repository: a versioned JSON snapshot of all running games.

use std::{fmt, fs, io, path::PathBuf};

use blockfall_engine::GameState;

/// The compatibility tag written into every save file; loading hard-fails on
/// anything but an exact match.
const SAVE_VERSION: &str = clap::crate_version!();

const SAVE_FILE_NAME: &str = ".blockfall_save.json";

#[derive(serde::Serialize, serde::Deserialize)]
struct SaveFile {
    version: String,
    games: Vec<GameState>,
}

/// Why a save or load failed.
#[derive(Debug)]
pub enum SaveError {
    /// The underlying file could not be read or written.
    Io(io::Error),
    /// The file exists but is not a well-formed save.
    Format(serde_json::Error),
    /// There is no save file to load.
    NoSavePresent,
    /// The save was written by a different, incompatible version.
    IncompatibleVersion {
        /// The version string found in the file.
        found: String,
    },
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "save file i/o error: {e}"),
            SaveError::Format(e) => write!(f, "malformed save file: {e}"),
            SaveError::NoSavePresent => write!(f, "no save present"),
            SaveError::IncompatibleVersion { found } => {
                write!(f, "save version {found} is not compatible with {SAVE_VERSION}")
            }
        }
    }
}

impl std::error::Error for SaveError {}

impl From<io::Error> for SaveError {
    fn from(e: io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Format(e)
    }
}

/// Persists and restores game snapshots at a fixed path.
pub struct SaveFileRepository {
    path: PathBuf,
}

impl SaveFileRepository {
    /// A repository at the platform's standard config folder.
    pub fn at_default_path() -> Self {
        let path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(SAVE_FILE_NAME);
        Self { path }
    }

    /// A repository at an explicit path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Writes a snapshot of all given games, tagged with the current version.
    pub fn save(&self, games: &[GameState]) -> Result<(), SaveError> {
        let save = SaveFile {
            version: SAVE_VERSION.to_string(),
            games: games.to_vec(),
        };
        let payload = serde_json::to_string(&save)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }

    /// Reads back the saved snapshots.
    ///
    /// Fails without touching anything when no save is present or the save
    /// was written by an incompatible version.
    pub fn load(&self) -> Result<Vec<GameState>, SaveError> {
        if !self.save_present() {
            return Err(SaveError::NoSavePresent);
        }
        let payload = fs::read_to_string(&self.path)?;
        let save: SaveFile = serde_json::from_str(&payload)?;
        if save.version != SAVE_VERSION {
            return Err(SaveError::IncompatibleVersion {
                found: save.version,
            });
        }
        Ok(save.games)
    }

    /// Whether a save file exists at all (compatible or not).
    pub fn save_present(&self) -> bool {
        self.path.is_file()
    }

    /// Removes the save file if there is one.
    pub fn delete(&self) -> io::Result<()> {
        if self.save_present() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_repository(tag: &str) -> SaveFileRepository {
        let path = std::env::temp_dir().join(format!(
            "blockfall_test_{tag}_{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        SaveFileRepository::at(path)
    }

    #[test]
    fn save_then_load_restores_the_games() {
        let repository = temp_repository("roundtrip");
        assert!(!repository.save_present());
        assert!(matches!(repository.load(), Err(SaveError::NoSavePresent)));

        let games = vec![GameState::builder().seed(5).build()];
        repository.save(&games).unwrap();
        assert!(repository.save_present());
        let loaded = repository.load().unwrap();
        assert_eq!(loaded, games);

        repository.delete().unwrap();
        assert!(!repository.save_present());
    }

    #[test]
    fn incompatible_version_is_a_hard_failure() {
        let repository = temp_repository("version");
        let games = vec![GameState::builder().seed(5).build()];
        repository.save(&games).unwrap();

        // Rewrite the version tag in place.
        let payload = fs::read_to_string(&repository.path).unwrap();
        let tampered = payload.replace(SAVE_VERSION, "0.0.0-old");
        fs::write(&repository.path, tampered).unwrap();

        match repository.load() {
            Err(SaveError::IncompatibleVersion { found }) => assert_eq!(found, "0.0.0-old"),
            other => panic!("expected version mismatch, got {other:?}"),
        }
        repository.delete().unwrap();
    }
}
