//! Persistent score stores
//!
//! - Native: a JSON file, rewritten on every new best
//! - wasm32: LocalStorage under `chronos_scores`
//!
//! Both keep an in-memory copy so reads never touch the backing store.

use crate::highscores::{GameId, HighScores, ScoreStore};
use crate::Result;

/// High scores backed by a JSON file
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
    scores: HighScores,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    /// Open a store, starting fresh if the file is missing or unreadable
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let scores = match std::fs::read_to_string(&path) {
            Ok(json) => match HighScores::from_json(&json) {
                Ok(scores) => {
                    log::info!("Loaded high scores from {}", path.display());
                    scores
                }
                Err(e) => {
                    log::warn!("High score file {} is corrupt ({}), starting fresh", path.display(), e);
                    HighScores::new()
                }
            },
            Err(_) => {
                log::info!("No high scores found, starting fresh");
                HighScores::new()
            }
        };
        Self { path, scores }
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    fn save(&self) -> Result<()> {
        let json = self.scores.to_json()?;
        // Write-then-rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for JsonFileStore {
    fn high_score(&self, game: GameId) -> u64 {
        self.scores.get(game)
    }

    fn set_high_score_if_higher(&mut self, game: GameId, score: u64) -> Result<bool> {
        if !self.scores.record(game, score) {
            return Ok(false);
        }
        self.save()?;
        log::info!("High scores saved to {}", self.path.display());
        Ok(true)
    }
}

/// High scores backed by browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageStore {
    scores: HighScores,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "chronos_scores";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }

    /// Load high scores from LocalStorage
    pub fn load() -> Self {
        if let Some(storage) = Self::storage() {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = HighScores::from_json(&json) {
                    log::info!("Loaded high scores from LocalStorage");
                    return Self { scores };
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::default()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn high_score(&self, game: GameId) -> u64 {
        self.scores.get(game)
    }

    fn set_high_score_if_higher(&mut self, game: GameId, score: u64) -> Result<bool> {
        if !self.scores.record(game, score) {
            return Ok(false);
        }
        let storage = Self::storage()
            .ok_or_else(|| crate::Error::StorageUnavailable("no LocalStorage".into()))?;
        let json = self.scores.to_json()?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| crate::Error::StorageUnavailable(format!("{:?}", e)))?;
        log::info!("High scores saved");
        Ok(true)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("neon_arcade_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_file_store_persists_best() {
        let path = temp_path("scores_persist");
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.high_score(GameId::Snake), 0);
        assert!(store.set_high_score_if_higher(GameId::Snake, 40).unwrap());
        assert!(!store.set_high_score_if_higher(GameId::Snake, 25).unwrap());

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.high_score(GameId::Snake), 40);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let path = temp_path("scores_corrupt");
        std::fs::write(&path, "garbage").unwrap();
        let store = JsonFileStore::open(&path);
        assert_eq!(*store.scores(), HighScores::new());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unwritable_location_reports_error() {
        let path = std::env::temp_dir()
            .join("neon_arcade_no_such_dir")
            .join("nested")
            .join("scores.json");
        let mut store = JsonFileStore::open(&path);
        assert!(store.set_high_score_if_higher(GameId::Pong, 10).is_err());
        // In-memory copy still reflects the new best
        assert_eq!(store.high_score(GameId::Pong), 10);
    }
}
