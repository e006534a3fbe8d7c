//! High score records
//!
//! One best result per game, merged with `max` so a stored value never goes
//! down. Persisted as `{"snake":n,"pong":n,"slope":n}` by the platform stores.

use serde::{Deserialize, Serialize};

use crate::Result;

/// The closed set of games that keep a high score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameId {
    Snake,
    Pong,
    Slope,
}

impl GameId {
    pub const ALL: [GameId; 3] = [GameId::Snake, GameId::Pong, GameId::Slope];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::Snake => "snake",
            GameId::Pong => "pong",
            GameId::Slope => "slope",
        }
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External persistence for best scores.
///
/// Implementations may fail to write; callers treat that as non-fatal.
pub trait ScoreStore {
    /// Best score recorded for `game` (0 if none)
    fn high_score(&self, game: GameId) -> u64;

    /// Store `score` only if it beats the current best.
    /// Returns whether the stored value changed.
    fn set_high_score_if_higher(&mut self, game: GameId, score: u64) -> Result<bool>;
}

/// Best score per game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScores {
    pub snake: u64,
    pub pong: u64,
    pub slope: u64,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, game: GameId) -> u64 {
        match game {
            GameId::Snake => self.snake,
            GameId::Pong => self.pong,
            GameId::Slope => self.slope,
        }
    }

    /// Max-merge a score. Returns true if it became the new best.
    pub fn record(&mut self, game: GameId, score: u64) -> bool {
        let slot = match game {
            GameId::Snake => &mut self.snake,
            GameId::Pong => &mut self.pong,
            GameId::Slope => &mut self.slope,
        };
        if score > *slot {
            *slot = score;
            true
        } else {
            false
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// In-memory store; never fails
impl ScoreStore for HighScores {
    fn high_score(&self, game: GameId) -> u64 {
        self.get(game)
    }

    fn set_high_score_if_higher(&mut self, game: GameId, score: u64) -> Result<bool> {
        Ok(self.record(game, score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_merge_keeps_best() {
        let mut scores = HighScores::new();
        assert!(scores.record(GameId::Snake, 40));
        assert!(!scores.record(GameId::Snake, 25));
        assert_eq!(scores.get(GameId::Snake), 40);
        assert_eq!(scores.get(GameId::Pong), 0);
    }

    #[test]
    fn test_equal_score_is_not_new_best() {
        let mut scores = HighScores::new();
        scores.record(GameId::Slope, 120);
        assert!(!scores.record(GameId::Slope, 120));
    }

    #[test]
    fn test_json_format() {
        let mut scores = HighScores::new();
        scores.record(GameId::Pong, 70);
        let json = scores.to_json().unwrap();
        assert_eq!(json, r#"{"snake":0,"pong":70,"slope":0}"#);

        // Missing keys fall back to zero
        let partial = HighScores::from_json(r#"{"slope":9}"#).unwrap();
        assert_eq!(partial.get(GameId::Slope), 9);
        assert_eq!(partial.get(GameId::Snake), 0);
    }

    #[test]
    fn test_store_trait_max_merge() {
        let mut store = HighScores::new();
        store.set_high_score_if_higher(GameId::Snake, 40).unwrap();
        store.set_high_score_if_higher(GameId::Snake, 25).unwrap();
        assert_eq!(store.high_score(GameId::Snake), 40);
    }
}
