//! Difficulty tiers
//!
//! One named multiplier drives every game: snake tick rate, pong ball speed
//! and AI tracking, runner speed and obstacle density.

use serde::{Deserialize, Serialize};

/// Difficulty tier, ordered from gentlest to hardest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Extreme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
            Difficulty::Extreme => "EXTREME",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "extreme" | "cyberpunk" => Some(Difficulty::Extreme),
            _ => None,
        }
    }

    /// Speed/aggressiveness multiplier (strictly increasing across tiers)
    pub fn multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 2.0,
            Difficulty::Extreme => 3.5,
        }
    }

    /// Fraction of the gap the local pong AI closes per tick
    pub fn tracking_gain(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.05,
            Difficulty::Medium => 0.10,
            Difficulty::Hard | Difficulty::Extreme => 0.15,
        }
    }

    /// Runner forward speed (depth units per tick)
    pub fn runner_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.05,
            Difficulty::Medium => 0.08,
            Difficulty::Hard => 0.10,
            Difficulty::Extreme => 0.15,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_strictly_increasing() {
        for pair in Difficulty::ALL.windows(2) {
            assert!(pair[0].multiplier() < pair[1].multiplier());
            assert!(pair[0].multiplier() > 0.0);
        }
    }

    #[test]
    fn test_gain_and_speed_never_decrease() {
        for pair in Difficulty::ALL.windows(2) {
            assert!(pair[0].tracking_gain() <= pair[1].tracking_gain());
            assert!(pair[0].runner_speed() < pair[1].runner_speed());
        }
    }

    #[test]
    fn test_parse_round_trip_names() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::parse(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::parse("CYBERPUNK"), Some(Difficulty::Extreme));
        assert_eq!(Difficulty::parse("impossible"), None);
    }
}
