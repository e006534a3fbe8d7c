//! Matchmaking for online duels
//!
//! A timer-driven state machine advanced by caller timestamps:
//! `Connecting -> Searching -> Found -> (ready for hand-off)`, with
//! `Cancelled` reachable before a match is found. No network I/O happens;
//! the opponent is drawn from a fixed roster.

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::GameRng;
use crate::consts::DOTS_INTERVAL_MS;
use crate::tuning::MatchmakingTuning;

const FALLBACK_OPPONENT: &str = "GUEST";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Connecting,
    Searching,
    Found,
    Cancelled,
}

/// Result of advancing the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    InProgress(MatchPhase),
    /// Hand-off delay elapsed; consume with [`MatchState::into_opponent`]
    Ready,
    Cancelled,
}

/// The synthetic player a match resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opponent {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct MatchState {
    phase: MatchPhase,
    started_at: f64,
    elapsed_ms: f64,
    opponent: Option<Opponent>,
    tuning: MatchmakingTuning,
    rng: GameRng,
}

impl MatchState {
    pub fn new(now: f64, tuning: &MatchmakingTuning, seed: u64) -> Self {
        log::info!("Matchmaking: connecting");
        Self {
            phase: MatchPhase::Connecting,
            started_at: now,
            elapsed_ms: 0.0,
            opponent: None,
            tuning: tuning.clone(),
            rng: GameRng::new(seed),
        }
    }

    /// Move the machine forward to `now`, crossing as many phases as are due
    pub fn advance(&mut self, now: f64) -> MatchStatus {
        if self.phase == MatchPhase::Cancelled {
            return MatchStatus::Cancelled;
        }
        self.elapsed_ms = self.elapsed_ms.max(now - self.started_at);

        let t = &self.tuning;
        let found_at = t.connect_delay_ms + t.search_delay_ms;
        let ready_at = found_at + t.handoff_delay_ms;

        if self.phase == MatchPhase::Connecting && self.elapsed_ms >= t.connect_delay_ms {
            self.phase = MatchPhase::Searching;
            log::info!("Matchmaking: searching");
        }
        if self.phase == MatchPhase::Searching && self.elapsed_ms >= found_at {
            let name = self
                .tuning
                .roster
                .choose(&mut self.rng.0)
                .cloned()
                .unwrap_or_else(|| FALLBACK_OPPONENT.to_string());
            log::info!("Matchmaking: found {}", name);
            self.opponent = Some(Opponent { name });
            self.phase = MatchPhase::Found;
        }

        if self.phase == MatchPhase::Found && self.elapsed_ms >= ready_at {
            MatchStatus::Ready
        } else {
            MatchStatus::InProgress(self.phase)
        }
    }

    /// Abort the search. Only possible before an opponent is found.
    pub fn cancel(&mut self) -> bool {
        match self.phase {
            MatchPhase::Connecting | MatchPhase::Searching => {
                self.phase = MatchPhase::Cancelled;
                log::info!("Matchmaking cancelled");
                true
            }
            MatchPhase::Found | MatchPhase::Cancelled => false,
        }
    }

    /// Give up the state for the opponent it resolved to
    pub fn into_opponent(self) -> Option<Opponent> {
        match self.phase {
            MatchPhase::Found => self.opponent,
            _ => None,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn opponent(&self) -> Option<&Opponent> {
        self.opponent.as_ref()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn headline(&self) -> &'static str {
        match self.phase {
            MatchPhase::Connecting => "Connecting to Server",
            MatchPhase::Searching => "Searching for Opponent",
            MatchPhase::Found => "Match Found",
            MatchPhase::Cancelled => "Cancelled",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self.phase {
            MatchPhase::Connecting => "Region: EU-West (12ms)",
            MatchPhase::Searching => "Skill Rating: 1240 ± 50",
            MatchPhase::Found => "Connecting...",
            MatchPhase::Cancelled => "",
        }
    }

    /// Progress dots: one, two, three, then back to one
    pub fn dots(&self) -> &'static str {
        const DOTS: [&str; 3] = [".", "..", "..."];
        let beat = (self.elapsed_ms / DOTS_INTERVAL_MS).floor() as usize;
        DOTS[beat % DOTS.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(now: f64) -> MatchState {
        MatchState::new(now, &MatchmakingTuning::default(), 7)
    }

    #[test]
    fn test_phase_timeline() {
        let mut state = start(1000.0);
        assert_eq!(state.advance(2499.0), MatchStatus::InProgress(MatchPhase::Connecting));
        assert_eq!(state.advance(2500.0), MatchStatus::InProgress(MatchPhase::Searching));
        assert_eq!(state.advance(5499.0), MatchStatus::InProgress(MatchPhase::Searching));
        assert!(state.opponent().is_none());
        assert_eq!(state.advance(5500.0), MatchStatus::InProgress(MatchPhase::Found));
        assert_eq!(state.advance(7999.0), MatchStatus::InProgress(MatchPhase::Found));
        assert_eq!(state.advance(8000.0), MatchStatus::Ready);
    }

    #[test]
    fn test_found_draws_from_roster_once() {
        let tuning = MatchmakingTuning::default();
        let mut state = start(0.0);
        state.advance(4500.0);
        let first = state.opponent().cloned().unwrap();
        assert!(tuning.roster.contains(&first.name));
        state.advance(5000.0);
        state.advance(9000.0);
        assert_eq!(state.opponent(), Some(&first));
        assert_eq!(state.into_opponent(), Some(first));
    }

    #[test]
    fn test_large_jump_crosses_every_phase() {
        let mut state = start(0.0);
        assert_eq!(state.advance(60_000.0), MatchStatus::Ready);
        assert!(state.into_opponent().is_some());
    }

    #[test]
    fn test_same_seed_same_opponent() {
        let mut a = start(0.0);
        let mut b = start(500.0);
        a.advance(10_000.0);
        b.advance(10_500.0);
        assert_eq!(a.opponent(), b.opponent());
    }

    #[test]
    fn test_cancel_before_found_leaves_no_opponent() {
        let mut state = start(0.0);
        state.advance(2000.0);
        assert!(state.cancel());
        assert_eq!(state.phase(), MatchPhase::Cancelled);
        assert_eq!(state.advance(60_000.0), MatchStatus::Cancelled);
        assert!(state.opponent().is_none());
        assert_eq!(state.into_opponent(), None);
    }

    #[test]
    fn test_cannot_cancel_after_found() {
        let mut state = start(0.0);
        state.advance(4500.0);
        assert!(!state.cancel());
        assert_eq!(state.phase(), MatchPhase::Found);
    }

    #[test]
    fn test_time_going_backwards_does_not_regress() {
        let mut state = start(0.0);
        state.advance(2000.0);
        assert_eq!(state.advance(100.0), MatchStatus::InProgress(MatchPhase::Searching));
        assert_eq!(state.elapsed_ms(), 2000.0);
    }

    #[test]
    fn test_presentation_text() {
        let mut state = start(0.0);
        assert_eq!(state.headline(), "Connecting to Server");
        assert_eq!(state.dots(), ".");
        state.advance(500.0);
        assert_eq!(state.dots(), "..");
        state.advance(1000.0);
        assert_eq!(state.dots(), "...");
        state.advance(1500.0);
        assert_eq!(state.dots(), ".");
        assert_eq!(state.headline(), "Searching for Opponent");
        assert_eq!(state.detail(), "Skill Rating: 1240 ± 50");
    }

    #[test]
    fn test_empty_roster_still_matches() {
        let tuning = MatchmakingTuning {
            roster: Vec::new(),
            ..MatchmakingTuning::default()
        };
        let mut state = MatchState::new(0.0, &tuning, 1);
        assert_eq!(state.advance(10_000.0), MatchStatus::Ready);
        assert_eq!(state.into_opponent().map(|o| o.name), Some("GUEST".to_string()));
    }
}
