//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only from caller-supplied timestamps
//! - Seeded RNG only
//! - Inputs latched between frames, applied at the start of the next tick
//! - No rendering or platform dependencies

pub mod matchmaking;
pub mod pong;
pub mod slope;
pub mod snake;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::highscores::GameId;

pub use matchmaking::{MatchPhase, MatchState, MatchStatus, Opponent};
pub use pong::{OpponentMode, PongGame, PongSnapshot};
pub use slope::{LateralInput, Obstacle, ObstacleKind, Projection, SlopeGame, SlopeView, Sprite};
pub use snake::{Direction, SnakeGame, SnakeSnapshot};

/// Which side of the pong table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

/// Something that happened during a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Snake ate food; `score` is the new total
    FoodEaten { score: u64 },
    /// Ball returned by a paddle
    PaddleHit { side: Side },
    /// Ball reflected off the top or bottom wall
    WallBounce,
    /// A rally ended; `winner` took the point
    PointScored { winner: Side },
    /// Runner obstacle appeared at the far plane
    ObstacleSpawned { lateral: f32 },
    /// Run ended with a final score; no further ticks happen
    GameOver { score: u64 },
}

/// Logical input from the host, routed to whichever game is active
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputSignal {
    /// Snake steering (edge-triggered)
    Direction(Direction),
    /// Pong pointer position (absolute table y)
    PointerY(f32),
    /// Runner steering (held)
    Lateral(LateralInput),
}

/// Seeded RNG owned by a single simulation
#[derive(Debug, Clone)]
pub struct GameRng(pub Pcg32);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self(Pcg32::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Common surface of the frame-driven games
pub trait Simulation {
    fn game_id(&self) -> GameId;

    /// Advance to timestamp `now` (ms), running as many ticks as are due
    fn step(&mut self, now: f64) -> Vec<GameEvent>;

    /// Latch an input for the next tick. Inputs meant for another game are ignored.
    fn apply_input(&mut self, input: InputSignal);

    /// Current score as it would be recorded
    fn score(&self) -> u64;

    /// True once the run has reached a terminal state
    fn is_over(&self) -> bool;
}
