//! Neon Arcade - embedded real-time arcade engine
//!
//! Core modules:
//! - `sim`: Deterministic simulations (snake, pong duel, runner, matchmaking)
//! - `arcade`: Session controller (menu, launch, high score hand-off, teardown)
//! - `platform`: Browser/native abstraction (clock, storage, logging)
//! - `highscores`: Best result per game and the store contract
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod arcade;
pub mod difficulty;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use arcade::{ActiveGame, Arcade, Screen};
pub use difficulty::Difficulty;
pub use error::{Error, Result};
pub use highscores::{GameId, HighScores, ScoreStore};
pub use settings::{GameMode, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation tick for the continuous games (60 Hz, milliseconds)
    pub const TICK_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted by the fixed-step accumulator (ms)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Snake grid (cells per side)
    pub const SNAKE_GRID_SIZE: i32 = 20;
    /// Snake tick interval at multiplier 1.0 (ms)
    pub const SNAKE_BASE_INTERVAL_MS: f64 = 150.0;
    /// Points per food eaten
    pub const SNAKE_FOOD_REWARD: u64 = 10;

    /// Pong table (pixels)
    pub const PONG_TABLE_WIDTH: f32 = 400.0;
    pub const PONG_TABLE_HEIGHT: f32 = 400.0;
    pub const PONG_PADDLE_HEIGHT: f32 = 60.0;
    pub const PONG_PADDLE_WIDTH: f32 = 8.0;
    /// Left edge of the player's paddle slab
    pub const PONG_PLAYER_X: f32 = 20.0;
    /// Right edge of the opponent's paddle slab
    pub const PONG_OPPONENT_X: f32 = 380.0;
    /// Serve speed (pixels per tick, before the speed multiplier)
    pub const PONG_SERVE_SPEED: f32 = 4.0;
    /// Speed boost when ball hits a paddle (multiplicative)
    pub const PONG_RALLY_FACTOR: f32 = 1.05;
    /// Cap on horizontal ball speed (pixels per tick, before the multiplier)
    pub const PONG_MAX_BALL_DX: f32 = 12.0;
    /// Ball speed multiplier for online play, independent of difficulty
    pub const PONG_ONLINE_SPEED: f32 = 1.5;
    /// Remote opponent reaction delay (ms)
    pub const PONG_REACTION_DELAY_MS: f64 = 200.0;
    /// Remote opponent aim error (pixels, uniform +/-)
    pub const PONG_REMOTE_JITTER: f32 = 10.0;
    /// Remote opponent easing gain per tick
    pub const PONG_REMOTE_GAIN: f32 = 0.08;
    /// Arcade points for returning the ball
    pub const PONG_HIT_REWARD: u64 = 10;
    /// Arcade points for winning a rally
    pub const PONG_POINT_REWARD: u64 = 50;

    /// Runner lanes and geometry (logical units)
    pub const SLOPE_LANE_OFFSET: f32 = 0.7;
    pub const SLOPE_SPAWN_DEPTH: f32 = 10.0;
    pub const SLOPE_DESPAWN_DEPTH: f32 = -1.0;
    /// Player's depth in front of the camera; near-field band is centred here
    pub const SLOPE_PLAYER_DEPTH: f32 = 0.5;
    pub const SLOPE_NEAR_FIELD_HALF_WIDTH: f32 = 0.2;
    pub const SLOPE_COLLISION_RADIUS: f32 = 0.5;
    /// Spawn chance per tick at multiplier 1.0
    pub const SLOPE_SPAWN_CHANCE: f32 = 0.05;
    /// Fraction of the remaining lateral gap closed per tick
    pub const SLOPE_LATERAL_EASE: f32 = 0.25;
    /// Distance to score conversion
    pub const SLOPE_SCORE_SCALE: f32 = 100.0;

    /// Perspective projection (screen pixels)
    pub const VIEW_WIDTH: f32 = 400.0;
    pub const VIEW_HEIGHT: f32 = 400.0;
    /// Lanes at the player's depth land 140 px either side of centre
    pub const FOCAL_LENGTH: f32 = 1.0;
    pub const SPREAD_X: f32 = 100.0;
    pub const SPREAD_Y: f32 = 50.0;
    pub const CAMERA_HEIGHT_OFFSET: f32 = 50.0;
    /// Depth clamp for the perspective divide
    pub const MIN_DEPTH: f32 = 0.01;
    /// Obstacles closer than this are not drawn
    pub const NEAR_CLIP_DEPTH: f32 = 0.1;

    /// Matchmaking phase delays (ms)
    pub const CONNECT_DELAY_MS: f64 = 1500.0;
    pub const SEARCH_DELAY_MS: f64 = 3000.0;
    pub const HANDOFF_DELAY_MS: f64 = 2500.0;
    /// Progress dot cadence on the matchmaking screen (ms)
    pub const DOTS_INTERVAL_MS: f64 = 500.0;
}
