//! Data-driven game balance
//!
//! Every knob defaults to the matching value in [`crate::consts`]. A JSON
//! document may override any subset; omitted fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::consts::*;
use crate::sim::slope::Projection;

/// Balance tables for the whole arcade
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub snake: SnakeTuning,
    pub pong: PongTuning,
    pub slope: SlopeTuning,
    pub matchmaking: MatchmakingTuning,
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeTuning {
    pub grid_size: i32,
    pub base_interval_ms: f64,
    pub food_reward: u64,
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self {
            grid_size: SNAKE_GRID_SIZE,
            base_interval_ms: SNAKE_BASE_INTERVAL_MS,
            food_reward: SNAKE_FOOD_REWARD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongTuning {
    pub table_width: f32,
    pub table_height: f32,
    pub paddle_height: f32,
    pub paddle_width: f32,
    pub player_x: f32,
    pub opponent_x: f32,
    pub serve_speed: f32,
    pub rally_factor: f32,
    pub max_ball_dx: f32,
    pub online_speed: f32,
    pub reaction_delay_ms: f64,
    pub remote_jitter: f32,
    pub remote_gain: f32,
    pub hit_reward: u64,
    pub point_reward: u64,
}

impl Default for PongTuning {
    fn default() -> Self {
        Self {
            table_width: PONG_TABLE_WIDTH,
            table_height: PONG_TABLE_HEIGHT,
            paddle_height: PONG_PADDLE_HEIGHT,
            paddle_width: PONG_PADDLE_WIDTH,
            player_x: PONG_PLAYER_X,
            opponent_x: PONG_OPPONENT_X,
            serve_speed: PONG_SERVE_SPEED,
            rally_factor: PONG_RALLY_FACTOR,
            max_ball_dx: PONG_MAX_BALL_DX,
            online_speed: PONG_ONLINE_SPEED,
            reaction_delay_ms: PONG_REACTION_DELAY_MS,
            remote_jitter: PONG_REMOTE_JITTER,
            remote_gain: PONG_REMOTE_GAIN,
            hit_reward: PONG_HIT_REWARD,
            point_reward: PONG_POINT_REWARD,
        }
    }
}

impl PongTuning {
    /// Clamp a paddle's top edge to the table
    pub fn clamp_paddle_y(&self, y: f32) -> f32 {
        y.clamp(0.0, self.table_height - self.paddle_height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlopeTuning {
    pub lane_offset: f32,
    pub spawn_depth: f32,
    pub despawn_depth: f32,
    pub player_depth: f32,
    pub near_field_half_width: f32,
    pub collision_radius: f32,
    pub spawn_chance: f32,
    pub lateral_ease: f32,
    pub score_scale: f32,
    pub projection: Projection,
}

impl Default for SlopeTuning {
    fn default() -> Self {
        Self {
            lane_offset: SLOPE_LANE_OFFSET,
            spawn_depth: SLOPE_SPAWN_DEPTH,
            despawn_depth: SLOPE_DESPAWN_DEPTH,
            player_depth: SLOPE_PLAYER_DEPTH,
            near_field_half_width: SLOPE_NEAR_FIELD_HALF_WIDTH,
            collision_radius: SLOPE_COLLISION_RADIUS,
            spawn_chance: SLOPE_SPAWN_CHANCE,
            lateral_ease: SLOPE_LATERAL_EASE,
            score_scale: SLOPE_SCORE_SCALE,
            projection: Projection::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchmakingTuning {
    pub connect_delay_ms: f64,
    pub search_delay_ms: f64,
    pub handoff_delay_ms: f64,
    /// Display names of the simulated online opponents
    pub roster: Vec<String>,
}

impl Default for MatchmakingTuning {
    fn default() -> Self {
        Self {
            connect_delay_ms: CONNECT_DELAY_MS,
            search_delay_ms: SEARCH_DELAY_MS,
            handoff_delay_ms: HANDOFF_DELAY_MS,
            roster: ["NeonViper", "KAI_Zero", "ChronosUser_99", "GhostShell", "VelocitY"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
