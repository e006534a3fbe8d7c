//! Paddle duel
//!
//! Table coordinates are pixels with the origin top-left. The player defends
//! the left edge, the opponent the right. Paddle positions are top edges.
//!
//! Physics run on fixed 60 Hz ticks; the ball moves `vel * speed_mult` per
//! tick. Two opponent controllers share the right paddle:
//! - `LocalAi`: exponential pursuit of the ball every tick
//! - `SimulatedRemote`: a stale, noisy target refreshed at human reaction cadence

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::matchmaking::Opponent;
use super::{GameEvent, GameRng, InputSignal, Side, Simulation};
use crate::Difficulty;
use crate::consts::TICK_MS;
use crate::highscores::GameId;
use crate::platform::FrameTimer;
use crate::tuning::PongTuning;

/// Who drives the right paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpponentMode {
    LocalAi,
    SimulatedRemote,
}

/// The pong ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Pixels per tick before the speed multiplier
    pub vel: Vec2,
}

/// Human-like controller state for the simulated remote opponent
#[derive(Debug, Clone)]
struct RemoteController {
    target_y: f32,
    last_refresh_ms: Option<f64>,
}

/// Read-only view for presenters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PongSnapshot {
    pub ball: Ball,
    pub player_y: f32,
    pub opponent_y: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub player_points: u32,
    pub opponent_points: u32,
    pub score: u64,
    pub mode: OpponentMode,
    pub opponent_name: String,
}

#[derive(Debug, Clone)]
pub struct PongGame {
    tuning: PongTuning,
    mode: OpponentMode,
    opponent_name: String,
    speed_mult: f32,
    tracking_gain: f32,
    ball: Ball,
    player_y: f32,
    opponent_y: f32,
    pending_pointer: Option<f32>,
    player_points: u32,
    opponent_points: u32,
    score: u64,
    remote: RemoteController,
    sim_time_ms: f64,
    timer: FrameTimer,
    rng: GameRng,
}

impl PongGame {
    /// Solo match against the tracking AI
    pub fn local(difficulty: Difficulty, tuning: &PongTuning, seed: u64) -> Self {
        log::info!("Pong started: solo vs CPU ({})", difficulty);
        Self::build(
            OpponentMode::LocalAi,
            "CPU".to_string(),
            difficulty.multiplier(),
            difficulty.tracking_gain(),
            tuning,
            seed,
        )
    }

    /// Matchmade duel against the simulated remote player.
    /// Ball speed is fixed so opponents differ by behaviour, not raw speed.
    pub fn online(opponent: Opponent, tuning: &PongTuning, seed: u64) -> Self {
        log::info!("Pong started: online vs {}", opponent.name);
        Self::build(
            OpponentMode::SimulatedRemote,
            opponent.name,
            tuning.online_speed,
            tuning.remote_gain,
            tuning,
            seed,
        )
    }

    fn build(
        mode: OpponentMode,
        opponent_name: String,
        speed_mult: f32,
        tracking_gain: f32,
        tuning: &PongTuning,
        seed: u64,
    ) -> Self {
        let start_y = (tuning.table_height - tuning.paddle_height) / 2.0;
        let center = Vec2::new(tuning.table_width / 2.0, tuning.table_height / 2.0);
        Self {
            tuning: tuning.clone(),
            mode,
            opponent_name,
            speed_mult,
            tracking_gain,
            ball: Ball {
                pos: center,
                vel: Vec2::splat(tuning.serve_speed),
            },
            player_y: start_y,
            opponent_y: start_y,
            pending_pointer: None,
            player_points: 0,
            opponent_points: 0,
            score: 0,
            remote: RemoteController {
                target_y: start_y,
                last_refresh_ms: None,
            },
            sim_time_ms: 0.0,
            timer: FrameTimer::new(TICK_MS),
            rng: GameRng::new(seed),
        }
    }

    /// Latch the pointer's table y; the paddle centres on it next tick
    pub fn set_player_paddle_y(&mut self, y: f32) {
        if y.is_finite() {
            self.pending_pointer = Some(y);
        }
    }

    /// Advance to `now` (ms) in fixed ticks
    pub fn step(&mut self, now: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..self.timer.accumulate(now) {
            events.extend(self.tick());
        }
        events
    }

    /// One fixed physics tick
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let t = &self.tuning;

        if let Some(y) = self.pending_pointer.take() {
            self.player_y = t.clamp_paddle_y(y - t.paddle_height / 2.0);
        }
        self.sim_time_ms += TICK_MS;

        let prev = self.ball.pos;
        self.ball.pos += self.ball.vel * self.speed_mult;

        // Top/bottom walls
        if self.ball.pos.y <= 0.0 {
            self.ball.pos.y = 0.0;
            self.ball.vel.y = self.ball.vel.y.abs();
            events.push(GameEvent::WallBounce);
        } else if self.ball.pos.y >= t.table_height {
            self.ball.pos.y = t.table_height;
            self.ball.vel.y = -self.ball.vel.y.abs();
            events.push(GameEvent::WallBounce);
        }

        // Paddle slabs, swept over this tick's travel so fast balls can't tunnel
        let player_face = t.player_x + t.paddle_width;
        let opponent_face = t.opponent_x - t.paddle_width;
        if self.ball.vel.x < 0.0
            && swept_overlap(prev.x, self.ball.pos.x, t.player_x, player_face)
            && within_paddle(self.ball.pos.y, self.player_y, t.paddle_height)
        {
            self.ball.vel.x = rally_speed(self.ball.vel.x, t);
            self.ball.pos.x = player_face + 1.0;
            self.score += t.hit_reward;
            events.push(GameEvent::PaddleHit { side: Side::Player });
        } else if self.ball.vel.x > 0.0
            && swept_overlap(prev.x, self.ball.pos.x, opponent_face, t.opponent_x)
            && within_paddle(self.ball.pos.y, self.opponent_y, t.paddle_height)
        {
            self.ball.vel.x = -rally_speed(self.ball.vel.x, t);
            self.ball.pos.x = opponent_face - 1.0;
            events.push(GameEvent::PaddleHit {
                side: Side::Opponent,
            });
        }

        // Scoring
        if self.ball.pos.x < 0.0 {
            self.opponent_points += 1;
            self.serve(1.0);
            events.push(GameEvent::PointScored {
                winner: Side::Opponent,
            });
        } else if self.ball.pos.x > t.table_width {
            self.player_points += 1;
            self.score += t.point_reward;
            self.serve(-1.0);
            events.push(GameEvent::PointScored {
                winner: Side::Player,
            });
        }

        self.move_opponent();
        events
    }

    /// Restart from the centre; `dir_x` is +1 (rightward) or -1 (leftward)
    fn serve(&mut self, dir_x: f32) {
        let t = &self.tuning;
        let vy = if t.serve_speed > 0.0 {
            self.rng.0.random_range(-t.serve_speed..t.serve_speed)
        } else {
            0.0
        };
        self.ball = Ball {
            pos: Vec2::new(t.table_width / 2.0, t.table_height / 2.0),
            vel: Vec2::new(t.serve_speed * dir_x, vy),
        };
        log::debug!(
            "Point: player {} - {} opponent",
            self.player_points,
            self.opponent_points
        );
    }

    fn move_opponent(&mut self) {
        let t = &self.tuning;
        let half = t.paddle_height / 2.0;
        let target = match self.mode {
            OpponentMode::LocalAi => self.ball.pos.y - half,
            OpponentMode::SimulatedRemote => {
                let approaching =
                    self.ball.vel.x > 0.0 && self.ball.pos.x > t.table_width / 2.0;
                let reacted = self
                    .remote
                    .last_refresh_ms
                    .is_none_or(|last| self.sim_time_ms - last > t.reaction_delay_ms);
                if approaching && reacted {
                    let jitter = self.rng.0.random_range(-t.remote_jitter..=t.remote_jitter);
                    self.remote.target_y = self.ball.pos.y - half + jitter;
                    self.remote.last_refresh_ms = Some(self.sim_time_ms);
                }
                self.remote.target_y
            }
        };
        self.opponent_y += (target - self.opponent_y) * self.tracking_gain;
        self.opponent_y = t.clamp_paddle_y(self.opponent_y);
    }

    pub fn ball(&self) -> Ball {
        self.ball
    }

    /// Place the ball directly (serves, drills, tests)
    pub fn set_ball(&mut self, pos: Vec2, vel: Vec2) {
        self.ball = Ball { pos, vel };
    }

    pub fn player_y(&self) -> f32 {
        self.player_y
    }

    pub fn opponent_y(&self) -> f32 {
        self.opponent_y
    }

    pub fn set_opponent_y(&mut self, y: f32) {
        self.opponent_y = self.tuning.clamp_paddle_y(y);
    }

    pub fn player_points(&self) -> u32 {
        self.player_points
    }

    pub fn opponent_points(&self) -> u32 {
        self.opponent_points
    }

    pub fn mode(&self) -> OpponentMode {
        self.mode
    }

    pub fn opponent_name(&self) -> &str {
        &self.opponent_name
    }

    pub fn speed_mult(&self) -> f32 {
        self.speed_mult
    }

    /// Where the remote opponent is currently aiming (stale between refreshes)
    pub fn remote_target(&self) -> f32 {
        self.remote.target_y
    }

    /// Simulated time elapsed over all ticks (ms)
    pub fn sim_time_ms(&self) -> f64 {
        self.sim_time_ms
    }

    pub fn tuning(&self) -> &PongTuning {
        &self.tuning
    }

    pub fn snapshot(&self) -> PongSnapshot {
        PongSnapshot {
            ball: self.ball,
            player_y: self.player_y,
            opponent_y: self.opponent_y,
            paddle_width: self.tuning.paddle_width,
            paddle_height: self.tuning.paddle_height,
            player_points: self.player_points,
            opponent_points: self.opponent_points,
            score: self.score,
            mode: self.mode,
            opponent_name: self.opponent_name.clone(),
        }
    }
}

impl Simulation for PongGame {
    fn game_id(&self) -> GameId {
        GameId::Pong
    }

    fn step(&mut self, now: f64) -> Vec<GameEvent> {
        PongGame::step(self, now)
    }

    fn apply_input(&mut self, input: InputSignal) {
        if let InputSignal::PointerY(y) = input {
            self.set_player_paddle_y(y);
        }
    }

    fn score(&self) -> u64 {
        self.score
    }

    /// Rallies never end on their own; the caller decides when to stop
    fn is_over(&self) -> bool {
        false
    }
}

/// Did the ball's x travel this tick touch the slab `[lo, hi]`?
fn swept_overlap(prev_x: f32, x: f32, lo: f32, hi: f32) -> bool {
    prev_x.min(x) <= hi && prev_x.max(x) >= lo
}

fn within_paddle(ball_y: f32, paddle_y: f32, paddle_height: f32) -> bool {
    ball_y >= paddle_y && ball_y <= paddle_y + paddle_height
}

/// Accelerated horizontal speed (magnitude) after a return, capped
fn rally_speed(vx: f32, t: &PongTuning) -> f32 {
    (vx.abs() * t.rally_factor).min(t.max_ball_dx.max(vx.abs()))
}
