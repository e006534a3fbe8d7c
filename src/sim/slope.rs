//! Endless runner on a pseudo-3D slope
//!
//! The world is two logical axes: `lateral` across the track (-1..1) and
//! `depth` away from the camera. Obstacles spawn at the far plane in one of
//! two off-centre lanes and slide toward the camera at the forward speed.
//!
//! Collision only happens inside the near-field band around the player's
//! depth, and [`Projection`] uses the same units so what is drawn touching is
//! what collides.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{GameEvent, GameRng, InputSignal, Simulation};
use crate::Difficulty;
use crate::consts::*;
use crate::highscores::GameId;
use crate::platform::FrameTimer;
use crate::tuning::SlopeTuning;

/// Held steering input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LateralInput {
    Left,
    Right,
    #[default]
    None,
}

impl LateralInput {
    /// Lateral position this input steers toward
    pub fn target(self, lane_offset: f32) -> f32 {
        match self {
            LateralInput::Left => -lane_offset,
            LateralInput::Right => lane_offset,
            LateralInput::None => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Block,
    Pillar,
}

impl ObstacleKind {
    /// Sprite height relative to its width
    pub fn aspect(self) -> f32 {
        match self {
            ObstacleKind::Block => 1.5,
            ObstacleKind::Pillar => 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub lateral: f32,
    pub depth: f32,
    pub kind: ObstacleKind,
}

/// A world point mapped to the screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub pos: Vec2,
    /// Perspective scale (`focal_length / depth`)
    pub scale: f32,
}

/// Perspective camera for the runner
///
/// `screen_x = center_x + lateral * (focal_length / depth) * spread_x`
/// `screen_y = center_y + height * (focal_length / depth) * spread_y + camera_offset`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    pub center_x: f32,
    pub center_y: f32,
    pub focal_length: f32,
    pub spread_x: f32,
    pub spread_y: f32,
    pub camera_offset: f32,
    pub min_depth: f32,
    pub near_clip: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            center_x: VIEW_WIDTH / 2.0,
            center_y: VIEW_HEIGHT / 2.0,
            focal_length: FOCAL_LENGTH,
            spread_x: SPREAD_X,
            spread_y: SPREAD_Y,
            camera_offset: CAMERA_HEIGHT_OFFSET,
            min_depth: MIN_DEPTH,
            near_clip: NEAR_CLIP_DEPTH,
        }
    }
}

impl Projection {
    pub fn scale_at(&self, depth: f32) -> f32 {
        self.focal_length / depth.max(self.min_depth)
    }

    pub fn project(&self, lateral: f32, height: f32, depth: f32) -> ProjectedPoint {
        let scale = self.scale_at(depth);
        ProjectedPoint {
            pos: Vec2::new(
                self.center_x + lateral * scale * self.spread_x,
                self.center_y + height * scale * self.spread_y + self.camera_offset,
            ),
            scale,
        }
    }

    /// Screen row where the ground meets the sky
    pub fn horizon_y(&self) -> f32 {
        self.center_y - self.camera_offset
    }

    /// Half-width in pixels of a body whose collision reach is `radius`.
    ///
    /// Two bodies drawn with this half-width at the same depth touch exactly
    /// when their lateral distance equals `radius`.
    pub fn body_half_width(&self, radius: f32, depth: f32) -> f32 {
        radius / 2.0 * self.scale_at(depth) * self.spread_x
    }
}

/// A drawable runner body, anchored at its base centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub pos: Vec2,
    pub half_width: f32,
    pub height: f32,
    pub depth: f32,
    /// `None` for the player marker
    pub kind: Option<ObstacleKind>,
}

/// Everything a presenter needs to draw one runner frame
#[derive(Debug, Clone, PartialEq)]
pub struct SlopeView {
    pub player: Sprite,
    /// Far to near
    pub obstacles: Vec<Sprite>,
    pub horizon_y: f32,
    /// Scroll phase of the ground lines, in [0, 1)
    pub ground_offset: f32,
    pub score: u64,
    pub crashed: bool,
}

#[derive(Debug, Clone)]
pub struct SlopeGame {
    tuning: SlopeTuning,
    speed: f32,
    spawn_chance: f32,
    lateral: f32,
    input: LateralInput,
    distance: f32,
    obstacles: Vec<Obstacle>,
    crashed: bool,
    timer: FrameTimer,
    rng: GameRng,
}

impl SlopeGame {
    pub fn new(difficulty: Difficulty, tuning: &SlopeTuning, seed: u64) -> Self {
        log::info!("Slope started ({})", difficulty);
        Self {
            tuning: tuning.clone(),
            speed: difficulty.runner_speed(),
            spawn_chance: (tuning.spawn_chance * difficulty.multiplier()).min(1.0),
            lateral: 0.0,
            input: LateralInput::None,
            distance: 0.0,
            obstacles: Vec::new(),
            crashed: false,
            timer: FrameTimer::new(TICK_MS),
            rng: GameRng::new(seed),
        }
    }

    pub fn set_lateral_input(&mut self, input: LateralInput) {
        self.input = input;
    }

    /// Advance to `now` (ms) in fixed ticks. No-op once crashed.
    pub fn step(&mut self, now: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..self.timer.accumulate(now) {
            if self.crashed {
                break;
            }
            events.extend(self.tick());
        }
        events
    }

    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.crashed {
            return events;
        }
        let t = &self.tuning;

        self.distance += self.speed;

        let target = self.input.target(t.lane_offset);
        self.lateral += (target - self.lateral) * t.lateral_ease;
        self.lateral = self.lateral.clamp(-1.0, 1.0);

        if self.rng.0.random::<f32>() < self.spawn_chance {
            let lateral = if self.rng.0.random_bool(0.5) {
                t.lane_offset
            } else {
                -t.lane_offset
            };
            let kind = if self.rng.0.random_bool(0.5) {
                ObstacleKind::Block
            } else {
                ObstacleKind::Pillar
            };
            self.obstacles.push(Obstacle {
                lateral,
                depth: t.spawn_depth,
                kind,
            });
            events.push(GameEvent::ObstacleSpawned { lateral });
        }

        for obstacle in &mut self.obstacles {
            obstacle.depth -= self.speed;
        }

        let hit = self.obstacles.iter().any(|o| {
            (o.depth - t.player_depth).abs() < t.near_field_half_width
                && (o.lateral - self.lateral).abs() < t.collision_radius
        });
        if hit {
            self.crashed = true;
            let score = self.score();
            log::info!("Slope crash at distance {:.2}, score {}", self.distance, score);
            events.push(GameEvent::GameOver { score });
        }

        let despawn = t.despawn_depth;
        self.obstacles.retain(|o| o.depth > despawn);
        events
    }

    /// Put an obstacle on the track directly
    pub fn push_obstacle(&mut self, lateral: f32, depth: f32, kind: ObstacleKind) {
        self.obstacles.push(Obstacle {
            lateral,
            depth,
            kind,
        });
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn lateral(&self) -> f32 {
        self.lateral
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn is_crashed(&self) -> bool {
        self.crashed
    }

    /// Camera shared by drawing and collision
    pub fn projection(&self) -> &Projection {
        &self.tuning.projection
    }

    pub fn render_view(&self) -> SlopeView {
        let t = &self.tuning;
        let projection = &t.projection;
        let player_at = projection.project(self.lateral, 0.0, t.player_depth);
        let player_half = projection.body_half_width(t.collision_radius, t.player_depth);
        let player = Sprite {
            pos: player_at.pos,
            half_width: player_half,
            height: player_half * 2.0,
            depth: t.player_depth,
            kind: None,
        };

        let mut visible: Vec<&Obstacle> = self
            .obstacles
            .iter()
            .filter(|o| o.depth > projection.near_clip)
            .collect();
        visible.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        let obstacles = visible
            .into_iter()
            .map(|o| {
                let at = projection.project(o.lateral, 0.0, o.depth);
                let half_width = projection.body_half_width(t.collision_radius, o.depth);
                Sprite {
                    pos: at.pos,
                    half_width,
                    height: half_width * 2.0 * o.kind.aspect(),
                    depth: o.depth,
                    kind: Some(o.kind),
                }
            })
            .collect();

        SlopeView {
            player,
            obstacles,
            horizon_y: projection.horizon_y(),
            ground_offset: (self.distance * 2.0).rem_euclid(1.0),
            score: self.score(),
            crashed: self.crashed,
        }
    }
}

impl Simulation for SlopeGame {
    fn game_id(&self) -> GameId {
        GameId::Slope
    }

    fn step(&mut self, now: f64) -> Vec<GameEvent> {
        SlopeGame::step(self, now)
    }

    fn apply_input(&mut self, input: InputSignal) {
        if let InputSignal::Lateral(lateral) = input {
            self.set_lateral_input(lateral);
        }
    }

    fn score(&self) -> u64 {
        (self.distance * self.tuning.score_scale).floor() as u64
    }

    fn is_over(&self) -> bool {
        self.crashed
    }
}
