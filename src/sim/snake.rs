//! Grid snake on a torus
//!
//! Discrete state machine: one grid move per tick, ticks gated by an elapsed
//! time threshold of `base_interval / difficulty multiplier`. Leaving one edge
//! re-enters from the opposite edge; only the snake's own body is lethal.

use std::collections::{HashSet, VecDeque};

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{GameEvent, GameRng, InputSignal, Simulation};
use crate::Difficulty;
use crate::highscores::GameId;
use crate::tuning::SnakeTuning;

/// Axis-aligned heading (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit grid vector
    pub fn vector(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Read-only view for presenters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnakeSnapshot {
    /// Occupied cells, head first
    pub body: Vec<IVec2>,
    pub food: Option<IVec2>,
    pub score: u64,
    pub game_over: bool,
    pub grid_size: i32,
}

#[derive(Debug, Clone)]
pub struct SnakeGame {
    grid_size: i32,
    food_reward: u64,
    interval_ms: f64,
    /// Head first
    body: VecDeque<IVec2>,
    direction: Direction,
    pending: Direction,
    /// None only when the body covers the whole grid
    food: Option<IVec2>,
    score: u64,
    game_over: bool,
    last_tick: Option<f64>,
    rng: GameRng,
}

impl SnakeGame {
    pub fn new(difficulty: Difficulty, tuning: &SnakeTuning, seed: u64) -> Self {
        let grid_size = tuning.grid_size.max(2);
        let interval_ms = tuning.base_interval_ms / difficulty.multiplier() as f64;
        let head = IVec2::splat(grid_size / 2);
        let food = IVec2::splat(grid_size * 3 / 4);

        log::info!(
            "Snake started: {} ({:.1} ms/tick, {}x{} grid)",
            difficulty,
            interval_ms,
            grid_size,
            grid_size
        );

        Self {
            grid_size,
            food_reward: tuning.food_reward,
            interval_ms,
            body: VecDeque::from([head]),
            direction: Direction::Right,
            pending: Direction::Right,
            food: (food != head).then_some(food),
            score: 0,
            game_over: false,
            last_tick: None,
            rng: GameRng::new(seed),
        }
    }

    /// Replace the starting layout (body head first). Cells are wrapped onto the grid.
    pub fn with_layout(mut self, body: &[IVec2], direction: Direction, food: IVec2) -> Self {
        let body: VecDeque<IVec2> = body.iter().map(|c| self.wrap(*c)).collect();
        if !body.is_empty() {
            self.body = body;
        }
        self.direction = direction;
        self.pending = direction;
        let food = self.wrap(food);
        self.food = if self.body.contains(&food) {
            self.free_cell()
        } else {
            Some(food)
        };
        self
    }

    /// Request a turn for the next tick. Reversals are silently ignored.
    pub fn set_pending_direction(&mut self, dir: Direction) {
        if dir != self.direction.opposite() {
            self.pending = dir;
        }
    }

    /// Advance to `now` (ms). Runs at most one grid tick per call, once more
    /// than one interval has elapsed since the previous tick.
    pub fn step(&mut self, now: f64) -> Vec<GameEvent> {
        if self.game_over {
            return Vec::new();
        }
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return Vec::new();
        };
        if now - last > self.interval_ms {
            self.last_tick = Some(now);
            self.tick()
        } else {
            Vec::new()
        }
    }

    /// Perform exactly one grid move
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.game_over {
            return events;
        }

        self.direction = self.pending;
        let head = self.wrap(self.head() + self.direction.vector());

        if self.body.contains(&head) {
            self.game_over = true;
            log::info!("Snake collided with itself, final score {}", self.score);
            events.push(GameEvent::GameOver { score: self.score });
            return events;
        }

        self.body.push_front(head);
        if self.food == Some(head) {
            self.score += self.food_reward;
            self.food = self.free_cell();
            log::debug!("Food eaten, score {}, next food {:?}", self.score, self.food);
            events.push(GameEvent::FoodEaten { score: self.score });
        } else {
            self.body.pop_back();
        }
        events
    }

    pub fn head(&self) -> IVec2 {
        self.body[0]
    }

    pub fn body(&self) -> impl Iterator<Item = &IVec2> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    pub fn food(&self) -> Option<IVec2> {
        self.food
    }

    pub fn grid_size(&self) -> i32 {
        self.grid_size
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn snapshot(&self) -> SnakeSnapshot {
        SnakeSnapshot {
            body: self.body.iter().copied().collect(),
            food: self.food,
            score: self.score,
            game_over: self.game_over,
            grid_size: self.grid_size,
        }
    }

    fn wrap(&self, cell: IVec2) -> IVec2 {
        IVec2::new(
            cell.x.rem_euclid(self.grid_size),
            cell.y.rem_euclid(self.grid_size),
        )
    }

    /// Uniform pick from the cells the body does not cover
    fn free_cell(&mut self) -> Option<IVec2> {
        let occupied: HashSet<IVec2> = self.body.iter().copied().collect();
        let free: Vec<IVec2> = (0..self.grid_size)
            .flat_map(|y| (0..self.grid_size).map(move |x| IVec2::new(x, y)))
            .filter(|c| !occupied.contains(c))
            .collect();
        if free.is_empty() {
            return None;
        }
        let idx = self.rng.0.random_range(0..free.len());
        Some(free[idx])
    }
}

impl Simulation for SnakeGame {
    fn game_id(&self) -> GameId {
        GameId::Snake
    }

    fn step(&mut self, now: f64) -> Vec<GameEvent> {
        SnakeGame::step(self, now)
    }

    fn apply_input(&mut self, input: InputSignal) {
        if let InputSignal::Direction(dir) = input {
            self.set_pending_direction(dir);
        }
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn is_over(&self) -> bool {
        self.game_over
    }
}
