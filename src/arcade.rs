//! Arcade session controller
//!
//! Owns whichever screen is up: the menu, one running game, or the
//! matchmaking sequence. The host feeds it frame timestamps and input
//! signals; it forwards them, resolves matchmaking into an online duel, and
//! hands terminal scores to the [`ScoreStore`].
//!
//! Scores reach the store only on a terminal event (snake/runner game over)
//! or when the player leaves a pong duel. Cancelling anything else records
//! nothing. After [`Arcade::close`] every operation is a no-op.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::highscores::{GameId, HighScores, ScoreStore};
use crate::settings::{GameMode, Settings};
use crate::sim::{
    GameEvent, InputSignal, MatchState, MatchStatus, PongGame, Simulation, SlopeGame, SnakeGame,
};
use crate::{Difficulty, Tuning};

/// The single simulation a session can be running
#[derive(Debug, Clone)]
pub enum ActiveGame {
    Snake(SnakeGame),
    Pong(PongGame),
    Slope(SlopeGame),
}

impl ActiveGame {
    pub fn as_sim(&self) -> &dyn Simulation {
        match self {
            ActiveGame::Snake(game) => game,
            ActiveGame::Pong(game) => game,
            ActiveGame::Slope(game) => game,
        }
    }

    pub fn as_sim_mut(&mut self) -> &mut dyn Simulation {
        match self {
            ActiveGame::Snake(game) => game,
            ActiveGame::Pong(game) => game,
            ActiveGame::Slope(game) => game,
        }
    }

    pub fn game_id(&self) -> GameId {
        self.as_sim().game_id()
    }
}

/// What the arcade is showing
#[derive(Debug, Clone)]
pub enum Screen {
    Menu,
    Playing(ActiveGame),
    Matchmaking(MatchState),
    /// Torn down; nothing runs again
    Closed,
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Menu => "ARCADE",
            Screen::Playing(ActiveGame::Snake(_)) => "SNAKE",
            Screen::Playing(ActiveGame::Pong(_)) => "PONG",
            Screen::Playing(ActiveGame::Slope(_)) => "SLOPE",
            Screen::Matchmaking(_) => "NETWORK",
            Screen::Closed => "CLOSED",
        }
    }
}

pub struct Arcade<S: ScoreStore> {
    store: S,
    /// Authoritative for this session even if the store rejects writes
    scores: HighScores,
    settings: Settings,
    tuning: Tuning,
    screen: Screen,
    seeds: Pcg32,
}

impl<S: ScoreStore> Arcade<S> {
    pub fn new(store: S, settings: Settings, tuning: Tuning) -> Self {
        let mut scores = HighScores::new();
        for game in GameId::ALL {
            scores.record(game, store.high_score(game));
        }
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!(
            "Arcade opened ({} / {}), seed {}",
            settings.mode.as_str(),
            settings.difficulty,
            seed
        );
        Self {
            store,
            scores,
            settings,
            tuning,
            screen: Screen::Menu,
            seeds: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn select_mode(&mut self, mode: GameMode) {
        if matches!(self.screen, Screen::Menu) {
            self.settings.mode = mode;
        }
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        if matches!(self.screen, Screen::Menu) {
            self.settings.difficulty = difficulty;
        }
    }

    /// Launch a solo game from the menu. Returns whether it started.
    pub fn start_game(&mut self, game: GameId) -> bool {
        if !matches!(self.screen, Screen::Menu) {
            return false;
        }
        if self.settings.mode == GameMode::Online {
            log::warn!("{} is solo only; online play goes through matchmaking", game);
            return false;
        }
        let seed = self.seeds.random();
        let difficulty = self.settings.difficulty;
        let active = match game {
            GameId::Snake => ActiveGame::Snake(SnakeGame::new(difficulty, &self.tuning.snake, seed)),
            GameId::Pong => ActiveGame::Pong(PongGame::local(difficulty, &self.tuning.pong, seed)),
            GameId::Slope => ActiveGame::Slope(SlopeGame::new(difficulty, &self.tuning.slope, seed)),
        };
        self.screen = Screen::Playing(active);
        true
    }

    /// Begin matchmaking for an online duel
    pub fn find_match(&mut self, now: f64) -> bool {
        if !matches!(self.screen, Screen::Menu) {
            return false;
        }
        self.settings.mode = GameMode::Online;
        let seed = self.seeds.random();
        self.screen = Screen::Matchmaking(MatchState::new(now, &self.tuning.matchmaking, seed));
        true
    }

    /// Abort matchmaking. The menu comes back on the next frame; nothing is recorded.
    pub fn cancel_match(&mut self) -> bool {
        match &mut self.screen {
            Screen::Matchmaking(state) => state.cancel(),
            _ => false,
        }
    }

    /// Route an input signal to the running game
    pub fn input(&mut self, signal: InputSignal) {
        if let Screen::Playing(game) = &mut self.screen {
            game.as_sim_mut().apply_input(signal);
        }
    }

    /// Drive one host frame
    pub fn frame(&mut self, now: f64) -> Vec<GameEvent> {
        match &mut self.screen {
            Screen::Playing(game) => {
                let id = game.game_id();
                let events = game.as_sim_mut().step(now);
                for event in &events {
                    if let GameEvent::GameOver { score } = event {
                        self.record(id, *score);
                    }
                }
                events
            }
            Screen::Matchmaking(state) => {
                match state.advance(now) {
                    MatchStatus::Ready => self.hand_off(),
                    MatchStatus::Cancelled => self.screen = Screen::Menu,
                    MatchStatus::InProgress(_) => {}
                }
                Vec::new()
            }
            Screen::Menu | Screen::Closed => Vec::new(),
        }
    }

    fn hand_off(&mut self) {
        let Screen::Matchmaking(state) = std::mem::replace(&mut self.screen, Screen::Menu) else {
            return;
        };
        match state.into_opponent() {
            Some(opponent) => {
                let seed = self.seeds.random();
                let game = PongGame::online(opponent, &self.tuning.pong, seed);
                self.screen = Screen::Playing(ActiveGame::Pong(game));
            }
            None => log::warn!("Matchmaking finished without an opponent"),
        }
    }

    /// Leave the current screen for the menu
    pub fn back_to_menu(&mut self) {
        if matches!(self.screen, Screen::Closed) {
            return;
        }
        self.leave();
        self.screen = Screen::Menu;
    }

    /// Tear everything down; no further frames or inputs have any effect
    pub fn close(&mut self) {
        if matches!(self.screen, Screen::Closed) {
            return;
        }
        self.leave();
        self.screen = Screen::Closed;
        log::info!("Arcade closed");
    }

    fn leave(&mut self) {
        match &mut self.screen {
            // A duel has no end of its own; leaving it is the result
            Screen::Playing(ActiveGame::Pong(game)) => {
                let score = game.score();
                self.record(GameId::Pong, score);
            }
            Screen::Matchmaking(state) => {
                state.cancel();
            }
            _ => {}
        }
    }

    fn record(&mut self, game: GameId, score: u64) {
        if self.scores.record(game, score) {
            log::info!("New {} high score: {}", game, score);
        }
        if let Err(e) = self.store.set_high_score_if_higher(game, score) {
            log::warn!("Failed to save {} high score: {}", game, e);
        }
    }

    pub fn high_score(&self, game: GameId) -> u64 {
        self.scores.get(game)
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.scores
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn active_game(&self) -> Option<&ActiveGame> {
        match &self.screen {
            Screen::Playing(game) => Some(game),
            _ => None,
        }
    }

    pub fn active_game_mut(&mut self) -> Option<&mut ActiveGame> {
        match &mut self.screen {
            Screen::Playing(game) => Some(game),
            _ => None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.screen, Screen::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Direction, LateralInput};
    use crate::Error;
    use glam::IVec2;

    /// Store whose writes always fail
    #[derive(Default)]
    struct BrokenStore {
        attempts: usize,
    }

    impl ScoreStore for BrokenStore {
        fn high_score(&self, _game: GameId) -> u64 {
            0
        }

        fn set_high_score_if_higher(&mut self, _game: GameId, _score: u64) -> crate::Result<bool> {
            self.attempts += 1;
            Err(Error::StorageUnavailable("disk full".into()))
        }
    }

    fn settings() -> Settings {
        Settings {
            seed: Some(42),
            ..Settings::default()
        }
    }

    fn arcade() -> Arcade<HighScores> {
        Arcade::new(HighScores::new(), settings(), Tuning::default())
    }

    /// Replace the running snake with a layout that eats once then bites itself
    fn doomed_snake(arcade: &mut Arcade<impl ScoreStore>) {
        let Some(ActiveGame::Snake(game)) = arcade.active_game_mut() else {
            panic!("snake not running");
        };
        let body = [
            IVec2::new(2, 2),
            IVec2::new(3, 2),
            IVec2::new(3, 3),
            IVec2::new(2, 3),
            IVec2::new(1, 3),
        ];
        *game = game
            .clone()
            .with_layout(&body, Direction::Left, IVec2::new(1, 2));
    }

    #[test]
    fn test_loads_existing_bests() {
        let store = HighScores {
            snake: 30,
            pong: 0,
            slope: 7,
        };
        let arcade = Arcade::new(store, settings(), Tuning::default());
        assert_eq!(arcade.high_score(GameId::Snake), 30);
        assert_eq!(arcade.high_score(GameId::Slope), 7);
        assert_eq!(arcade.screen().name(), "ARCADE");
    }

    #[test]
    fn test_start_game_only_from_menu() {
        let mut arcade = arcade();
        assert!(arcade.start_game(GameId::Snake));
        assert!(!arcade.start_game(GameId::Slope));
        assert_eq!(arcade.active_game().map(|g| g.game_id()), Some(GameId::Snake));
    }

    #[test]
    fn test_online_mode_blocks_solo_launch() {
        let mut arcade = arcade();
        arcade.select_mode(GameMode::Online);
        assert!(!arcade.start_game(GameId::Pong));
        assert!(matches!(arcade.screen(), Screen::Menu));
    }

    #[test]
    fn test_difficulty_only_changes_in_menu() {
        let mut arcade = arcade();
        arcade.select_difficulty(Difficulty::Hard);
        arcade.start_game(GameId::Slope);
        arcade.select_difficulty(Difficulty::Easy);
        assert_eq!(arcade.settings().difficulty, Difficulty::Hard);
        let Some(ActiveGame::Slope(game)) = arcade.active_game() else {
            panic!("runner not running");
        };
        assert_eq!(game.speed(), Difficulty::Hard.runner_speed());
    }

    #[test]
    fn test_snake_game_over_records_score() {
        let mut arcade = arcade();
        arcade.select_difficulty(Difficulty::Easy);
        arcade.start_game(GameId::Snake);
        doomed_snake(&mut arcade);

        arcade.frame(0.0);
        arcade.frame(151.0);
        arcade.input(InputSignal::Direction(Direction::Down));
        let events = arcade.frame(302.0);
        assert_eq!(events, vec![GameEvent::GameOver { score: 10 }]);
        assert_eq!(arcade.high_score(GameId::Snake), 10);
        assert_eq!(arcade.store().snake, 10);

        // Further frames do nothing and record nothing
        assert!(arcade.frame(1000.0).is_empty());
    }

    #[test]
    fn test_leaving_snake_mid_run_records_nothing() {
        let mut arcade = arcade();
        arcade.start_game(GameId::Snake);
        doomed_snake(&mut arcade);
        arcade.frame(0.0);
        arcade.frame(200.0);
        arcade.back_to_menu();
        assert_eq!(arcade.high_score(GameId::Snake), 0);
        assert!(matches!(arcade.screen(), Screen::Menu));
    }

    #[test]
    fn test_leaving_pong_records_current_score() {
        let mut arcade = arcade();
        arcade.start_game(GameId::Pong);
        let Some(ActiveGame::Pong(game)) = arcade.active_game_mut() else {
            panic!("pong not running");
        };
        game.set_player_paddle_y(200.0);
        game.set_ball(glam::Vec2::new(30.0, 200.0), glam::Vec2::new(-4.0, 0.0));
        game.tick();
        assert_eq!(game.score(), 10);

        arcade.back_to_menu();
        assert_eq!(arcade.high_score(GameId::Pong), 10);
    }

    #[test]
    fn test_runner_crash_records_score() {
        let tuning = Tuning {
            slope: crate::tuning::SlopeTuning {
                spawn_chance: 1.0,
                ..Default::default()
            },
            ..Tuning::default()
        };
        let mut arcade = Arcade::new(HighScores::new(), settings(), tuning);
        arcade.start_game(GameId::Slope);
        arcade.input(InputSignal::Lateral(LateralInput::Right));

        let mut now = 0.0;
        let mut final_score = None;
        while final_score.is_none() && now < 60_000.0 {
            for event in arcade.frame(now) {
                if let GameEvent::GameOver { score } = event {
                    final_score = Some(score);
                }
            }
            now += crate::consts::TICK_MS;
        }
        let score = final_score.expect("runner should crash");
        assert!(score > 0);
        assert_eq!(arcade.high_score(GameId::Slope), score);
    }

    #[test]
    fn test_store_failure_keeps_session_score() {
        let mut arcade = Arcade::new(BrokenStore::default(), settings(), Tuning::default());
        arcade.start_game(GameId::Snake);
        doomed_snake(&mut arcade);
        arcade.frame(0.0);
        arcade.frame(151.0);
        arcade.input(InputSignal::Direction(Direction::Down));
        arcade.frame(302.0);
        assert_eq!(arcade.store().attempts, 1);
        assert_eq!(arcade.high_score(GameId::Snake), 10);
    }

    #[test]
    fn test_cancelled_match_returns_to_menu_on_next_frame() {
        let mut arcade = arcade();
        arcade.find_match(0.0);
        arcade.frame(1000.0);
        assert!(arcade.cancel_match());

        let Screen::Matchmaking(state) = arcade.screen() else {
            panic!("matchmaking should still be showing");
        };
        assert_eq!(state.phase(), crate::sim::MatchPhase::Cancelled);

        assert!(arcade.frame(2000.0).is_empty());
        assert!(matches!(arcade.screen(), Screen::Menu));
        arcade.frame(10_000.0);
        assert!(arcade.active_game().is_none());
        assert_eq!(*arcade.store(), HighScores::new());
        assert!(!arcade.cancel_match());
    }

    #[test]
    fn test_match_cannot_be_cancelled_once_found() {
        let mut arcade = arcade();
        arcade.find_match(0.0);
        arcade.frame(4500.0);
        assert!(!arcade.cancel_match());
        arcade.frame(7000.0);
        assert!(matches!(arcade.active_game(), Some(ActiveGame::Pong(_))));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_selections_persist_across_sessions() {
        let path = std::env::temp_dir().join(format!(
            "neon_arcade_arcade_settings_{}.json",
            std::process::id()
        ));
        let mut arcade = arcade();
        arcade.select_difficulty(Difficulty::Extreme);
        arcade.select_mode(GameMode::Online);
        arcade.settings().save_to(&path).unwrap();

        let mut next = Arcade::new(HighScores::new(), Settings::load_from(&path), Tuning::default());
        assert_eq!(next.settings().difficulty, Difficulty::Extreme);
        assert_eq!(next.settings().mode, GameMode::Online);
        next.select_mode(GameMode::Solo);
        next.start_game(GameId::Slope);
        let Some(ActiveGame::Slope(game)) = next.active_game() else {
            panic!("runner not running");
        };
        assert_eq!(game.speed(), Difficulty::Extreme.runner_speed());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_close_stops_everything() {
        let mut arcade = arcade();
        arcade.find_match(0.0);
        arcade.close();
        assert!(arcade.is_closed());
        assert!(arcade.frame(100_000.0).is_empty());
        assert!(arcade.is_closed());
        assert!(!arcade.start_game(GameId::Snake));
        assert!(!arcade.find_match(0.0));
        arcade.back_to_menu();
        assert!(arcade.is_closed());
    }
}
