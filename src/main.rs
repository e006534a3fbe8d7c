//! Neon Arcade headless driver
//!
//! Plays every game with a scripted autopilot on a synthetic clock, then an
//! online duel through matchmaking. High scores and settings are kept in JSON files.
//!
//! Usage: `neon-arcade [scores.json] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use neon_arcade::consts::TICK_MS;
    use neon_arcade::platform::{Clock, JsonFileStore, ManualClock};
    use neon_arcade::sim::{Direction, GameEvent, InputSignal, LateralInput, Simulation};
    use neon_arcade::{ActiveGame, Arcade, GameId, ScoreStore};

    /// Longest a single autopilot run may last (simulated ms)
    const RUN_LIMIT_MS: f64 = 90_000.0;
    /// Pong has no natural end; leave after this long
    const DUEL_LENGTH_MS: f64 = 30_000.0;

    pub type Session = Arcade<JsonFileStore>;

    /// Head for the food, horizontal first
    fn steer_snake(game: &neon_arcade::sim::SnakeGame) -> Option<InputSignal> {
        let food = game.food()?;
        let head = game.head();
        let dir = if food.x > head.x {
            Direction::Right
        } else if food.x < head.x {
            Direction::Left
        } else if food.y > head.y {
            Direction::Down
        } else {
            Direction::Up
        };
        Some(InputSignal::Direction(dir))
    }

    /// Take the lane away from the nearest obstacle still ahead
    fn steer_runner(game: &neon_arcade::sim::SlopeGame) -> Option<InputSignal> {
        let nearest = game
            .obstacles()
            .iter()
            .filter(|o| o.depth > 0.0)
            .min_by(|a, b| a.depth.total_cmp(&b.depth))?;
        let input = if nearest.lateral > 0.0 {
            LateralInput::Left
        } else {
            LateralInput::Right
        };
        Some(InputSignal::Lateral(input))
    }

    fn pilot(game: &ActiveGame) -> Option<InputSignal> {
        match game {
            ActiveGame::Snake(snake) => steer_snake(snake),
            ActiveGame::Pong(pong) => Some(InputSignal::PointerY(pong.ball().pos.y)),
            ActiveGame::Slope(slope) => steer_runner(slope),
        }
    }

    /// Drive the running game until it ends or `limit_ms` passes.
    /// Returns the final score if the game ended on its own.
    fn play(arcade: &mut Session, clock: &mut ManualClock, limit_ms: f64) -> Option<u64> {
        let started = clock.now();
        arcade.frame(started);
        while clock.now() - started < limit_ms {
            let signal = arcade.active_game().and_then(pilot);
            if let Some(signal) = signal {
                arcade.input(signal);
            }
            for event in arcade.frame(clock.advance()) {
                if let GameEvent::GameOver { score } = event {
                    return Some(score);
                }
            }
        }
        None
    }

    fn play_solo(arcade: &mut Session, clock: &mut ManualClock, game: GameId) {
        if !arcade.start_game(game) {
            log::warn!("Could not start {}", game);
            return;
        }
        match play(arcade, clock, RUN_LIMIT_MS) {
            Some(score) => log::info!("{} finished with {}", game, score),
            None => log::info!("{} still running after the time limit", game),
        }
        if let Some(active) = arcade.active_game() {
            log::info!("{} score at exit: {}", game, active.as_sim().score());
        }
        arcade.back_to_menu();
    }

    fn play_online(arcade: &mut Session, clock: &mut ManualClock) {
        if !arcade.find_match(clock.now()) {
            return;
        }
        while arcade.active_game().is_none() && !arcade.is_closed() {
            arcade.frame(clock.advance());
            if clock.now() > RUN_LIMIT_MS * 10.0 {
                log::warn!("Matchmaking never resolved");
                arcade.back_to_menu();
                return;
            }
        }
        if let Some(ActiveGame::Pong(pong)) = arcade.active_game() {
            log::info!("Online duel vs {}", pong.opponent_name());
        }
        play(arcade, clock, DUEL_LENGTH_MS);
        arcade.back_to_menu();
    }

    pub fn run(arcade: &mut Session) {
        let mut clock = ManualClock::new(TICK_MS);
        arcade.select_mode(neon_arcade::GameMode::Solo);
        for game in GameId::ALL {
            play_solo(arcade, &mut clock, game);
        }
        arcade.select_mode(neon_arcade::GameMode::Online);
        play_online(arcade, &mut clock);
        arcade.close();

        for game in GameId::ALL {
            log::info!("High score {}: {}", game, arcade.store().high_score(game));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use neon_arcade::platform::{JsonFileStore, init_logging};
    use neon_arcade::{Arcade, Settings, Tuning};

    const DEFAULT_SCORES_PATH: &str = "neon_arcade_scores.json";
    const DEFAULT_SETTINGS_PATH: &str = "neon_arcade_settings.json";

    init_logging();
    log::info!("Neon Arcade (headless) starting...");

    let mut args = std::env::args().skip(1);
    let scores_path = args
        .next()
        .unwrap_or_else(|| DEFAULT_SCORES_PATH.to_string());
    let settings_path = PathBuf::from(
        args.next()
            .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string()),
    );

    let settings = Settings::load_from(&settings_path);
    let store = JsonFileStore::open(&scores_path);
    let mut arcade = Arcade::new(store, settings, Tuning::default());
    autopilot::run(&mut arcade);

    if let Err(e) = arcade.settings().save_to(&settings_path) {
        log::warn!("Failed to save settings to {}: {}", settings_path.display(), e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `neon_arcade::Arcade` directly
}
