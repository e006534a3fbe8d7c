//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks
//! - Storage (LocalStorage on web, JSON file on native)
//! - Logger setup

pub mod storage;
pub mod time;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageStore;
pub use time::{Clock, FrameTimer, ManualClock, SystemClock};

/// Install the platform logger (safe to call more than once)
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Install the platform logger (safe to call more than once)
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
