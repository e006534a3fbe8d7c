//! Frame clock and fixed-step accumulator
//!
//! The host render loop owns the cadence; simulations only ever see
//! millisecond timestamps and derive their own deltas.

use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS};

/// Source of monotonically increasing frame timestamps (milliseconds)
pub trait Clock {
    fn advance(&mut self) -> f64;
}

/// Wall clock: `Instant` on native, `performance.now()` in the browser
pub struct SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
    last: f64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            start: std::time::Instant::now(),
            last: 0.0,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn advance(&mut self) -> f64 {
        // Never step backwards, even if the host timer does
        self.last = self.now_ms().max(self.last);
        self.last
    }
}

/// Synthetic clock for tests and headless runs
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: f64,
    step_ms: f64,
}

impl ManualClock {
    pub fn new(step_ms: f64) -> Self {
        Self {
            now: 0.0,
            step_ms: step_ms.max(0.0),
        }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Jump forward by an arbitrary amount (ignored if negative)
    pub fn skip(&mut self, ms: f64) -> f64 {
        self.now += ms.max(0.0);
        self.now
    }
}

impl Clock for ManualClock {
    fn advance(&mut self) -> f64 {
        self.now += self.step_ms;
        self.now
    }
}

/// Converts variable frame timestamps into a count of fixed ticks
#[derive(Debug, Clone)]
pub struct FrameTimer {
    tick_ms: f64,
    last: Option<f64>,
    accumulator: f64,
}

impl FrameTimer {
    pub fn new(tick_ms: f64) -> Self {
        Self {
            tick_ms,
            last: None,
            accumulator: 0.0,
        }
    }

    /// Feed the latest timestamp; returns how many fixed ticks to run.
    ///
    /// The first timestamp only primes the timer. Large gaps are clamped so a
    /// backgrounded tab does not fast-forward the game.
    pub fn accumulate(&mut self, now: f64) -> u32 {
        let Some(last) = self.last else {
            self.last = Some(now);
            return 0;
        };
        if now <= last {
            return 0;
        }
        self.last = Some(now);
        self.accumulator += (now - last).min(MAX_FRAME_MS);

        let mut steps = 0;
        while self.accumulator + 1e-9 >= self.tick_ms && steps < MAX_SUBSTEPS {
            self.accumulator -= self.tick_ms;
            steps += 1;
        }
        self.accumulator = self.accumulator.max(0.0);
        steps
    }

    pub fn tick_ms(&self) -> f64 {
        self.tick_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK_MS;

    #[test]
    fn test_manual_clock_is_monotonic() {
        let mut clock = ManualClock::new(16.0);
        let a = clock.advance();
        let b = clock.advance();
        assert!(b > a);
        assert_eq!(clock.skip(-50.0), b);
    }

    #[test]
    fn test_system_clock_never_decreases() {
        let mut clock = SystemClock::new();
        let mut last = clock.advance();
        for _ in 0..100 {
            let now = clock.advance();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_first_frame_primes() {
        let mut timer = FrameTimer::new(TICK_MS);
        assert_eq!(timer.accumulate(5000.0), 0);
        assert_eq!(timer.accumulate(5000.0 + TICK_MS), 1);
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut timer = FrameTimer::new(10.0);
        timer.accumulate(0.0);
        assert_eq!(timer.accumulate(6.0), 0);
        assert_eq!(timer.accumulate(12.0), 1);
        assert_eq!(timer.accumulate(30.0), 2);
    }

    #[test]
    fn test_large_gap_is_clamped() {
        let mut timer = FrameTimer::new(10.0);
        timer.accumulate(0.0);
        // 10 seconds away: clamped to MAX_FRAME_MS, then capped at MAX_SUBSTEPS
        let steps = timer.accumulate(10_000.0);
        assert!(steps <= MAX_SUBSTEPS);
        assert!(steps > 0);
    }

    #[test]
    fn test_time_going_backwards_is_ignored() {
        let mut timer = FrameTimer::new(10.0);
        timer.accumulate(100.0);
        assert_eq!(timer.accumulate(50.0), 0);
        assert_eq!(timer.accumulate(110.0), 1);
    }
}
