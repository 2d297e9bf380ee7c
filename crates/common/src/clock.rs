//! Count/time conversion and tick pacing for playback.
//!
//! The timeline is measured in counts (one count per beat). Playback
//! advances a continuous count from wall-clock deltas, so this module
//! provides:
//! - Tempo conversions between counts and seconds
//! - A tick clock that reports the elapsed time between ticks
//! - A rate controller that paces ticks to a target frequency

use std::time::{Duration, Instant};

/// Counts advanced per second at the given tempo.
pub fn counts_per_second(bpm: f64) -> f64 {
    bpm / 60.0
}

/// Seconds needed to cover `counts` at the given tempo.
pub fn count_to_secs(counts: f64, bpm: f64) -> f64 {
    let cps = counts_per_second(bpm);
    if cps <= 0.0 {
        return 0.0;
    }
    counts / cps
}

/// Counts covered in `secs` at the given tempo.
pub fn secs_to_count(secs: f64, bpm: f64) -> f64 {
    secs * counts_per_second(bpm)
}

/// Measures wall-clock deltas between successive playback ticks.
#[derive(Debug, Clone)]
pub struct TickClock {
    started: Instant,
    started_wall: String,
    last_tick: Option<Instant>,
}

impl TickClock {
    /// Create a clock anchored to now. No tick has happened yet.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            started_wall: chrono::Utc::now().to_rfc3339(),
            last_tick: None,
        }
    }

    /// Seconds since the previous tick. The first tick returns 0.0,
    /// which the playback engine treats as a no-op.
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// Same as [`TickClock::tick`] with an explicit instant.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let dt = match self.last_tick {
            Some(last) => now.saturating_duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last_tick = Some(now);
        dt
    }

    /// Forget the previous tick, e.g. after a pause, so the next tick
    /// does not jump by the paused duration.
    pub fn reset(&mut self) {
        self.last_tick = None;
    }

    /// Seconds since the clock was started.
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Wall-clock time the clock was started (RFC 3339).
    pub fn started_wall(&self) -> &str {
        &self.started_wall
    }
}

/// Tick pacing for the playback loop.
#[derive(Debug, Clone, Copy)]
pub struct RateController {
    target_interval_ns: u64,
}

impl RateController {
    /// Create a controller targeting the given Hz rate (at least 1 Hz).
    pub fn new(target_hz: u32) -> Self {
        Self {
            target_interval_ns: 1_000_000_000 / target_hz.max(1) as u64,
        }
    }

    /// Target interval, ready for a timer.
    pub fn interval(&self) -> Duration {
        Duration::from_nanos(self.target_interval_ns)
    }
}
