//! Position resolver and playback ticker.
//!
//! # Algorithm
//!
//! For each performer:
//! 1. **Gather** its keyframes: the base position of every set that has one
//!    (at the set's start count) plus every intermediate entry.
//! 2. **Bracket** the requested count: `prev` is the greatest key at or
//!    below it (or the smallest key when the count precedes all keys),
//!    `next` the smallest key at or above it (or `prev` past the end).
//! 3. **Interpolate** linearly with `ratio = (count - prev) / (next - prev)`
//!    clamped to `[0, 1]`; equal keys give `ratio = 0`.
//!
//! Performers with no keyframes are absent from the output.

use std::collections::{BTreeMap, HashMap};

use drillcraft_model::{DrillSet, PerformerId, WorldPos};

/// Default playback speed when no tempo is supplied.
pub const DEFAULT_COUNTS_PER_SECOND: f64 = 16.0;

/// Per-performer keyframe tracks, keyed by count.
pub type KeyframeTracks = HashMap<PerformerId, BTreeMap<u32, WorldPos>>;

/// Collect every performer's keyframes across the timeline.
///
/// Base positions take precedence: an intermediate entry at a count that is
/// some set's start never replaces that set's stored position.
pub fn keyframe_tracks(sets: &[DrillSet]) -> KeyframeTracks {
    let mut tracks: KeyframeTracks = HashMap::new();
    for set in sets {
        for (id, pos) in &set.positions {
            tracks
                .entry(id.clone())
                .or_default()
                .insert(set.start_count, *pos);
        }
    }
    for set in sets {
        for (count, map) in &set.positions_by_count {
            for (id, pos) in map {
                tracks
                    .entry(id.clone())
                    .or_default()
                    .entry(*count)
                    .or_insert(*pos);
            }
        }
    }
    tracks
}

/// Interpolated position on one track at a continuous count.
pub fn interpolate(track: &BTreeMap<u32, WorldPos>, count: f64) -> Option<WorldPos> {
    let (first_key, first_pos) = track.iter().next()?;

    let (prev_key, prev_pos) = if count >= 0.0 {
        let floor = count.floor().min(u32::MAX as f64) as u32;
        track
            .range(..=floor)
            .next_back()
            .unwrap_or((first_key, first_pos))
    } else {
        (first_key, first_pos)
    };

    let ceil = count.ceil().clamp(0.0, u32::MAX as f64) as u32;
    let (next_key, next_pos) = track
        .range(ceil..)
        .next()
        .unwrap_or((prev_key, prev_pos));

    let ratio = if next_key == prev_key {
        0.0
    } else {
        ((count - *prev_key as f64) / (*next_key as f64 - *prev_key as f64)).clamp(0.0, 1.0)
    };

    Some(WorldPos::lerp(prev_pos, next_pos, ratio))
}

/// Resolve every performer's position at `count`.
pub fn resolve(sets: &[DrillSet], count: f64) -> HashMap<PerformerId, WorldPos> {
    keyframe_tracks(sets)
        .into_iter()
        .filter_map(|(id, track)| interpolate(&track, count).map(|p| (id, p)))
        .collect()
}

/// Last playable count: the final set's start plus one phrase.
pub fn max_count(sets: &[DrillSet], phrase_length: u32) -> f64 {
    sets.iter()
        .map(|s| s.start_count)
        .max()
        .map(|last| last.saturating_add(phrase_length) as f64)
        .unwrap_or(0.0)
}

/// Playback state advanced by a periodic ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    current_count: f64,
    counts_per_second: f64,
    max_count: f64,
    playing: bool,
    /// Auto-pause point set by [`Playback::play_range`].
    range_end: Option<f64>,
}

impl Playback {
    pub fn new(counts_per_second: f64, max_count: f64) -> Self {
        Self {
            current_count: 0.0,
            counts_per_second,
            max_count: max_count.max(0.0),
            playing: false,
            range_end: None,
        }
    }

    /// Playback over a timeline at [`DEFAULT_COUNTS_PER_SECOND`].
    pub fn for_sets(sets: &[DrillSet], phrase_length: u32) -> Self {
        Self::new(DEFAULT_COUNTS_PER_SECOND, max_count(sets, phrase_length))
    }

    pub fn current_count(&self) -> f64 {
        self.current_count
    }

    pub fn max_count(&self) -> f64 {
        self.max_count
    }

    pub fn counts_per_second(&self) -> f64 {
        self.counts_per_second
    }

    pub fn set_counts_per_second(&mut self, counts_per_second: f64) {
        self.counts_per_second = counts_per_second;
    }

    /// Update the upper bound after the timeline changed.
    pub fn set_max_count(&mut self, max_count: f64) {
        self.max_count = max_count.max(0.0);
        self.current_count = self.current_count.clamp(0.0, self.max_count);
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.range_end = None;
    }

    /// Alias of [`Playback::play`]; resuming while playing is a no-op.
    pub fn resume(&mut self) {
        self.play();
    }

    /// Jump to `count`, clamped to `[0, max_count]`, and pause.
    pub fn seek(&mut self, count: f64) {
        self.current_count = count.clamp(0.0, self.max_count);
        self.pause();
    }

    /// Play from `start` and auto-pause at `end`. A range that is empty or
    /// reversed is widened to one count.
    pub fn play_range(&mut self, start: f64, end: f64) {
        let start = start.clamp(0.0, self.max_count);
        let end = if end <= start { start + 1.0 } else { end };
        self.current_count = start;
        self.range_end = Some(end.min(self.max_count));
        self.playing = true;
    }

    /// Advance by `dt` seconds. Returns the current count.
    ///
    /// Not playing or `dt == 0` leaves the state untouched. Reaching either
    /// bound (or the range end) clamps and pauses.
    pub fn tick(&mut self, dt: f64) -> f64 {
        if !self.playing || dt == 0.0 {
            return self.current_count;
        }

        self.current_count += self.counts_per_second * dt;

        if let Some(end) = self.range_end {
            if self.current_count >= end {
                self.current_count = end;
                self.pause();
            }
        }
        if self.current_count > self.max_count {
            self.current_count = self.max_count;
            self.pause();
        }
        if self.current_count < 0.0 {
            self.current_count = 0.0;
            self.pause();
        }
        self.current_count
    }

    /// Resolve the timeline at the current count.
    pub fn frame(&self, sets: &[DrillSet]) -> HashMap<PerformerId, WorldPos> {
        resolve(sets, self.current_count)
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTS_PER_SECOND, 0.0)
    }
}
