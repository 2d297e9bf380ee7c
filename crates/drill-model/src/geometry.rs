//! Field coordinates and the snapping/clamping primitives.
//!
//! Every mutating operator in the engine funnels its output through
//! [`clamp_and_snap`], so a committed position is always on the grid
//! (unless snapping is free) and inside the field.

use serde::{Deserialize, Serialize};

use crate::settings::SnapMode;

/// One marching step in meters: 8 steps every 5 meters.
pub const STEP_M: f64 = 5.0 / 8.0;

/// A position on the field in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
}

impl WorldPos {
    /// The field origin. Transform operators read it as "no center given".
    pub const ORIGIN: WorldPos = WorldPos { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &WorldPos) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// This point shifted by `(dx, dy)`.
    pub fn offset(&self, dx: f64, dy: f64) -> WorldPos {
        WorldPos::new(self.x + dx, self.y + dy)
    }

    /// Linear interpolation between two points. `t` is not clamped.
    pub fn lerp(a: &WorldPos, b: &WorldPos, t: f64) -> WorldPos {
        WorldPos {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
        }
    }

    /// True for the exact origin sentinel.
    pub fn is_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Arithmetic mean of a point set. `None` when the set is empty.
pub fn centroid<'a>(points: impl IntoIterator<Item = &'a WorldPos>) -> Option<WorldPos> {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut n = 0usize;
    for p in points {
        sum_x += p.x;
        sum_y += p.y;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some(WorldPos::new(sum_x / n as f64, sum_y / n as f64))
}

/// Round each coordinate to the nearest grid multiple for the mode.
/// `SnapMode::Free` is the identity.
pub fn snap(pos: WorldPos, mode: SnapMode) -> WorldPos {
    match mode.step() {
        None => pos,
        Some(step) => WorldPos {
            x: (pos.x / step).round() * step,
            y: (pos.y / step).round() * step,
        },
    }
}

/// Coordinate-wise clamp into `[0, width] x [0, height]`.
pub fn clamp_to_field(pos: WorldPos, width: f64, height: f64) -> WorldPos {
    WorldPos {
        x: pos.x.clamp(0.0, width.max(0.0)),
        y: pos.y.clamp(0.0, height.max(0.0)),
    }
}

/// Snap, then clamp into the field.
pub fn clamp_and_snap(pos: WorldPos, mode: SnapMode, width: f64, height: f64) -> WorldPos {
    clamp_to_field(snap(pos, mode), width, height)
}

/// Evaluate the quadratic Bézier `(1-t)^2 P0 + 2(1-t)t P1 + t^2 P2`.
pub fn quadratic_bezier(p0: &WorldPos, p1: &WorldPos, p2: &WorldPos, t: f64) -> WorldPos {
    let u = 1.0 - t;
    WorldPos {
        x: u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
        y: u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
    }
}
