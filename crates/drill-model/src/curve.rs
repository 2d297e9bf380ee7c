//! Curve bindings: performers pinned to parameters along a quadratic curve.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{quadratic_bezier, WorldPos};
use crate::performer::PerformerId;
use crate::set::SetId;

/// Binds performers of one set to parameters `t` in `[0, 1]` along a
/// quadratic Bézier defined by three control points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcBinding {
    /// The set whose base positions the curve drives.
    pub set_id: SetId,

    /// Control points `[P0, P1, P2]`.
    pub ctrl: [WorldPos; 3],

    /// Curve parameter per bound performer.
    pub params: HashMap<PerformerId, f64>,
}

impl ArcBinding {
    /// Point on the curve at parameter `t`.
    pub fn evaluate(&self, t: f64) -> WorldPos {
        quadratic_bezier(&self.ctrl[0], &self.ctrl[1], &self.ctrl[2], t)
    }

    /// Curve position of every bound performer.
    pub fn positions(&self) -> impl Iterator<Item = (&PerformerId, WorldPos)> + '_ {
        self.params.iter().map(|(id, t)| (id, self.evaluate(*t)))
    }

    /// Shift all control points by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.ctrl {
            *p = p.offset(dx, dy);
        }
    }
}
