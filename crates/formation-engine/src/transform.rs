//! Rotation and scaling of a selection about a center.
//!
//! A center equal to [`WorldPos::ORIGIN`] means "unspecified" and is replaced
//! by the centroid of the selected performers' current positions. Every
//! output goes through clamp/snap.
//!
//! Drag gestures that reissue a rotation on every pointer move should
//! capture a [`RotationBaseline`] at gesture start and rotate from it by the
//! cumulative angle, so floating-point error does not compound.

use std::collections::HashMap;

use drillcraft_common::{DrillError, DrillResult};
use drillcraft_model::{centroid, PerformerId, PositionMap, SetId, Settings, WorldPos};

/// Rotate selected performers by `angle` radians about `center`.
///
/// Returns the new positions of selected performers that have a current
/// position. Performers without one are skipped.
pub fn rotate(
    selected: &[PerformerId],
    positions: &PositionMap,
    center: WorldPos,
    angle: f64,
    settings: &Settings,
) -> DrillResult<PositionMap> {
    let center = resolve_center(selected, positions, center, "rotate")?;
    let (sin, cos) = angle.sin_cos();
    Ok(selected
        .iter()
        .filter_map(|id| positions.get(id).map(|p| (id, p)))
        .map(|(id, p)| {
            let dx = p.x - center.x;
            let dy = p.y - center.y;
            let raw = WorldPos::new(
                center.x + dx * cos - dy * sin,
                center.y + dx * sin + dy * cos,
            );
            (id.clone(), settings.clamp_and_snap(raw))
        })
        .collect())
}

/// Scale offsets of selected performers from `center`. `scale_y` defaults
/// to `scale_x`.
pub fn scale(
    selected: &[PerformerId],
    positions: &PositionMap,
    center: WorldPos,
    scale_x: f64,
    scale_y: Option<f64>,
    settings: &Settings,
) -> DrillResult<PositionMap> {
    let center = resolve_center(selected, positions, center, "scale")?;
    let sy = scale_y.unwrap_or(scale_x);
    Ok(selected
        .iter()
        .filter_map(|id| positions.get(id).map(|p| (id, p)))
        .map(|(id, p)| {
            let raw = WorldPos::new(
                center.x + (p.x - center.x) * scale_x,
                center.y + (p.y - center.y) * sy,
            );
            (id.clone(), settings.clamp_and_snap(raw))
        })
        .collect())
}

fn resolve_center(
    selected: &[PerformerId],
    positions: &PositionMap,
    center: WorldPos,
    operation: &str,
) -> DrillResult<WorldPos> {
    if selected.is_empty() {
        return Err(DrillError::empty_selection(operation));
    }
    if !center.is_origin() {
        return Ok(center);
    }
    centroid(selected.iter().filter_map(|id| positions.get(id)))
        .ok_or_else(|| DrillError::empty_selection(operation))
}

/// Snapshot taken at the start of a rotate gesture.
///
/// Owned by the interaction layer, not the store. Dropping it ends the
/// gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationBaseline {
    /// Set the snapshot was taken from. Only that set may receive it.
    pub set_id: SetId,
    /// Positions of the selected performers at gesture start.
    pub positions: PositionMap,
    /// Pivot, resolved once at capture.
    pub center: WorldPos,
    /// Total angle applied since capture, in radians.
    pub cumulative_angle: f64,
}

impl RotationBaseline {
    /// Capture the selected performers' positions. A sentinel `center` is
    /// resolved to their centroid now, so the pivot stays fixed while the
    /// gesture runs.
    pub fn capture(
        set_id: SetId,
        selected: &[PerformerId],
        positions: &PositionMap,
        center: WorldPos,
    ) -> DrillResult<Self> {
        let center = resolve_center(selected, positions, center, "rotate")?;
        let snapshot: HashMap<_, _> = selected
            .iter()
            .filter_map(|id| positions.get(id).map(|p| (id.clone(), *p)))
            .collect();
        Ok(Self {
            set_id,
            positions: snapshot,
            center,
            cumulative_angle: 0.0,
        })
    }

    /// Set the cumulative angle and return positions rotated from the
    /// snapshot.
    pub fn rotate_to(&mut self, angle: f64, settings: &Settings) -> PositionMap {
        self.cumulative_angle = angle;
        let ids: Vec<PerformerId> = self.positions.keys().cloned().collect();
        // Only an empty snapshot errors, and it has nothing to rotate.
        rotate(&ids, &self.positions, self.center, angle, settings).unwrap_or_default()
    }

    /// Add `delta` to the cumulative angle and rotate from the snapshot.
    pub fn rotate_by(&mut self, delta: f64, settings: &Settings) -> PositionMap {
        let angle = self.cumulative_angle + delta;
        self.rotate_to(angle, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drillcraft_model::SnapMode;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const FULL_TURN: f64 = 2.0 * PI;

    fn pid(s: &str) -> PerformerId {
        PerformerId::from(s)
    }

    fn free() -> Settings {
        Settings::with_snap(SnapMode::Free)
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let positions = PositionMap::from([(pid("a"), WorldPos::new(12.0, 10.0))]);
        let out = rotate(
            &[pid("a")],
            &positions,
            WorldPos::new(10.0, 10.0),
            FRAC_PI_2,
            &free(),
        )
        .unwrap();
        let p = out[&pid("a")];
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.y - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_sentinel_center_uses_centroid() {
        let positions = PositionMap::from([
            (pid("a"), WorldPos::new(10.0, 10.0)),
            (pid("b"), WorldPos::new(20.0, 10.0)),
        ]);
        let out = rotate(
            &[pid("a"), pid("b")],
            &positions,
            WorldPos::ORIGIN,
            PI,
            &free(),
        )
        .unwrap();
        assert!((out[&pid("a")].x - 20.0).abs() < 1e-9);
        assert!((out[&pid("b")].x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_non_uniform_and_clamped() {
        let positions = PositionMap::from([
            (pid("a"), WorldPos::new(20.0, 20.0)),
            (pid("b"), WorldPos::new(30.0, 20.0)),
        ]);
        let out = scale(
            &[pid("a"), pid("b")],
            &positions,
            WorldPos::new(25.0, 20.0),
            10.0,
            Some(1.0),
            &free(),
        )
        .unwrap();
        assert_eq!(out[&pid("a")], WorldPos::new(0.0, 20.0));
        assert_eq!(out[&pid("b")], WorldPos::new(50.0, 20.0));
    }

    #[test]
    fn test_empty_selection_errors() {
        let err = scale(&[], &PositionMap::new(), WorldPos::ORIGIN, 2.0, None, &free()).unwrap_err();
        assert!(matches!(err, DrillError::EmptySelection { .. }));
    }

    #[test]
    fn test_baseline_rotation_does_not_drift() {
        let ids = [pid("a"), pid("b"), pid("c")];
        let positions = PositionMap::from([
            (pid("a"), WorldPos::new(20.0, 20.0)),
            (pid("b"), WorldPos::new(24.0, 20.0)),
            (pid("c"), WorldPos::new(22.0, 23.0)),
        ]);
        let settings = free();
        let mut baseline =
            RotationBaseline::capture(SetId::from("s1"), &ids, &positions, WorldPos::ORIGIN)
                .unwrap();

        let steps = 1000;
        let mut out = PositionMap::new();
        for _ in 0..steps {
            out = baseline.rotate_by(FULL_TURN / steps as f64, &settings);
        }
        assert!((baseline.cumulative_angle - FULL_TURN).abs() < 1e-9);
        for id in &ids {
            assert!(out[id].distance_to(&positions[id]) < 1e-9);
        }
    }

    proptest! {
        #[test]
        fn prop_rotate_then_unrotate_is_identity(
            coords in proptest::collection::vec((10.0f64..40.0, 10.0f64..30.0), 1..8),
            angle in -0.5f64..0.5,
        ) {
            let ids: Vec<PerformerId> = (0..coords.len())
                .map(|i| PerformerId::new(format!("p{i}")))
                .collect();
            let positions: PositionMap = ids
                .iter()
                .cloned()
                .zip(coords.iter().map(|(x, y)| WorldPos::new(*x, *y)))
                .collect();
            let center = WorldPos::new(25.0, 20.0);
            let settings = free();
            let once = rotate(&ids, &positions, center, angle, &settings).unwrap();
            let back = rotate(&ids, &once, center, -angle, &settings).unwrap();
            for id in &ids {
                prop_assert!(back[id].distance_to(&positions[id]) < 1e-9);
            }
        }
    }
}
