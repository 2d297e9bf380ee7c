//! Parametric shape generators and centroid-anchored application.
//!
//! Generators are purely geometric: they return `n` points in generation
//! order and know nothing about performers, snapping or field bounds.
//! [`apply_shape`] maps point `i` onto the `i`-th selected performer and
//! translates the whole shape so its centroid sits on the selection's
//! current centroid.

use drillcraft_common::{DrillError, DrillResult};
use drillcraft_model::{centroid, PerformerId, PositionMap, Settings, WorldPos};
use std::f64::consts::TAU;

/// Default spacing of [`Shape::Box`] in meters.
pub const DEFAULT_BOX_SPACING: f64 = 1.5;

/// Default number of turns of [`Shape::Spiral`].
pub const DEFAULT_SPIRAL_TURNS: f64 = 2.0;

/// Margin kept from the side lines by [`line`].
pub const LINE_MARGIN_M: f64 = 5.0;

/// A parametric layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Evenly spaced on a circle, first point at `start_angle` radians.
    Circle { radius: f64, start_angle: f64 },
    /// Row-major grid stretched over `width x height`.
    Rectangle { width: f64, height: f64 },
    /// Archimedean-style spiral with compressed early turns.
    Spiral { max_radius: f64, turns: f64 },
    /// Dense grid at fixed `spacing`. `width`/`height` are nominal only.
    Box {
        width: f64,
        height: f64,
        spacing: f64,
    },
}

impl Shape {
    pub fn circle(radius: f64) -> Self {
        Self::Circle {
            radius,
            start_angle: 0.0,
        }
    }

    pub fn spiral(max_radius: f64) -> Self {
        Self::Spiral {
            max_radius,
            turns: DEFAULT_SPIRAL_TURNS,
        }
    }

    pub fn boxed(width: f64, height: f64) -> Self {
        Self::Box {
            width,
            height,
            spacing: DEFAULT_BOX_SPACING,
        }
    }

    /// Generate `n` points around `center`.
    pub fn generate(&self, center: WorldPos, n: usize) -> Vec<WorldPos> {
        match *self {
            Self::Circle {
                radius,
                start_angle,
            } => circle(center, radius, n, start_angle),
            Self::Rectangle { width, height } => rectangle(center, width, height, n),
            Self::Spiral { max_radius, turns } => spiral(center, max_radius, n, turns),
            Self::Box {
                width,
                height,
                spacing,
            } => box_grid(center, width, height, n, spacing),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle { .. } => "circle",
            Self::Rectangle { .. } => "rectangle",
            Self::Spiral { .. } => "spiral",
            Self::Box { .. } => "box",
        }
    }
}

/// `n` points on a circle at angles `start_angle + 2πi/n`.
pub fn circle(center: WorldPos, radius: f64, n: usize, start_angle: f64) -> Vec<WorldPos> {
    match n {
        0 => vec![],
        1 => vec![center],
        _ => {
            let step = TAU / n as f64;
            (0..n)
                .map(|i| {
                    let angle = start_angle + i as f64 * step;
                    WorldPos::new(
                        center.x + radius * angle.cos(),
                        center.y + radius * angle.sin(),
                    )
                })
                .collect()
        }
    }
}

/// Grid with `ceil(sqrt(n))` columns spread over `width x height`,
/// filled row by row and stopping at `n`.
pub fn rectangle(center: WorldPos, width: f64, height: f64, n: usize) -> Vec<WorldPos> {
    match n {
        0 => vec![],
        1 => vec![center],
        _ => {
            let (cols, rows) = grid_dims(n);
            let start_x = center.x - width / 2.0;
            let start_y = center.y - height / 2.0;
            let col_gap = width / (cols - 1).max(1) as f64;
            let row_gap = height / (rows - 1).max(1) as f64;
            grid_cells(n, cols)
                .map(|(row, col)| {
                    WorldPos::new(
                        start_x + col as f64 * col_gap,
                        start_y + row as f64 * row_gap,
                    )
                })
                .collect()
        }
    }
}

/// Spiral from the center outwards. Point `i` sits at `t = i/(n-1)`,
/// angle `t * turns * 2π`, radius `max_radius * t / sqrt(1 + turns²)`.
pub fn spiral(center: WorldPos, max_radius: f64, n: usize, turns: f64) -> Vec<WorldPos> {
    match n {
        0 => vec![],
        1 => vec![center],
        _ => {
            let denom = (1.0 + turns * turns).sqrt();
            (0..n)
                .map(|i| {
                    let t = i as f64 / (n - 1) as f64;
                    let angle = t * turns * TAU;
                    let r = max_radius * t / denom;
                    WorldPos::new(center.x + r * angle.cos(), center.y + r * angle.sin())
                })
                .collect()
        }
    }
}

/// Fixed-spacing grid centered on `center`. The nominal `width`/`height`
/// do not affect the result.
pub fn box_grid(
    center: WorldPos,
    _width: f64,
    _height: f64,
    n: usize,
    spacing: f64,
) -> Vec<WorldPos> {
    match n {
        0 => vec![],
        1 => vec![center],
        _ => {
            let (cols, rows) = grid_dims(n);
            let start_x = center.x - (cols - 1) as f64 * spacing / 2.0;
            let start_y = center.y - (rows - 1) as f64 * spacing / 2.0;
            grid_cells(n, cols)
                .map(|(row, col)| {
                    WorldPos::new(
                        start_x + col as f64 * spacing,
                        start_y + row as f64 * spacing,
                    )
                })
                .collect()
        }
    }
}

/// `n` targets on a horizontal line across the field, `LINE_MARGIN_M` in
/// from each side line, at half the field height.
pub fn line(n: usize, settings: &Settings) -> Vec<WorldPos> {
    let start_x = LINE_MARGIN_M;
    let end_x = settings.field_width - LINE_MARGIN_M;
    let y = settings.field_height / 2.0;
    let gap = if n > 1 {
        (end_x - start_x) / (n - 1) as f64
    } else {
        0.0
    };
    (0..n)
        .map(|i| WorldPos::new(start_x + gap * i as f64, y))
        .collect()
}

/// Place `points` onto `selected` (point `i` to `selected[i]`), translated
/// so the shape's centroid lands on the selection's current centroid.
///
/// Returns only the new positions of performers that received a point;
/// callers merge them and apply clamp/snap. Selected performers without a
/// current position still receive a point but do not contribute to the
/// anchor centroid.
pub fn apply_shape(
    selected: &[PerformerId],
    points: &[WorldPos],
    current: &PositionMap,
) -> DrillResult<PositionMap> {
    if selected.is_empty() {
        return Err(DrillError::empty_selection("arrange"));
    }

    let Some(anchor) = centroid(selected.iter().filter_map(|id| current.get(id))) else {
        return Err(DrillError::empty_selection("arrange"));
    };
    let Some(shape_center) = centroid(points) else {
        return Ok(PositionMap::new());
    };

    let dx = anchor.x - shape_center.x;
    let dy = anchor.y - shape_center.y;

    Ok(selected
        .iter()
        .zip(points)
        .map(|(id, p)| (id.clone(), p.offset(dx, dy)))
        .collect())
}

fn grid_dims(n: usize) -> (usize, usize) {
    let cols = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);
    (cols, rows)
}

fn grid_cells(n: usize, cols: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).map(move |i| (i / cols, i % cols))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pid(s: &str) -> PerformerId {
        PerformerId::from(s)
    }

    #[test]
    fn test_degenerate_counts() {
        let c = WorldPos::new(25.0, 20.0);
        for shape in [
            Shape::circle(5.0),
            Shape::Rectangle {
                width: 10.0,
                height: 6.0,
            },
            Shape::spiral(8.0),
            Shape::boxed(10.0, 10.0),
        ] {
            assert!(shape.generate(c, 0).is_empty(), "{}", shape.name());
            assert_eq!(shape.generate(c, 1), vec![c], "{}", shape.name());
        }
    }

    #[test]
    fn test_rectangle_grid_layout() {
        let pts = rectangle(WorldPos::new(10.0, 10.0), 8.0, 4.0, 5);
        // 3 columns, 2 rows
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], WorldPos::new(6.0, 8.0));
        assert_eq!(pts[2], WorldPos::new(14.0, 8.0));
        assert_eq!(pts[3], WorldPos::new(6.0, 12.0));
        assert_eq!(pts[4], WorldPos::new(10.0, 12.0));
    }

    #[test]
    fn test_box_uses_fixed_spacing() {
        let pts = box_grid(WorldPos::new(10.0, 10.0), 100.0, 100.0, 4, 1.5);
        assert_eq!(pts.len(), 4);
        assert!((pts[0].x - 9.25).abs() < 1e-9);
        assert!((pts[1].x - pts[0].x - 1.5).abs() < 1e-9);
        assert!((pts[2].y - pts[0].y - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_spiral_ends_inside_max_radius() {
        let c = WorldPos::new(0.0, 0.0);
        let pts = spiral(c, 10.0, 9, 2.0);
        assert_eq!(pts[0], c);
        let last = pts[8].distance_to(&c);
        assert!((last - 10.0 / 5f64.sqrt()).abs() < 1e-9);
        assert!(pts.iter().all(|p| p.distance_to(&c) <= 10.0));
    }

    #[test]
    fn test_line_spans_field() {
        let settings = Settings::default();
        let pts = line(3, &settings);
        assert_eq!(pts[0], WorldPos::new(5.0, 20.0));
        assert_eq!(pts[1], WorldPos::new(25.0, 20.0));
        assert_eq!(pts[2], WorldPos::new(45.0, 20.0));
        assert_eq!(line(1, &settings), vec![WorldPos::new(5.0, 20.0)]);
    }

    #[test]
    fn test_apply_shape_empty_selection() {
        let err = apply_shape(&[], &[WorldPos::new(1.0, 1.0)], &PositionMap::new()).unwrap_err();
        assert!(matches!(err, DrillError::EmptySelection { .. }));
    }

    #[test]
    fn test_apply_shape_maps_in_selection_order() {
        let current = PositionMap::from([
            (pid("b"), WorldPos::new(0.0, 0.0)),
            (pid("a"), WorldPos::new(10.0, 0.0)),
        ]);
        let pts = [WorldPos::new(100.0, 0.0), WorldPos::new(110.0, 0.0)];
        let out = apply_shape(&[pid("b"), pid("a")], &pts, &current).unwrap();
        assert_eq!(out[&pid("b")], WorldPos::new(0.0, 0.0));
        assert_eq!(out[&pid("a")], WorldPos::new(10.0, 0.0));
    }

    proptest! {
        #[test]
        fn prop_circle_points_on_radius(
            n in 2usize..40,
            radius in 0.5f64..20.0,
            cx in 0.0f64..50.0,
            cy in 0.0f64..40.0,
        ) {
            let c = WorldPos::new(cx, cy);
            let pts = circle(c, radius, n, 0.0);
            prop_assert_eq!(pts.len(), n);
            for (i, p) in pts.iter().enumerate() {
                prop_assert!((p.distance_to(&c) - radius).abs() < 1e-9);
                let next = pts[(i + 1) % n];
                let a0 = (p.y - cy).atan2(p.x - cx);
                let a1 = (next.y - cy).atan2(next.x - cx);
                let gap = (a1 - a0).rem_euclid(TAU);
                prop_assert!((gap - TAU / n as f64).abs() < 1e-6);
            }
        }

        #[test]
        fn prop_apply_shape_keeps_centroid(
            coords in proptest::collection::vec((0.0f64..50.0, 0.0f64..40.0), 1..12),
            radius in 0.5f64..10.0,
        ) {
            let ids: Vec<PerformerId> = (0..coords.len())
                .map(|i| PerformerId::new(format!("p{i}")))
                .collect();
            let current: PositionMap = ids
                .iter()
                .cloned()
                .zip(coords.iter().map(|(x, y)| WorldPos::new(*x, *y)))
                .collect();
            let before = centroid(current.values()).unwrap();
            let pts = circle(WorldPos::ORIGIN, radius, ids.len(), 0.0);
            let out = apply_shape(&ids, &pts, &current).unwrap();
            let after = centroid(out.values()).unwrap();
            prop_assert!((after.x - before.x).abs() < 1e-9);
            prop_assert!((after.y - before.y).abs() < 1e-9);
        }
    }
}
