//! Automatic placement of performers that joined the roster.
//!
//! Quick mode lays newcomers out on a two-row grid centered on the field,
//! probing sideways past anything already standing within the minimum
//! spacing. Careful mode places nobody.

use drillcraft_model::{PerformerId, PlacementMode, PositionMap, Settings, WorldPos, STEP_M};
use tracing::warn;

/// Minimum distance kept between auto-placed performers.
pub const PLACEMENT_SPACING_M: f64 = 2.0 * STEP_M;

/// Compute positions for `newcomers` given what `occupied` already holds.
///
/// Returned positions are snapped and inside the field. In careful mode
/// the result is empty.
pub fn auto_place(
    occupied: &PositionMap,
    newcomers: &[PerformerId],
    settings: &Settings,
) -> Vec<(PerformerId, WorldPos)> {
    if settings.placement_mode == PlacementMode::Careful || newcomers.is_empty() {
        return vec![];
    }

    let spacing = PLACEMENT_SPACING_M;
    let width = settings.field_width;
    let height = settings.field_height;
    let cols = newcomers.len().div_ceil(2);
    let start_x = width / 2.0 - (cols - 1) as f64 * spacing / 2.0;
    let rows_y = [height / 2.0 - spacing / 2.0, height / 2.0 + spacing / 2.0];
    let max_probes = probe_limit(settings);

    let mut taken: Vec<WorldPos> = occupied.values().copied().collect();
    let mut placed = Vec::with_capacity(newcomers.len());

    for (i, id) in newcomers.iter().enumerate() {
        let mut x = start_x + (i % cols) as f64 * spacing;
        let mut y = rows_y[i / cols];
        let mut candidate = settings.clamp_and_snap(WorldPos::new(x, y));
        let mut probes = 0usize;

        while is_crowded(&candidate, &taken, spacing) {
            if probes >= max_probes {
                warn!(performer = %id, "No free spot found, placing on top of others");
                break;
            }
            probes += 1;
            x += spacing;
            if x > width {
                x = spacing / 2.0;
                y += 2.0 * spacing;
                if y > height {
                    y = spacing / 2.0;
                }
            }
            candidate = settings.clamp_and_snap(WorldPos::new(x, y));
        }

        taken.push(candidate);
        placed.push((id.clone(), candidate));
    }

    placed
}

fn is_crowded(candidate: &WorldPos, taken: &[WorldPos], spacing: f64) -> bool {
    // Small tolerance so exactly one spacing apart counts as free.
    taken
        .iter()
        .any(|p| p.distance_to(candidate) < spacing - 1e-9)
}

/// Enough probes to visit every grid cell on the field once.
fn probe_limit(settings: &Settings) -> usize {
    let cols = (settings.field_width / PLACEMENT_SPACING_M).ceil().max(1.0) as usize + 1;
    let bands = (settings.field_height / (2.0 * PLACEMENT_SPACING_M))
        .ceil()
        .max(1.0) as usize
        + 1;
    cols * bands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<PerformerId> {
        (0..n).map(|i| PerformerId::new(format!("m{i}"))).collect()
    }

    #[test]
    fn test_two_rows_centered() {
        let settings = Settings::default();
        let placed = auto_place(&PositionMap::new(), &ids(4), &settings);
        assert_eq!(placed.len(), 4);
        let ys: Vec<f64> = placed.iter().map(|(_, p)| p.y).collect();
        assert!(ys[0] < ys[2]);
        assert_eq!(ys[0], ys[1]);
        let mean_x = placed.iter().map(|(_, p)| p.x).sum::<f64>() / 4.0;
        assert!((mean_x - 25.0).abs() <= STEP_M);
    }

    #[test]
    fn test_newcomers_do_not_overlap_existing() {
        let settings = Settings::default();
        let placed_once = auto_place(&PositionMap::new(), &ids(6), &settings);
        let occupied: PositionMap = placed_once.into_iter().collect();

        let newcomers = vec![PerformerId::from("late1"), PerformerId::from("late2")];
        let placed = auto_place(&occupied, &newcomers, &settings);
        for (_, p) in &placed {
            for q in occupied.values() {
                assert!(p.distance_to(q) >= PLACEMENT_SPACING_M - 1e-9);
            }
            assert!(settings.contains(p));
        }
    }

    #[test]
    fn test_careful_mode_places_nobody() {
        let settings = Settings {
            placement_mode: PlacementMode::Careful,
            ..Settings::default()
        };
        assert!(auto_place(&PositionMap::new(), &ids(3), &settings).is_empty());
    }

    #[test]
    fn test_crowded_field_terminates() {
        let settings = Settings {
            field_width: 2.0,
            field_height: 2.0,
            ..Settings::default()
        };
        let placed = auto_place(&PositionMap::new(), &ids(20), &settings);
        assert_eq!(placed.len(), 20);
        assert!(placed.iter().all(|(_, p)| settings.contains(p)));
    }
}
