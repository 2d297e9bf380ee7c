//! Curve binding: a small state machine over [`TimelineStore`].
//!
//! `store.arc()` is `None` while inactive. [`TimelineStore::start_curve`]
//! binds performers and writes their curve positions immediately; every
//! control-point edit re-evaluates them. Curve positions are written as
//! evaluated, without clamp/snap, so they can land off-grid or off-field.

use std::collections::HashMap;

use drillcraft_common::{DrillError, DrillResult};
use drillcraft_model::{ArcBinding, PerformerId, Settings, WorldPos};
use tracing::debug;

use crate::store::TimelineStore;

/// Default control points around `center`: endpoints 10 m to either side,
/// apex 8 m towards the front.
pub fn default_control_points(center: WorldPos) -> [WorldPos; 3] {
    [
        center.offset(-10.0, 0.0),
        center.offset(0.0, -8.0),
        center.offset(10.0, 0.0),
    ]
}

/// Evenly spaced parameters over `[0, 1]`, assigned in lexicographic id
/// order. A single performer gets `t = 0`.
pub fn curve_params(ids: &[PerformerId]) -> HashMap<PerformerId, f64> {
    let mut sorted: Vec<&PerformerId> = ids.iter().collect();
    sorted.sort();
    sorted.dedup();
    let n = sorted.len();
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, id)| {
            let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
            (id.clone(), t)
        })
        .collect()
}

impl TimelineStore {
    /// Bind the selection (or the whole roster when nothing is selected)
    /// to a fresh curve in the active set.
    pub fn start_curve(&mut self, settings: &Settings) -> DrillResult<()> {
        let idx = self.active_index()?;
        let targets: Vec<PerformerId> = if !self.selection.is_empty() {
            self.selection.ids().to_vec()
        } else if let Some(roster) = self.roster() {
            roster.to_vec()
        } else {
            self.sets[idx].positions.keys().cloned().collect()
        };
        if targets.is_empty() {
            return Err(DrillError::empty_selection("curve"));
        }

        let binding = ArcBinding {
            set_id: self.sets[idx].id.clone(),
            ctrl: default_control_points(settings.field_center()),
            params: curve_params(&targets),
        };
        debug!(set = %binding.set_id, performers = binding.params.len(), "Started curve");
        self.arc = Some(binding);
        self.apply_curve();
        Ok(())
    }

    /// Replace control point `index` (0..3) and re-evaluate.
    pub fn update_control_point(&mut self, index: usize, pos: WorldPos) -> DrillResult<()> {
        let arc = self.bound_arc()?;
        let slot = arc
            .ctrl
            .get_mut(index)
            .ok_or(DrillError::InvalidControlPoint { index })?;
        *slot = pos;
        self.apply_curve();
        Ok(())
    }

    /// Translate all control points and re-evaluate.
    pub fn move_curve_group(&mut self, dx: f64, dy: f64) -> DrillResult<()> {
        self.bound_arc()?.translate(dx, dy);
        self.apply_curve();
        Ok(())
    }

    /// End curve editing. Positions already written stay.
    pub fn clear_curve(&mut self) {
        self.arc = None;
    }

    /// The binding, if it belongs to the active set.
    fn bound_arc(&mut self) -> DrillResult<&mut ArcBinding> {
        let active = self.active.clone();
        match self.arc.as_mut() {
            Some(arc) if Some(&arc.set_id) == active.as_ref() => Ok(arc),
            _ => Err(DrillError::CurveInactive),
        }
    }

    fn apply_curve(&mut self) {
        let Some(arc) = &self.arc else { return };
        let Some(set) = self.sets.iter_mut().find(|s| s.id == arc.set_id) else {
            self.arc = None;
            return;
        };
        for (id, pos) in arc.positions() {
            set.positions.insert(id.clone(), pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drillcraft_model::{DrillSet, SetId};

    fn pid(s: &str) -> PerformerId {
        PerformerId::from(s)
    }

    fn store() -> TimelineStore {
        let mut set = DrillSet::new(SetId::from("a"), 0);
        set.positions.insert(pid("b"), WorldPos::new(1.0, 1.0));
        set.positions.insert(pid("a"), WorldPos::new(2.0, 2.0));
        set.positions.insert(pid("c"), WorldPos::new(3.0, 3.0));
        let mut store = TimelineStore::new();
        store.restore_state(
            vec![set, DrillSet::new(SetId::from("z"), 16)],
            vec![],
            None,
        );
        store
    }

    #[test]
    fn test_params_sorted_and_even() {
        let params = curve_params(&[pid("c"), pid("a"), pid("b")]);
        assert_eq!(params[&pid("a")], 0.0);
        assert_eq!(params[&pid("b")], 0.5);
        assert_eq!(params[&pid("c")], 1.0);
        assert_eq!(curve_params(&[pid("solo")])[&pid("solo")], 0.0);
    }

    #[test]
    fn test_start_writes_curve_positions() {
        let mut store = store();
        store
            .selection_mut()
            .select_bulk(vec![pid("c"), pid("a")]);
        store.start_curve(&Settings::default()).unwrap();

        let set = store.active_set().unwrap();
        assert_eq!(set.position(&pid("a")), Some(&WorldPos::new(15.0, 20.0)));
        assert_eq!(set.position(&pid("c")), Some(&WorldPos::new(35.0, 20.0)));
        assert_eq!(set.position(&pid("b")), Some(&WorldPos::new(1.0, 1.0)));
    }

    #[test]
    fn test_control_point_edits_reevaluate() {
        let mut store = store();
        store.start_curve(&Settings::default()).unwrap();
        assert_eq!(store.arc().unwrap().params.len(), 3);

        store
            .update_control_point(1, WorldPos::new(25.0, 30.0))
            .unwrap();
        let mid = store.active_set().unwrap().position(&pid("b")).copied().unwrap();
        assert!((mid.x - 25.0).abs() < 1e-9);
        assert!((mid.y - 25.0).abs() < 1e-9);

        store.move_curve_group(1.0, -2.0).unwrap();
        let moved = store.active_set().unwrap().position(&pid("b")).copied().unwrap();
        assert!((moved.x - 26.0).abs() < 1e-9);
        assert!((moved.y - 23.0).abs() < 1e-9);

        let err = store.update_control_point(3, WorldPos::ORIGIN).unwrap_err();
        assert!(matches!(err, DrillError::InvalidControlPoint { index: 3 }));
    }

    #[test]
    fn test_curve_positions_bypass_field_clamp() {
        let mut store = store();
        store.start_curve(&Settings::default()).unwrap();
        store.update_control_point(0, WorldPos::new(-5.0, 0.0)).unwrap();
        let first = store.active_set().unwrap().position(&pid("a")).copied().unwrap();
        assert_eq!(first, WorldPos::new(-5.0, 0.0));
    }

    #[test]
    fn test_switching_set_ends_curve() {
        let mut store = store();
        store.start_curve(&Settings::default()).unwrap();
        store.set_active(&SetId::from("z")).unwrap();
        assert!(store.arc().is_none());
        assert!(matches!(
            store.move_curve_group(1.0, 1.0),
            Err(DrillError::CurveInactive)
        ));
    }

    #[test]
    fn test_clear_keeps_positions() {
        let mut store = store();
        store.start_curve(&Settings::default()).unwrap();
        let before = store.active_set().unwrap().positions.clone();
        store.clear_curve();
        assert!(store.arc().is_none());
        assert_eq!(store.active_set().unwrap().positions, before);
    }
}
