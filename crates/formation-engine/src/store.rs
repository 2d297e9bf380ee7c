//! The timeline store: sets, the active set, selection and curve binding.
//!
//! The store is an explicitly owned object; every operator takes it by
//! `&mut self` and the field settings by reference, so nothing is ambient
//! and settings are never cached.
//!
//! Invariants held after every public call:
//! - `sets` is sorted ascending by start count and named "Set 1..N" in
//!   that order.
//! - `by_count` maps each start count to the ids anchored there. Only
//!   [`TimelineStore::duplicate`] and [`TimelineStore::restore_state`] can
//!   leave more than one owner.
//! - Every intermediate keyframe belongs to the set whose
//!   `[start, next start)` range holds its count, and never sits on a
//!   start count.
//! - Every failing operator returns before its first write.

use std::collections::{HashMap, HashSet};

use drillcraft_common::{DrillError, DrillResult};
use drillcraft_model::{ArcBinding, DrillDocument, DrillSet, PerformerId, SetId, Settings, WorldPos};
use tracing::{debug, warn};

use crate::placement::auto_place;
use crate::resolver;
use crate::selection::Selection;
use crate::shapes::{self, Shape};
use crate::transform::{self, RotationBaseline};

/// Direction for [`TimelineStore::reorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the start of the timeline.
    Earlier,
    /// Towards the end of the timeline.
    Later,
}

/// Copied positions of selected performers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionClipboard {
    /// Entries in selection order.
    pub entries: Vec<(PerformerId, WorldPos)>,
}

impl PositionClipboard {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Owner of the formation timeline.
#[derive(Debug, Clone, Default)]
pub struct TimelineStore {
    pub(crate) sets: Vec<DrillSet>,
    by_count: HashMap<u32, Vec<SetId>>,
    pub(crate) active: Option<SetId>,
    pub(crate) selection: Selection,
    pub(crate) arc: Option<ArcBinding>,
    /// Last roster seen by [`TimelineStore::sync_roster`]. `None` until the
    /// first sync, in which case no filtering happens.
    roster: Option<Vec<PerformerId>>,
    next_seq: u64,
}

impl TimelineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate from a drill document: the roster first, then the full state.
    pub fn from_document(doc: &DrillDocument) -> Self {
        let mut store = Self::new();
        store.roster = Some(doc.performers.iter().map(|p| p.id.clone()).collect());
        store.restore_state(
            doc.sets.clone(),
            doc.selection.clone(),
            doc.active_set_id.clone(),
        );
        store
    }

    /// Copy timeline, selection and active set back into a document.
    pub fn write_into(&self, doc: &mut DrillDocument) {
        doc.sets = self.sets.clone();
        doc.selection = self.selection.ids().to_vec();
        doc.active_set_id = self.active.clone();
        doc.touch();
    }

    // ---- accessors -------------------------------------------------------

    /// Sets in timeline order.
    pub fn sets(&self) -> &[DrillSet] {
        &self.sets
    }

    pub fn set(&self, id: &SetId) -> Option<&DrillSet> {
        self.sets.iter().find(|s| &s.id == id)
    }

    /// Ids of sets anchored at `count`.
    pub fn owners_of(&self, count: u32) -> &[SetId] {
        self.by_count.get(&count).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn active_set_id(&self) -> Option<&SetId> {
        self.active.as_ref()
    }

    pub fn active_set(&self) -> Option<&DrillSet> {
        self.active.as_ref().and_then(|id| self.set(id))
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// The active curve binding, if curve editing is in progress.
    pub fn arc(&self) -> Option<&ArcBinding> {
        self.arc.as_ref()
    }

    pub fn roster(&self) -> Option<&[PerformerId]> {
        self.roster.as_deref()
    }

    /// Resolved positions at a continuous count.
    pub fn resolve(&self, count: f64) -> HashMap<PerformerId, WorldPos> {
        resolver::resolve(&self.sets, count)
    }

    /// Last playable count for the current timeline.
    pub fn max_count(&self, settings: &Settings) -> f64 {
        resolver::max_count(&self.sets, settings.phrase_length)
    }

    // ---- set lifecycle ---------------------------------------------------

    /// Make `id` the set being edited. Switching sets ends curve editing.
    pub fn set_active(&mut self, id: &SetId) -> DrillResult<()> {
        self.index_of(id)?;
        if self.active.as_ref() != Some(id) {
            self.arc = None;
        }
        self.active = Some(id.clone());
        Ok(())
    }

    /// Append a set one phrase after the last one, seeded from the active
    /// set. The new set becomes active and the selection clears.
    pub fn append_at_tail(&mut self, settings: &Settings) -> SetId {
        let start = self
            .sets
            .last()
            .map(|s| s.start_count.saturating_add(settings.phrase_length))
            .unwrap_or(0);

        let mut set = DrillSet::new(self.fresh_id(), start);
        if let Some(source) = self.active_set() {
            set.positions = source.positions.clone();
            set.note = source.note.clone();
        }
        let id = set.id.clone();

        debug!(set = %id, start_count = start, "Appended set");
        self.sets.push(set);
        self.renumber();
        self.activate_fresh(&id);
        id
    }

    /// Insert a set at `count` (rounded, at least 0), seeded from the
    /// nearest preceding set or else the first set.
    pub fn insert_at_count(&mut self, count: f64) -> DrillResult<SetId> {
        let count = round_count(count);
        self.ensure_free(count, None)?;

        let mut set = DrillSet::new(self.fresh_id(), count);
        let base = self
            .sets
            .iter()
            .rev()
            .find(|s| s.start_count <= count)
            .or_else(|| self.sets.first());
        if let Some(base) = base {
            set.positions = base.positions.clone();
            set.note = base.note.clone();
        }
        let id = set.id.clone();

        debug!(set = %id, start_count = count, "Inserted set");
        self.sets.push(set);
        self.renumber();
        self.activate_fresh(&id);
        Ok(id)
    }

    /// Remove a set. Deleting the active set activates the first remaining
    /// one and clears the selection.
    pub fn delete(&mut self, id: &SetId) -> DrillResult<()> {
        let idx = self.index_of(id)?;
        self.sets.remove(idx);
        self.renumber();

        if self.arc.as_ref().is_some_and(|a| &a.set_id == id) {
            self.arc = None;
        }
        if self.active.as_ref() == Some(id) {
            self.active = self.sets.first().map(|s| s.id.clone());
            self.selection.clear();
        }
        debug!(set = %id, remaining = self.sets.len(), "Deleted set");
        Ok(())
    }

    /// Swap start counts with the neighbouring set. Returns `false` at
    /// either end of the timeline.
    pub fn reorder(&mut self, id: &SetId, direction: Direction) -> DrillResult<bool> {
        let idx = self.index_of(id)?;
        let other = match direction {
            Direction::Earlier if idx > 0 => idx - 1,
            Direction::Later if idx + 1 < self.sets.len() => idx + 1,
            _ => return Ok(false),
        };

        let a = self.sets[idx].start_count;
        let b = self.sets[other].start_count;
        self.sets[idx].start_count = b;
        self.sets[other].start_count = a;
        self.renumber();
        Ok(true)
    }

    /// Move a set to a new start count (rounded, at least 0).
    pub fn change_start_count(&mut self, id: &SetId, value: f64) -> DrillResult<()> {
        let idx = self.index_of(id)?;
        let count = round_count(value);
        self.ensure_free(count, Some(id))?;

        self.sets[idx].start_count = count;
        self.renumber();
        debug!(set = %id, start_count = count, "Changed start count");
        Ok(())
    }

    /// Deep-copy positions, intermediate keyframes and text from `src`
    /// into `dst` (the active set when `None`).
    pub fn copy_set(&mut self, src: &SetId, dst: Option<&SetId>) -> DrillResult<()> {
        let dst = match dst {
            Some(id) => id.clone(),
            None => self.active.clone().ok_or(DrillError::NoActiveSet)?,
        };
        let src_idx = self.index_of(src)?;
        let dst_idx = self.index_of(&dst)?;
        if src_idx == dst_idx {
            return Ok(());
        }

        let source = self.sets[src_idx].clone();
        self.sets[dst_idx].copy_content_from(&source);
        Ok(())
    }

    /// Merge the selected performers' positions from the active set into
    /// `dst`. Returns how many positions were copied.
    pub fn copy_selected_members(&mut self, dst: &SetId) -> DrillResult<usize> {
        if self.selection.is_empty() {
            return Err(DrillError::empty_selection("copy members"));
        }
        let src_idx = self.active_index()?;
        let dst_idx = self.index_of(dst)?;

        let copied: Vec<(PerformerId, WorldPos)> = self
            .selection
            .ids()
            .iter()
            .filter_map(|id| self.sets[src_idx].positions.get(id).map(|p| (id.clone(), *p)))
            .collect();
        let n = copied.len();
        self.sets[dst_idx].positions.extend(copied);
        Ok(n)
    }

    /// Clone `src` as a new set one count later.
    ///
    /// The new start count is not checked for conflicts; a collision is
    /// logged and left for a later [`TimelineStore::change_start_count`].
    pub fn duplicate(&mut self, src: &SetId) -> DrillResult<SetId> {
        let idx = self.index_of(src)?;
        let start = self.sets[idx].start_count.saturating_add(1);

        let mut set = DrillSet::new(self.fresh_id(), start);
        set.copy_content_from(&self.sets[idx]);
        let id = set.id.clone();

        if let Some(owner) = self.by_count.get(&start).and_then(|ids| ids.first()) {
            warn!(
                set = %id,
                start_count = start,
                owner = %owner,
                "Duplicated set collides with an existing start count"
            );
        }
        self.sets.push(set);
        self.renumber();
        Ok(id)
    }

    /// Replace timeline, selection and active set wholesale.
    ///
    /// Used for loads, undo/redo snapshots and remote updates. Stale
    /// performer ids are filtered against the known roster, the timeline is
    /// re-sorted and renamed, a missing active id falls back to the first
    /// set, and any curve binding is dropped.
    pub fn restore_state(
        &mut self,
        sets: Vec<DrillSet>,
        selection: Vec<PerformerId>,
        active: Option<SetId>,
    ) {
        self.sets = sets;
        self.selection = Selection::from_ids(selection);
        self.arc = None;

        if let Some(roster) = &self.roster {
            let known: HashSet<&PerformerId> = roster.iter().collect();
            let mut dropped = 0;
            for set in &mut self.sets {
                dropped += set.retain_performers(|id| known.contains(id));
            }
            dropped += self.selection.retain(|id| known.contains(id));
            if dropped > 0 {
                warn!(dropped, "Dropped positions of performers not in the roster");
            }
        }

        self.renumber();
        self.active = active
            .filter(|id| self.sets.iter().any(|s| &s.id == id))
            .or_else(|| self.sets.first().map(|s| s.id.clone()));
        debug!(sets = self.sets.len(), "Restored timeline state");
    }

    // ---- positions -------------------------------------------------------

    /// Store a keyframe for one performer at `count`.
    ///
    /// A count equal to a set's start writes that set's base position.
    /// Otherwise the keyframe goes to the set whose range contains `count`.
    pub fn add_intermediate_point(
        &mut self,
        performer: &PerformerId,
        count: u32,
        pos: WorldPos,
        settings: &Settings,
    ) -> DrillResult<()> {
        let pos = settings.clamp_and_snap(pos);

        if let Some(idx) = self.sets.iter().position(|s| s.start_count == count) {
            self.sets[idx].positions.insert(performer.clone(), pos);
            return Ok(());
        }

        let idx = self
            .sets
            .iter()
            .rposition(|s| s.start_count < count)
            .ok_or(DrillError::NoSetForCount { count })?;
        self.sets[idx]
            .positions_by_count
            .entry(count)
            .or_default()
            .insert(performer.clone(), pos);
        debug!(performer = %performer, count, "Added intermediate keyframe");
        Ok(())
    }

    /// Remove an intermediate keyframe. Set start counts are never touched.
    /// Returns whether an entry was removed.
    pub fn remove_intermediate_point(&mut self, performer: &PerformerId, count: u32) -> bool {
        if self.by_count.contains_key(&count) {
            return false;
        }

        let mut removed = false;
        for set in &mut self.sets {
            if let Some(bucket) = set.positions_by_count.get_mut(&count) {
                removed |= bucket.remove(performer).is_some();
                if bucket.is_empty() {
                    set.positions_by_count.remove(&count);
                }
            }
        }
        removed
    }

    /// Move a performer in the active set.
    ///
    /// When the performer is part of a multi-selection, every selected
    /// performer shifts by the same delta and is clamped on its own, so
    /// the field edge stops performers one by one rather than the group.
    pub fn move_performer(
        &mut self,
        id: &PerformerId,
        raw: WorldPos,
        settings: &Settings,
    ) -> DrillResult<()> {
        let idx = self.active_index()?;
        let target = settings.clamp_and_snap(raw);
        let set = &mut self.sets[idx];

        let old = match set.positions.get(id) {
            Some(p) => *p,
            None => {
                set.positions.insert(id.clone(), target);
                return Ok(());
            }
        };

        if self.selection.len() > 1 && self.selection.contains(id) {
            let dx = target.x - old.x;
            let dy = target.y - old.y;
            for sel in self.selection.ids() {
                if let Some(p) = set.positions.get_mut(sel) {
                    *p = settings.clamp_and_snap(p.offset(dx, dy));
                }
            }
        } else {
            set.positions.insert(id.clone(), target);
        }
        Ok(())
    }

    /// Shift every selected performer in the active set by `(dx, dy)`.
    pub fn nudge_selected(&mut self, dx: f64, dy: f64, settings: &Settings) -> DrillResult<()> {
        if self.selection.is_empty() {
            return Err(DrillError::empty_selection("nudge"));
        }
        let idx = self.active_index()?;
        let set = &mut self.sets[idx];
        for id in self.selection.ids() {
            if let Some(p) = set.positions.get_mut(id) {
                *p = settings.clamp_and_snap(p.offset(dx, dy));
            }
        }
        Ok(())
    }

    /// Lay the selection out as `shape`, anchored on its current centroid.
    pub fn arrange(&mut self, shape: &Shape, settings: &Settings) -> DrillResult<()> {
        let idx = self.active_index()?;
        let selected = self.selection.ids();
        let points = shape.generate(settings.field_center(), selected.len());
        let placed = shapes::apply_shape(selected, &points, &self.sets[idx].positions)?;

        let set = &mut self.sets[idx];
        for (id, p) in placed {
            set.positions.insert(id, settings.clamp_and_snap(p));
        }
        debug!(shape = shape.name(), performers = selected.len(), "Applied shape");
        Ok(())
    }

    /// Spread the selection (or everyone, when nothing is selected) on a
    /// horizontal line across the field.
    pub fn arrange_line(&mut self, settings: &Settings) -> DrillResult<()> {
        let idx = self.active_index()?;
        let targets: Vec<PerformerId> = if !self.selection.is_empty() {
            self.selection.ids().to_vec()
        } else if let Some(roster) = &self.roster {
            roster.clone()
        } else {
            let mut ids: Vec<_> = self.sets[idx].positions.keys().cloned().collect();
            ids.sort();
            ids
        };
        if targets.is_empty() {
            return Err(DrillError::empty_selection("arrange line"));
        }

        let points = shapes::line(targets.len(), settings);
        let set = &mut self.sets[idx];
        for (id, p) in targets.into_iter().zip(points) {
            set.positions.insert(id, settings.clamp_and_snap(p));
        }
        Ok(())
    }

    /// Rotate the selection in the active set by `angle` radians about
    /// `center`, compounding on the current positions.
    pub fn rotate_selected(
        &mut self,
        center: WorldPos,
        angle: f64,
        settings: &Settings,
    ) -> DrillResult<()> {
        let idx = self.active_index()?;
        let rotated = transform::rotate(
            self.selection.ids(),
            &self.sets[idx].positions,
            center,
            angle,
            settings,
        )?;
        self.sets[idx].positions.extend(rotated);
        Ok(())
    }

    /// Capture a rotation baseline of the selection in the active set.
    pub fn capture_rotation(&self, center: WorldPos) -> DrillResult<RotationBaseline> {
        let idx = self.active_index()?;
        let set = &self.sets[idx];
        RotationBaseline::capture(set.id.clone(), self.selection.ids(), &set.positions, center)
    }

    /// Rotate from a gesture baseline by `delta` on top of its cumulative
    /// angle, about the pivot fixed at capture.
    ///
    /// The baseline must come from the active set. Performers removed from
    /// the set since capture are not put back.
    pub fn rotate_from_baseline(
        &mut self,
        baseline: &mut RotationBaseline,
        delta: f64,
        settings: &Settings,
    ) -> DrillResult<()> {
        let idx = self.active_index()?;
        if self.sets[idx].id != baseline.set_id {
            return Err(DrillError::BaselineMismatch {
                captured: baseline.set_id.to_string(),
                active: self.sets[idx].id.to_string(),
            });
        }
        if baseline.positions.is_empty() {
            return Err(DrillError::empty_selection("rotate"));
        }

        let set = &mut self.sets[idx];
        let mut rotated = baseline.rotate_by(delta, settings);
        rotated.retain(|id, _| set.positions.contains_key(id));
        set.positions.extend(rotated);
        Ok(())
    }

    /// Scale the selection in the active set about `center`.
    pub fn scale_selected(
        &mut self,
        center: WorldPos,
        scale_x: f64,
        scale_y: Option<f64>,
        settings: &Settings,
    ) -> DrillResult<()> {
        let idx = self.active_index()?;
        let scaled = transform::scale(
            self.selection.ids(),
            &self.sets[idx].positions,
            center,
            scale_x,
            scale_y,
            settings,
        )?;
        self.sets[idx].positions.extend(scaled);
        Ok(())
    }

    /// Delete performers' positions from every set and drop them from the
    /// selection and any curve binding. Returns the number of entries removed.
    pub fn remove_performers(&mut self, ids: &[PerformerId]) -> usize {
        let doomed: HashSet<&PerformerId> = ids.iter().collect();
        let mut removed = 0;
        for set in &mut self.sets {
            removed += set.retain_performers(|id| !doomed.contains(id));
        }
        self.selection.retain(|id| !doomed.contains(id));
        if let Some(arc) = &mut self.arc {
            arc.params.retain(|id, _| !doomed.contains(id));
        }
        debug!(performers = ids.len(), removed, "Removed performers");
        removed
    }

    /// Copy the selected performers' positions from the active set.
    pub fn copy_selection(&self) -> DrillResult<PositionClipboard> {
        if self.selection.is_empty() {
            return Err(DrillError::empty_selection("copy"));
        }
        let set = &self.sets[self.active_index()?];
        let entries = self
            .selection
            .ids()
            .iter()
            .filter_map(|id| set.positions.get(id).map(|p| (id.clone(), *p)))
            .collect();
        Ok(PositionClipboard { entries })
    }

    /// Paste clipboard positions into the active set and select the pasted
    /// performers. Performers no longer in the roster are skipped.
    pub fn paste(&mut self, clipboard: &PositionClipboard, settings: &Settings) -> DrillResult<usize> {
        let idx = self.active_index()?;
        let entries: Vec<(PerformerId, WorldPos)> = clipboard
            .entries
            .iter()
            .filter(|(id, _)| self.is_known(id))
            .map(|(id, p)| (id.clone(), settings.clamp_and_snap(*p)))
            .collect();

        let ids: Vec<PerformerId> = entries.iter().map(|(id, _)| id.clone()).collect();
        let n = entries.len();
        self.sets[idx].positions.extend(entries);
        self.selection.select_bulk(ids);
        Ok(n)
    }

    // ---- text ------------------------------------------------------------

    pub fn edit_note(&mut self, id: &SetId, text: impl Into<String>) -> DrillResult<()> {
        let idx = self.index_of(id)?;
        self.sets[idx].note = text.into();
        Ok(())
    }

    pub fn edit_instructions(&mut self, id: &SetId, text: impl Into<String>) -> DrillResult<()> {
        let idx = self.index_of(id)?;
        self.sets[idx].instructions = text.into();
        Ok(())
    }

    pub fn edit_next_move(&mut self, id: &SetId, text: impl Into<String>) -> DrillResult<()> {
        let idx = self.index_of(id)?;
        self.sets[idx].next_move = text.into();
        Ok(())
    }

    // ---- roster ----------------------------------------------------------

    /// React to a roster change.
    ///
    /// Positions of departed performers are dropped from every set. New
    /// performers are auto-placed in every set that lacks them, unless the
    /// settings ask for careful placement.
    pub fn sync_roster(&mut self, roster: &[PerformerId], settings: &Settings) {
        let previous: Option<HashSet<PerformerId>> =
            self.roster.as_ref().map(|r| r.iter().cloned().collect());
        let current: HashSet<&PerformerId> = roster.iter().collect();

        let mut dropped = 0;
        for set in &mut self.sets {
            dropped += set.retain_performers(|id| current.contains(id));
        }
        dropped += self.selection.retain(|id| current.contains(id));
        if let Some(arc) = &mut self.arc {
            arc.params.retain(|id, _| current.contains(id));
        }

        let newcomers: Vec<PerformerId> = roster
            .iter()
            .filter(|id| previous.as_ref().map_or(true, |prev| !prev.contains(*id)))
            .cloned()
            .collect();

        let mut placed = 0;
        for set in &mut self.sets {
            let missing: Vec<PerformerId> = newcomers
                .iter()
                .filter(|id| !set.positions.contains_key(*id))
                .cloned()
                .collect();
            for (id, pos) in auto_place(&set.positions, &missing, settings) {
                set.positions.insert(id, pos);
                placed += 1;
            }
        }

        self.roster = Some(roster.to_vec());
        debug!(
            performers = roster.len(),
            dropped,
            placed,
            "Synced roster"
        );
    }

    // ---- internals -------------------------------------------------------

    pub(crate) fn index_of(&self, id: &SetId) -> DrillResult<usize> {
        self.sets
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| DrillError::set_not_found(id.as_str()))
    }

    pub(crate) fn active_index(&self) -> DrillResult<usize> {
        let id = self.active.as_ref().ok_or(DrillError::NoActiveSet)?;
        self.index_of(id)
    }

    fn is_known(&self, id: &PerformerId) -> bool {
        self.roster.as_ref().map_or(true, |r| r.contains(id))
    }

    /// Conflict unless `count` is free or owned only by `except`.
    fn ensure_free(&self, count: u32, except: Option<&SetId>) -> DrillResult<()> {
        let owner = self
            .by_count
            .get(&count)
            .and_then(|ids| ids.iter().find(|id| Some(*id) != except));
        match owner {
            Some(owner) => {
                let name = self
                    .set(owner)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| owner.to_string());
                Err(DrillError::conflict(count, name))
            }
            None => Ok(()),
        }
    }

    fn activate_fresh(&mut self, id: &SetId) {
        self.active = Some(id.clone());
        self.arc = None;
        self.selection.clear();
    }

    fn fresh_id(&mut self) -> SetId {
        loop {
            self.next_seq += 1;
            let id = SetId::new(format!("set-{}", self.next_seq));
            if !self.sets.iter().any(|s| s.id == id) {
                return id;
            }
        }
    }

    /// Stable sort by start count, rename by position, rebuild the index
    /// and hand intermediate keyframes to the sets whose ranges hold them.
    fn renumber(&mut self) {
        self.sets.sort_by_key(|s| s.start_count);
        self.by_count.clear();
        for (i, set) in self.sets.iter_mut().enumerate() {
            set.name = format!("Set {}", i + 1);
            self.by_count
                .entry(set.start_count)
                .or_default()
                .push(set.id.clone());
        }

        let dropped = self.rehome_intermediates();
        if dropped > 0 {
            debug!(dropped, "Dropped intermediate keyframes without an owning range");
        }
    }

    /// Move every intermediate keyframe to the last set starting strictly
    /// before its count. Keyframes on a start count, or before the first
    /// set, are dropped. Returns how many entries were dropped.
    fn rehome_intermediates(&mut self) -> usize {
        let mut loose = Vec::new();
        for set in &mut self.sets {
            loose.extend(std::mem::take(&mut set.positions_by_count));
        }

        let mut dropped = 0;
        for (count, bucket) in loose {
            if self.by_count.contains_key(&count) {
                dropped += bucket.len();
                continue;
            }
            match self.sets.iter().rposition(|s| s.start_count < count) {
                Some(idx) => self.sets[idx]
                    .positions_by_count
                    .entry(count)
                    .or_default()
                    .extend(bucket),
                None => dropped += bucket.len(),
            }
        }
        dropped
    }
}

fn round_count(value: f64) -> u32 {
    value.round().clamp(0.0, u32::MAX as f64) as u32
}
