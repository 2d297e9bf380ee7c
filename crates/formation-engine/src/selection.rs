//! Selection and selection order.
//!
//! The order is meaningful: the first id is the "leader", and operators that
//! map generated points onto performers do so in selection order.

use drillcraft_model::PerformerId;

/// Ordered set of selected performers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    order: Vec<PerformerId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an id list, dropping duplicates but keeping first-seen order.
    pub fn from_ids(ids: impl IntoIterator<Item = PerformerId>) -> Self {
        let mut selection = Self::new();
        selection.select_bulk(ids);
        selection
    }

    /// Click-style toggle.
    ///
    /// With `multi`, membership of `id` flips and new ids go to the end.
    /// Without it, clicking the lone selected performer clears the
    /// selection and anything else replaces it.
    pub fn toggle(&mut self, id: &PerformerId, multi: bool) {
        if multi {
            if let Some(idx) = self.index_of(id) {
                self.order.remove(idx);
            } else {
                self.order.push(id.clone());
            }
        } else if self.order.len() == 1 && &self.order[0] == id {
            self.order.clear();
        } else {
            self.order = vec![id.clone()];
        }
    }

    /// Replace the selection (e.g. from a rubber-band pick).
    pub fn select_bulk(&mut self, ids: impl IntoIterator<Item = PerformerId>) {
        self.order.clear();
        for id in ids {
            if !self.order.contains(&id) {
                self.order.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn contains(&self, id: &PerformerId) -> bool {
        self.order.contains(id)
    }

    /// First selected performer.
    pub fn leader(&self) -> Option<&PerformerId> {
        self.order.first()
    }

    /// Move `id` one slot towards the front. Returns whether anything moved.
    pub fn move_up(&mut self, id: &PerformerId) -> bool {
        match self.index_of(id) {
            Some(idx) if idx > 0 => {
                self.order.swap(idx, idx - 1);
                true
            }
            _ => false,
        }
    }

    /// Move `id` one slot towards the back. Returns whether anything moved.
    pub fn move_down(&mut self, id: &PerformerId) -> bool {
        match self.index_of(id) {
            Some(idx) if idx + 1 < self.order.len() => {
                self.order.swap(idx, idx + 1);
                true
            }
            _ => false,
        }
    }

    /// Drop ids failing `keep`. Returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&PerformerId) -> bool) -> usize {
        let before = self.order.len();
        self.order.retain(|id| keep(id));
        before - self.order.len()
    }

    pub fn ids(&self) -> &[PerformerId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn index_of(&self, id: &PerformerId) -> Option<usize> {
        self.order.iter().position(|x| x == id)
    }
}
