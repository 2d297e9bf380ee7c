//! Keyframed formations ("sets") anchored on the count timeline.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::WorldPos;
use crate::performer::PerformerId;

/// Positions of performers at one keyframe.
pub type PositionMap = HashMap<PerformerId, WorldPos>;

/// Stable identifier of a set. Display names are derived from order and
/// change on every reorder; ids never do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetId(pub String);

impl SetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A formation anchored at `start_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillSet {
    pub id: SetId,

    /// "Set N", derived from the set's position in the timeline.
    pub name: String,

    /// Count this set is anchored at. Unique across the timeline.
    pub start_count: u32,

    /// Keyframe positions at `start_count`.
    #[serde(default)]
    pub positions: PositionMap,

    /// Intermediate keyframes at counts inside this set's range.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub positions_by_count: BTreeMap<u32, PositionMap>,

    #[serde(default)]
    pub note: String,

    #[serde(default)]
    pub instructions: String,

    #[serde(default)]
    pub next_move: String,
}

impl DrillSet {
    /// An empty set. The name is assigned when the timeline renumbers.
    pub fn new(id: SetId, start_count: u32) -> Self {
        Self {
            id,
            name: String::new(),
            start_count,
            positions: HashMap::new(),
            positions_by_count: BTreeMap::new(),
            note: String::new(),
            instructions: String::new(),
            next_move: String::new(),
        }
    }

    /// Base position of a performer.
    pub fn position(&self, id: &PerformerId) -> Option<&WorldPos> {
        self.positions.get(id)
    }

    /// Every keyframe this set stores for a performer, base first then
    /// intermediate counts ascending.
    pub fn keyframes_for<'a>(
        &'a self,
        id: &'a PerformerId,
    ) -> impl Iterator<Item = (u32, WorldPos)> + 'a {
        let base = self.positions.get(id).map(|p| (self.start_count, *p));
        let intermediate = self
            .positions_by_count
            .iter()
            .filter_map(move |(count, map)| map.get(id).map(|p| (*count, *p)));
        base.into_iter().chain(intermediate)
    }

    /// Replace positions, intermediate keyframes and text with deep copies
    /// of `other`'s. Identity and anchor count are kept.
    pub fn copy_content_from(&mut self, other: &DrillSet) {
        self.positions = other.positions.clone();
        self.positions_by_count = other.positions_by_count.clone();
        self.note = other.note.clone();
        self.instructions = other.instructions.clone();
        self.next_move = other.next_move.clone();
    }

    /// Drop every position whose performer fails `keep`, including
    /// intermediate entries. Emptied count buckets are removed.
    /// Returns how many entries were dropped.
    pub fn retain_performers(&mut self, mut keep: impl FnMut(&PerformerId) -> bool) -> usize {
        let before = self.position_entry_count();
        self.positions.retain(|id, _| keep(id));
        for map in self.positions_by_count.values_mut() {
            map.retain(|id, _| keep(id));
        }
        self.positions_by_count.retain(|_, map| !map.is_empty());
        before - self.position_entry_count()
    }

    /// Base plus intermediate position entries.
    pub fn position_entry_count(&self) -> usize {
        self.positions.len()
            + self
                .positions_by_count
                .values()
                .map(HashMap::len)
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> PerformerId {
        PerformerId::from(s)
    }

    #[test]
    fn test_keyframes_for_orders_base_first() {
        let mut set = DrillSet::new(SetId::from("s1"), 16);
        set.positions.insert(pid("p1"), WorldPos::new(1.0, 1.0));
        let mut at_24 = PositionMap::new();
        at_24.insert(pid("p1"), WorldPos::new(2.0, 2.0));
        set.positions_by_count.insert(24, at_24);

        let keys: Vec<u32> = set.keyframes_for(&pid("p1")).map(|(c, _)| c).collect();
        assert_eq!(keys, vec![16, 24]);
        assert_eq!(set.keyframes_for(&pid("p2")).count(), 0);
    }

    #[test]
    fn test_retain_drops_empty_buckets() {
        let mut set = DrillSet::new(SetId::from("s1"), 0);
        set.positions.insert(pid("p1"), WorldPos::new(1.0, 1.0));
        set.positions.insert(pid("p2"), WorldPos::new(2.0, 1.0));
        let mut at_4 = PositionMap::new();
        at_4.insert(pid("p2"), WorldPos::new(3.0, 3.0));
        set.positions_by_count.insert(4, at_4);

        let dropped = set.retain_performers(|id| id.as_str() == "p1");
        assert_eq!(dropped, 2);
        assert!(set.positions_by_count.is_empty());
        assert_eq!(set.positions.len(), 1);
    }

    #[test]
    fn test_serde_with_count_keys() {
        let mut set = DrillSet::new(SetId::from("s1"), 0);
        let mut at_8 = PositionMap::new();
        at_8.insert(pid("p1"), WorldPos::new(3.0, 4.0));
        set.positions_by_count.insert(8, at_8);

        let json = serde_json::to_string(&set).unwrap();
        let parsed: DrillSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, set);
    }
}
