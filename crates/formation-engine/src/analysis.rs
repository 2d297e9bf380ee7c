//! Detection and reporting over a timeline: collisions, movement and
//! structural validation. Nothing here mutates or repairs a drill.

use std::collections::{BTreeMap, HashSet};

use drillcraft_model::{DrillSet, Performer, PerformerId, Settings, WorldPos, STEP_M};
use serde::Serialize;

/// Performers closer than this in a set's base positions are reported.
pub const SAFE_DISTANCE_M: f64 = 2.0 * STEP_M;

/// Two performers standing too close in one set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollisionPair {
    pub set_id: String,
    pub start_count: u32,
    pub first: PerformerId,
    pub second: PerformerId,
    pub distance: f64,
}

/// Collision counts of one set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetRisk {
    pub start_count: u32,
    pub pairs: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollisionReport {
    /// Closest pairs first.
    pub pairs: Vec<CollisionPair>,
    /// Sets with at least one pair, in timeline order.
    pub by_set: Vec<SetRisk>,
}

impl CollisionReport {
    pub fn is_clear(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Pairs closer than [`SAFE_DISTANCE_M`] in every set's base positions.
pub fn collision_report(sets: &[DrillSet]) -> CollisionReport {
    let mut report = CollisionReport::default();

    for set in ordered(sets) {
        let mut entries: Vec<(&PerformerId, &WorldPos)> = set.positions.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut pairs = 0;
        for (i, (id_a, pos_a)) in entries.iter().enumerate() {
            for (id_b, pos_b) in &entries[i + 1..] {
                let distance = pos_a.distance_to(pos_b);
                if distance < SAFE_DISTANCE_M {
                    pairs += 1;
                    report.pairs.push(CollisionPair {
                        set_id: set.id.to_string(),
                        start_count: set.start_count,
                        first: (*id_a).clone(),
                        second: (*id_b).clone(),
                        distance,
                    });
                }
            }
        }
        if pairs > 0 {
            report.by_set.push(SetRisk {
                start_count: set.start_count,
                pairs,
            });
        }
    }

    report.pairs.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    report
}

/// Path length of one performer across the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformerDistance {
    pub performer: PerformerId,
    pub distance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MovementReport {
    /// Longest path first.
    pub performers: Vec<PerformerDistance>,
    pub total: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
}

/// Straight-line distance each performer covers between consecutive sets
/// in which it has a base position.
pub fn movement_report(sets: &[DrillSet], performers: &[PerformerId]) -> MovementReport {
    let sets = ordered(sets);
    let mut rows: Vec<PerformerDistance> = performers
        .iter()
        .map(|id| {
            let mut distance = 0.0;
            let mut prev: Option<&WorldPos> = None;
            for pos in sets.iter().filter_map(|s| s.positions.get(id)) {
                if let Some(p) = prev {
                    distance += p.distance_to(pos);
                }
                prev = Some(pos);
            }
            PerformerDistance {
                performer: id.clone(),
                distance,
            }
        })
        .collect();

    if rows.is_empty() {
        return MovementReport::default();
    }

    let total: f64 = rows.iter().map(|r| r.distance).sum();
    let max = rows.iter().map(|r| r.distance).fold(f64::MIN, f64::max);
    let min = rows.iter().map(|r| r.distance).fold(f64::MAX, f64::min);
    let average = total / rows.len() as f64;
    rows.sort_by(|a, b| b.distance.total_cmp(&a.distance));

    MovementReport {
        performers: rows,
        total,
        average,
        max,
        min,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Where the problem is, e.g. `sets[2].positions[m7]`.
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// No errors. Warnings do not invalidate a drill.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    fn push(&mut self, severity: Severity, field: String, message: String) {
        self.issues.push(ValidationIssue {
            severity,
            field,
            message,
        });
    }
}

/// Check a drill for structural problems.
///
/// Duplicate roster ids are errors. Shared start counts, positions
/// outside the field and positions of performers missing from the roster
/// are warnings.
pub fn validate(
    sets: &[DrillSet],
    performers: &[Performer],
    settings: &Settings,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut seen = HashSet::new();
    for (i, p) in performers.iter().enumerate() {
        if !seen.insert(&p.id) {
            report.push(
                Severity::Error,
                format!("performers[{i}].id"),
                format!("performer id {} is used more than once", p.id),
            );
        }
    }

    let mut owners: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
    for set in sets {
        owners
            .entry(set.start_count)
            .or_default()
            .push(set.id.as_str());
    }
    for (count, ids) in owners.iter().filter(|(_, ids)| ids.len() > 1) {
        report.push(
            Severity::Warning,
            "sets.start_count".to_string(),
            format!("count {count} is shared by sets {}", ids.join(", ")),
        );
    }

    for (i, set) in sets.iter().enumerate() {
        let mut entries: Vec<(String, &PerformerId, &WorldPos)> = set
            .positions
            .iter()
            .map(|(id, p)| (format!("sets[{i}].positions[{id}]"), id, p))
            .collect();
        for (count, map) in &set.positions_by_count {
            entries.extend(
                map.iter()
                    .map(|(id, p)| (format!("sets[{i}].positions_by_count[{count}][{id}]"), id, p)),
            );
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        for (field, id, pos) in entries {
            if !seen.contains(id) {
                report.push(
                    Severity::Warning,
                    field.clone(),
                    format!("position for unknown performer {id}"),
                );
            }
            if !settings.contains(pos) {
                report.push(
                    Severity::Warning,
                    field,
                    format!("({:.2}, {:.2}) is outside the field", pos.x, pos.y),
                );
            }
        }
    }

    report
}

fn ordered(sets: &[DrillSet]) -> Vec<&DrillSet> {
    let mut sorted: Vec<&DrillSet> = sets.iter().collect();
    sorted.sort_by_key(|s| s.start_count);
    sorted
}
