//! Field and editing settings supplied by the settings collaborator.
//!
//! The engine reads these per call and never caches them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{self, WorldPos, STEP_M};

/// Grid snapping applied to committed positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapMode {
    /// Snap to whole steps.
    #[default]
    Whole,
    /// Snap to half steps.
    Half,
    /// No snapping.
    Free,
}

impl SnapMode {
    /// Grid spacing in meters, or `None` for free placement.
    pub fn step(&self) -> Option<f64> {
        match self {
            Self::Whole => Some(STEP_M),
            Self::Half => Some(STEP_M / 2.0),
            Self::Free => None,
        }
    }
}

/// How newly added performers receive a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Auto-place new performers in a grid near the field center.
    #[default]
    Quick,
    /// Leave new performers unplaced until the user places them.
    Careful,
}

/// A textual mode that did not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} mode: {value:?}")]
pub struct ParseModeError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for SnapMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whole" => Ok(Self::Whole),
            "half" => Ok(Self::Half),
            "free" => Ok(Self::Free),
            other => Err(ParseModeError {
                kind: "snap",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for PlacementMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(Self::Quick),
            "careful" => Ok(Self::Careful),
            other => Err(ParseModeError {
                kind: "placement",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SnapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole => write!(f, "whole"),
            Self::Half => write!(f, "half"),
            Self::Free => write!(f, "free"),
        }
    }
}

/// Field dimensions and editing modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Field width in meters.
    pub field_width: f64,
    /// Field height in meters.
    pub field_height: f64,
    pub snap_mode: SnapMode,
    pub placement_mode: PlacementMode,
    /// Counts between a set and one appended after it.
    pub phrase_length: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: 50.0,
            field_height: 40.0,
            snap_mode: SnapMode::Whole,
            placement_mode: PlacementMode::Quick,
            phrase_length: 16,
        }
    }
}

impl Settings {
    /// Settings with the given snap mode and defaults elsewhere.
    pub fn with_snap(snap_mode: SnapMode) -> Self {
        Self {
            snap_mode,
            ..Self::default()
        }
    }

    /// Snap and clamp a raw position with these settings.
    pub fn clamp_and_snap(&self, pos: WorldPos) -> WorldPos {
        geometry::clamp_and_snap(pos, self.snap_mode, self.field_width, self.field_height)
    }

    /// Whether a position lies inside the field.
    pub fn contains(&self, pos: &WorldPos) -> bool {
        pos.x >= 0.0 && pos.x <= self.field_width && pos.y >= 0.0 && pos.y <= self.field_height
    }

    /// The field's center point.
    pub fn field_center(&self) -> WorldPos {
        WorldPos::new(self.field_width / 2.0, self.field_height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("Half".parse::<SnapMode>().unwrap(), SnapMode::Half);
        assert_eq!(
            "careful".parse::<PlacementMode>().unwrap(),
            PlacementMode::Careful
        );
        let err = "diagonal".parse::<SnapMode>().unwrap_err();
        assert_eq!(err.kind, "snap");
    }

    #[test]
    fn test_settings_clamp_and_snap() {
        let settings = Settings::default();
        let p = settings.clamp_and_snap(WorldPos::new(60.0, -1.0));
        assert_eq!(p, WorldPos::new(50.0, 0.0));
        assert!(settings.contains(&p));
    }

    #[test]
    fn test_settings_serde_defaults() {
        let parsed: Settings = serde_json::from_str(r#"{"snap_mode":"free"}"#).unwrap();
        assert_eq!(parsed.snap_mode, SnapMode::Free);
        assert_eq!(parsed.field_width, 50.0);
        assert_eq!(parsed.phrase_length, 16);
    }
}
