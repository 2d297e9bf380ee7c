//! Drillcraft Formation Engine
//!
//! Keyframed performer positions across a timeline of sets, and the
//! operators that edit them:
//! - **Store:** Ordered sets with unique start counts, insertion, deletion,
//!   renumbering and conflict detection
//! - **Shapes & Transforms:** Circle/rectangle/spiral/box/line layouts,
//!   rotation and scaling of a selection
//! - **Curve Binding:** Performers pinned along a quadratic Bézier
//! - **Resolver:** Interpolated positions at any continuous count, and the
//!   playback ticker
//! - **Analysis:** Collision, movement and validation reports
//!
//! This crate is pure computation: no I/O, no rendering. Settings are
//! passed into each call; the store owns all other state.

pub mod analysis;
pub mod curve;
pub mod placement;
pub mod resolver;
pub mod selection;
pub mod shapes;
pub mod store;
pub mod transform;

pub use resolver::{resolve, Playback};
pub use selection::Selection;
pub use shapes::Shape;
pub use store::{Direction, PositionClipboard, TimelineStore};
pub use transform::RotationBaseline;

use drillcraft_common::{DrillError, DrillResult, EditorDefaults};
use drillcraft_model::{PlacementMode, Settings, SnapMode};

/// Build per-call engine settings from configured editor defaults.
pub fn settings_from_defaults(defaults: &EditorDefaults) -> DrillResult<Settings> {
    let snap_mode = defaults
        .snap_mode
        .parse::<SnapMode>()
        .map_err(|e| DrillError::config(format!("{e}")))?;
    let placement_mode = defaults
        .placement_mode
        .parse::<PlacementMode>()
        .map_err(|e| DrillError::config(format!("{e}")))?;
    if defaults.field_width_m <= 0.0 || defaults.field_height_m <= 0.0 {
        return Err(DrillError::config(format!(
            "field must have positive size, got {} x {}",
            defaults.field_width_m, defaults.field_height_m
        )));
    }

    Ok(Settings {
        field_width: defaults.field_width_m,
        field_height: defaults.field_height_m,
        snap_mode,
        placement_mode,
        phrase_length: defaults.phrase_length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_defaults() {
        let settings = settings_from_defaults(&EditorDefaults::default()).unwrap();
        assert_eq!(settings, Settings::default());

        let custom = EditorDefaults {
            snap_mode: "half".into(),
            placement_mode: "careful".into(),
            ..EditorDefaults::default()
        };
        let settings = settings_from_defaults(&custom).unwrap();
        assert_eq!(settings.snap_mode, SnapMode::Half);
        assert_eq!(settings.placement_mode, PlacementMode::Careful);
    }

    #[test]
    fn test_bad_defaults_are_config_errors() {
        let bad = EditorDefaults {
            snap_mode: "diagonal".into(),
            ..EditorDefaults::default()
        };
        assert!(matches!(
            settings_from_defaults(&bad),
            Err(DrillError::Config { .. })
        ));

        let empty_field = EditorDefaults {
            field_width_m: 0.0,
            ..EditorDefaults::default()
        };
        assert!(settings_from_defaults(&empty_field).is_err());
    }
}
