//! Drillcraft Drill Model
//!
//! Defines the core data contracts for drill (formation) design:
//! - **Geometry:** Field coordinates, grid snapping, and field clamping
//! - **Performers:** Roster identities the engine keys positions by
//! - **Sets:** Keyframed formations anchored at a count on the timeline
//! - **Curves:** Quadratic Bézier bindings of performers to a curve
//! - **Document:** The serialized drill exchanged with persistence
//!
//! All coordinates are in meters on a field whose origin `(0, 0)` is one
//! corner and whose extent comes from [`Settings`].

pub mod curve;
pub mod document;
pub mod geometry;
pub mod performer;
pub mod set;
pub mod settings;

pub use curve::*;
pub use document::*;
pub use geometry::*;
pub use performer::*;
pub use set::*;
pub use settings::*;
