//! Drillcraft Common Utilities
//!
//! Shared infrastructure for all Drillcraft crates:
//! - Error types and result aliases
//! - Count/time conversion and tick pacing for playback
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
