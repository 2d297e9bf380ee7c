//! Performer identities.
//!
//! The roster itself belongs to an external collaborator; the engine only
//! keys positions by [`PerformerId`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a performer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerformerId(pub String);

impl PerformerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PerformerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PerformerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PerformerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An ensemble member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performer {
    pub id: PerformerId,

    /// Display name (e.g. "Flute 1").
    pub name: String,

    /// Instrument section or part.
    pub part: String,

    /// Display color as a hex string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Performer {
    pub fn new(id: impl Into<PerformerId>, name: impl Into<String>, part: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            part: part.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
