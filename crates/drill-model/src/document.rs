//! The serialized drill document.
//!
//! A document is what the persistence/collaboration side hands to the
//! engine (`restore_state`) and reads back for saving. The engine itself
//! never touches the filesystem; these helpers are for tools and tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::geometry::WorldPos;
use crate::performer::{Performer, PerformerId};
use crate::set::{DrillSet, SetId};
use crate::settings::Settings;

/// Current document schema version.
pub const DOCUMENT_VERSION: &str = "1.0";

/// A complete drill: roster, timeline, selection and settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillDocument {
    /// Schema version.
    pub version: String,

    /// Human-readable drill title.
    pub title: String,

    /// Tempo used for playback (one count per beat).
    pub bpm: f64,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,

    /// Last modified timestamp (ISO 8601).
    pub modified_at: String,

    /// Ordered roster.
    pub performers: Vec<Performer>,

    /// Sets, ascending by start count.
    pub sets: Vec<DrillSet>,

    /// Selected performers, leader first.
    #[serde(default)]
    pub selection: Vec<PerformerId>,

    /// Set being edited.
    #[serde(default)]
    pub active_set_id: Option<SetId>,

    /// Field and editing settings.
    #[serde(default)]
    pub settings: Settings,
}

impl DrillDocument {
    /// An empty drill with defaults.
    pub fn new(title: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: DOCUMENT_VERSION.to_string(),
            title: title.into(),
            bpm: 120.0,
            created_at: now.clone(),
            modified_at: now,
            performers: vec![],
            sets: vec![],
            selection: vec![],
            active_set_id: None,
            settings: Settings::default(),
        }
    }

    /// A small two-performer drill with three sets, handy for smoke tests.
    pub fn sample() -> Self {
        let mut doc = Self::new("Sample Drill");
        doc.bpm = 144.0;
        doc.performers = vec![
            Performer::new("m1", "Flute 1", "Flute").with_color("#ff7675"),
            Performer::new("m2", "Trumpet 1", "Trumpet").with_color("#74b9ff"),
        ];

        let frames: [(u32, [(f64, f64); 2]); 3] = [
            (0, [(10.0, 10.0), (10.0, 20.0)]),
            (16, [(20.0, 10.0), (20.0, 25.0)]),
            (32, [(30.0, 15.0), (30.0, 30.0)]),
        ];
        for (idx, (count, coords)) in frames.iter().enumerate() {
            let mut set = DrillSet::new(SetId::new(format!("set-{}", idx + 1)), *count);
            set.name = format!("Set {}", idx + 1);
            set.positions = doc
                .performers
                .iter()
                .zip(coords.iter())
                .map(|(p, (x, y))| (p.id.clone(), WorldPos::new(*x, *y)))
                .collect::<HashMap<_, _>>();
            doc.sets.push(set);
        }
        doc.active_set_id = doc.sets.first().map(|s| s.id.clone());
        doc
    }

    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a document from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref().to_path_buf();
        let json = std::fs::read_to_string(&path).map_err(|e| DocumentError::IoError {
            path: path.clone(),
            source: e,
        })?;
        let doc = Self::from_json(&json).map_err(|e| DocumentError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        if doc.version != DOCUMENT_VERSION {
            return Err(DocumentError::ValidationError {
                message: format!(
                    "unsupported document version {} in {}",
                    doc.version,
                    path.display()
                ),
            });
        }
        Ok(doc)
    }

    /// Save the document, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DocumentError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| DocumentError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| DocumentError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Stamp the modification time.
    pub fn touch(&mut self) {
        self.modified_at = chrono::Utc::now().to_rfc3339();
    }

    /// Look up a roster entry.
    pub fn performer(&self, id: &PerformerId) -> Option<&Performer> {
        self.performers.iter().find(|p| &p.id == id)
    }
}

/// Errors that can occur when reading or writing drill documents.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid document: {message}")]
    ValidationError { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_document() {
        let doc = DrillDocument::sample();
        assert_eq!(doc.performers.len(), 2);
        assert_eq!(doc.sets.len(), 3);
        assert_eq!(doc.sets[1].start_count, 16);
        assert_eq!(
            doc.sets[1].position(&PerformerId::from("m2")),
            Some(&WorldPos::new(20.0, 25.0))
        );
        assert_eq!(doc.active_set_id, Some(SetId::from("set-1")));
    }

    #[test]
    fn test_document_serialization() {
        let doc = DrillDocument::sample();
        let json = serde_json::to_string_pretty(&doc).unwrap();
        let parsed = DrillDocument::from_json(&json).unwrap();
        assert_eq!(parsed.title, "Sample Drill");
        assert_eq!(parsed.sets, doc.sets);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join("drillcraft_test_document");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("drill.json");

        DrillDocument::sample().save(&path).unwrap();
        let loaded = DrillDocument::load(&path).unwrap();
        assert_eq!(loaded.performers.len(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = DrillDocument::load("/nonexistent/drillcraft/drill.json").unwrap_err();
        assert!(matches!(err, DocumentError::IoError { .. }));
    }
}
