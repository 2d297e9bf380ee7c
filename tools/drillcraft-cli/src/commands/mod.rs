pub mod info;
pub mod init;
pub mod play;
pub mod resolve;
pub mod validate;

use std::path::Path;

use drillcraft_model::DrillDocument;

/// Load a drill document with a CLI-friendly error.
pub fn load_document(path: &Path) -> anyhow::Result<DrillDocument> {
    DrillDocument::load(path).map_err(|e| anyhow::anyhow!("Failed to load drill: {e}"))
}
