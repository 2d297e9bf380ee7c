//! Write a sample drill document.

use std::path::PathBuf;

use drillcraft_common::AppConfig;
use drillcraft_engine::settings_from_defaults;
use drillcraft_model::DrillDocument;

pub fn run(path: PathBuf, title: String, force: bool, config: &AppConfig) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let mut doc = DrillDocument::sample();
    doc.title = title;
    doc.bpm = config.playback.bpm;
    doc.settings = settings_from_defaults(&config.editor)?;

    doc.save(&path)
        .map_err(|e| anyhow::anyhow!("Failed to write drill: {e}"))?;

    println!("Created drill '{}' at {}", doc.title, path.display());
    println!(
        "  Field: {}m x {}m ({} snap)",
        doc.settings.field_width, doc.settings.field_height, doc.settings.snap_mode
    );
    println!("  Performers: {}", doc.performers.len());
    println!("  Sets: {}", doc.sets.len());

    Ok(())
}
