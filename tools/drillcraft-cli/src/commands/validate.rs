//! Validate a drill document.

use std::path::PathBuf;

use drillcraft_engine::analysis::{collision_report, validate};

use super::load_document;

pub fn run(path: PathBuf, json: bool) -> anyhow::Result<()> {
    let doc = load_document(&path)?;
    let report = validate(&doc.sets, &doc.performers, &doc.settings);
    let collisions = collision_report(&doc.sets);

    if json {
        let out = serde_json::json!({
            "validation": report,
            "collisions": collisions,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Validating drill at: {}", path.display());
        println!("  Title: {}", doc.title);
        println!("  Performers: {}", doc.performers.len());
        println!("  Sets: {}", doc.sets.len());

        if report.issues.is_empty() {
            println!("\nNo structural issues.");
        } else {
            println!("\nValidation issues:");
            for issue in &report.issues {
                println!("  - [{:?}] {}: {}", issue.severity, issue.field, issue.message);
            }
        }

        if collisions.is_clear() {
            println!("No collisions.");
        } else {
            println!("\nCollisions ({}):", collisions.pairs.len());
            for pair in &collisions.pairs {
                println!(
                    "  - count {}: {} / {} at {:.2}m",
                    pair.start_count, pair.first, pair.second, pair.distance
                );
            }
        }
    }

    if !report.is_valid() {
        anyhow::bail!("{} error(s) found", report.errors().count());
    }
    Ok(())
}
