//! Show drill information.

use std::path::PathBuf;

use drillcraft_common::count_to_secs;
use drillcraft_engine::analysis::movement_report;
use drillcraft_engine::TimelineStore;

use super::load_document;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let doc = load_document(&path)?;
    let store = TimelineStore::from_document(&doc);
    let max_count = store.max_count(&doc.settings);

    println!("Drill: {}", doc.title);
    println!("  Version: {}", doc.version);
    println!("  Created: {}", doc.created_at);
    println!("  Modified: {}", doc.modified_at);
    println!(
        "  Tempo: {} bpm ({} counts, {:.1}s)",
        doc.bpm,
        max_count,
        count_to_secs(max_count, doc.bpm)
    );
    println!();

    println!("Field:");
    println!(
        "  Size: {}m x {}m",
        doc.settings.field_width, doc.settings.field_height
    );
    println!("  Snap: {}", doc.settings.snap_mode);
    println!("  Placement: {:?}", doc.settings.placement_mode);
    println!();

    println!("Performers ({}):", doc.performers.len());
    for p in &doc.performers {
        println!("  {:<10} {:<16} {}", p.id, p.name, p.part);
    }
    println!();

    println!("Sets ({}):", store.sets().len());
    for set in store.sets() {
        let marker = if store.active_set_id() == Some(&set.id) {
            "*"
        } else {
            " "
        };
        println!(
            " {marker}{:<8} count {:>4}  {} positions, {} intermediate",
            set.name,
            set.start_count,
            set.positions.len(),
            set.positions_by_count.len()
        );
        if !set.note.is_empty() {
            println!("    note: {}", set.note);
        }
    }
    println!();

    let roster: Vec<_> = doc.performers.iter().map(|p| p.id.clone()).collect();
    let movement = movement_report(store.sets(), &roster);
    println!("Movement:");
    println!("  Total: {:.2}m", movement.total);
    println!("  Average: {:.2}m", movement.average);
    println!("  Max: {:.2}m  Min: {:.2}m", movement.max, movement.min);

    Ok(())
}
