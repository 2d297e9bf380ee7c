//! Print resolved positions at a count.

use std::path::PathBuf;

use drillcraft_engine::TimelineStore;
use serde::Serialize;

use super::load_document;

#[derive(Serialize)]
struct Row {
    id: String,
    name: String,
    x: f64,
    y: f64,
}

pub fn run(path: PathBuf, count: f64, json: bool) -> anyhow::Result<()> {
    let doc = load_document(&path)?;
    let store = TimelineStore::from_document(&doc);
    let resolved = store.resolve(count);

    // Roster order, then anything the roster does not list.
    let mut rows: Vec<Row> = doc
        .performers
        .iter()
        .filter_map(|p| {
            resolved.get(&p.id).map(|pos| Row {
                id: p.id.to_string(),
                name: p.name.clone(),
                x: pos.x,
                y: pos.y,
            })
        })
        .collect();
    let mut extra: Vec<Row> = resolved
        .iter()
        .filter(|(id, _)| doc.performer(id).is_none())
        .map(|(id, pos)| Row {
            id: id.to_string(),
            name: String::new(),
            x: pos.x,
            y: pos.y,
        })
        .collect();
    extra.sort_by(|a, b| a.id.cmp(&b.id));
    rows.extend(extra);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Positions at count {count}:");
    for row in &rows {
        println!("  {:<10} {:<16} ({:>6.2}, {:>6.2})", row.id, row.name, row.x, row.y);
    }
    if rows.is_empty() {
        println!("  (no keyframes)");
    }
    Ok(())
}
