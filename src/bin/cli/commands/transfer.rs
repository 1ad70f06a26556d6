use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::app::App;
use deckhand_lib::hierarchy::HierarchySnapshot;

/// Write the deck forest as JSON to `output`, or stdout
pub fn run_export(app: &App, output: Option<&Path>) -> Result<()> {
    let snapshot = app
        .collection
        .export_hierarchy()
        .context("Failed to read hierarchy")?;
    let json = snapshot.to_json()?;

    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "Exported {} deck(s) to {}",
                snapshot.decks.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub fn run_import(app: &mut App, input: &Path) -> Result<()> {
    let json = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let snapshot = HierarchySnapshot::from_json(&json)
        .with_context(|| format!("{} is not a hierarchy export", input.display()))?;

    app.collection
        .import_hierarchy(&snapshot)
        .context("Failed to import hierarchy")?;
    println!("Imported {} deck(s)", snapshot.decks.len());
    Ok(())
}
