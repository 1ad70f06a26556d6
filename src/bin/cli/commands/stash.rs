use anyhow::{Context, Result};

use crate::app::App;
use crate::commands::card::print_cards;
use crate::render::{paint, Color};
use crate::OutputFormat;
use deckhand_lib::{CardId, StashId};

pub fn run_new(
    app: &mut App,
    name: &str,
    description: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let id = app
        .collection
        .create_stash(name, description.unwrap_or_default())
        .context("Failed to create stash")?;

    match format {
        OutputFormat::Json => {
            let stash = app.collection.get_stash(id)?;
            println!("{}", serde_json::to_string_pretty(&stash)?);
        }
        OutputFormat::Plain => println!("Created stash \"{}\" ({})", name, id),
    }
    Ok(())
}

pub fn run_add(app: &mut App, stash: StashId, card: CardId) -> Result<()> {
    let added = app
        .collection
        .add_to_stash(stash, card)
        .with_context(|| format!("Failed to add {} to {}", card, stash))?;
    if added {
        println!("Added {} to {}", card, stash);
    } else {
        println!("{} is already in {}", card, stash);
    }
    Ok(())
}

pub fn run_rm(app: &mut App, stash: StashId, card: CardId) -> Result<()> {
    let removed = app
        .collection
        .remove_from_stash(stash, card)
        .with_context(|| format!("Failed to remove {} from {}", card, stash))?;
    if removed {
        println!("Removed {} from {}", card, stash);
    } else {
        println!("{} was not in {}", card, stash);
    }
    Ok(())
}

pub fn run_delete(app: &mut App, stash: StashId) -> Result<()> {
    app.collection
        .delete_stash(stash)
        .with_context(|| format!("Failed to delete {}", stash))?;
    println!("Deleted {}", stash);
    Ok(())
}

pub fn run_ls(
    app: &App,
    stash: Option<StashId>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    if let Some(stash) = stash {
        let cards = app
            .collection
            .stash_cards(stash)
            .with_context(|| format!("Failed to list {}", stash))?;
        return print_cards(&cards, format, use_color);
    }

    let stashes = app.collection.list_stashes().context("Failed to list stashes")?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stashes)?),
        OutputFormat::Plain => {
            if stashes.is_empty() {
                println!("(no stashes)");
            }
            for stash in &stashes {
                let count = app.collection.stash_cards(stash.id)?.len();
                let id = paint(&format!("#{:<5}", stash.id.get()), Color::DIM, use_color);
                println!("{} {} ({} cards)", id, stash.name, count);
            }
        }
    }
    Ok(())
}
