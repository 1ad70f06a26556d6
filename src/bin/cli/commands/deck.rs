use anyhow::{Context, Result};

use crate::app::App;
use crate::render::{paint, Color, BRANCH, GAP, LAST_BRANCH, PIPE};
use crate::OutputFormat;
use deckhand_lib::hierarchy::{DeckNode, DeckUpdate};
use deckhand_lib::DeckId;

pub fn run_new(
    app: &mut App,
    name: &str,
    description: Option<&str>,
    parent: Option<DeckId>,
    format: &OutputFormat,
) -> Result<()> {
    let id = app
        .collection
        .create_deck(name, description.unwrap_or_default(), parent)
        .context("Failed to create deck")?;

    match format {
        OutputFormat::Json => {
            let deck = app.deck(id)?;
            let output = serde_json::json!({
                "deck": deck,
                "parent": parent,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Created deck \"{}\" ({})", name, id);
            if let Some(parent) = parent {
                println!("  Parent: {}", app.deck(parent)?.name);
            }
        }
    }
    Ok(())
}

pub fn run_attach(app: &mut App, parent: DeckId, child: DeckId) -> Result<()> {
    app.collection
        .attach_child(parent, child)
        .with_context(|| format!("Failed to attach {} under {}", child, parent))?;
    println!("Attached {} under {}", child, parent);
    Ok(())
}

pub fn run_move(app: &mut App, deck: DeckId, to: Option<DeckId>) -> Result<()> {
    match to {
        Some(parent) => {
            app.collection
                .move_subtree(deck, parent)
                .with_context(|| format!("Failed to move {} under {}", deck, parent))?;
            println!("Moved {} under {}", deck, parent);
        }
        None => {
            app.collection
                .detach_subtree(deck)
                .with_context(|| format!("Failed to detach {}", deck))?;
            println!("{} is now a top-level deck", deck);
        }
    }
    Ok(())
}

pub fn run_edit(
    app: &mut App,
    deck: DeckId,
    name: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let update = DeckUpdate { name, description };
    let node = app
        .collection
        .update_deck(deck, &update)
        .with_context(|| format!("Failed to update {}", deck))?;
    println!("Updated {} \"{}\"", node.id, node.name);
    Ok(())
}

pub fn run_rm(app: &mut App, deck: DeckId) -> Result<()> {
    let removed = app
        .collection
        .delete_deck(deck)
        .with_context(|| format!("Failed to delete {}", deck))?;
    println!("Deleted {} deck(s)", removed.len());
    Ok(())
}

pub fn run_tree(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let snapshot = app
                .collection
                .export_hierarchy()
                .context("Failed to read hierarchy")?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        OutputFormat::Plain => {
            let roots = app.collection.roots().context("Failed to list decks")?;
            if roots.is_empty() {
                println!("(no decks)");
            }
            for root in &roots {
                print_label(app, root, "", "", use_color)?;
                print_children(app, root.id, "", use_color)?;
            }
        }
    }
    Ok(())
}

fn print_label(
    app: &App,
    deck: &DeckNode,
    prefix: &str,
    connector: &str,
    use_color: bool,
) -> Result<()> {
    let cards = app.collection.cards_in_deck(deck.id, false)?.len();
    let id = paint(&format!("#{}", deck.id.get()), Color::DIM, use_color);
    println!(
        "{}{}{} {} ({} cards)",
        prefix,
        connector,
        paint(&deck.name, Color::BOLD, use_color),
        id,
        cards
    );
    Ok(())
}

fn print_children(app: &App, deck: DeckId, prefix: &str, use_color: bool) -> Result<()> {
    let children = app.collection.children(deck)?;
    let total = children.len();

    for (idx, child) in children.into_iter().enumerate() {
        let is_last = idx + 1 == total;
        let node = app.deck(child)?;
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        print_label(app, &node, prefix, connector, use_color)?;

        let child_prefix = format!("{}{}", prefix, if is_last { GAP } else { PIPE });
        print_children(app, child, &child_prefix, use_color)?;
    }
    Ok(())
}
