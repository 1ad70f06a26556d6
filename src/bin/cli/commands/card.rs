use anyhow::{bail, Context, Result};

use crate::app::App;
use crate::render::{paint, Color};
use crate::OutputFormat;
use deckhand_lib::cards::{Card, CardUpdate, NewCard};
use deckhand_lib::{CardId, DeckId};

pub struct CardFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub front: Option<String>,
    pub back: Option<String>,
}

pub fn run_new(
    app: &mut App,
    deck: DeckId,
    title: String,
    fields: CardFields,
    format: &OutputFormat,
) -> Result<()> {
    let card = NewCard {
        deck,
        title,
        description: fields.description.unwrap_or_default(),
        front: fields.front.unwrap_or_default(),
        back: fields.back.unwrap_or_default(),
    };
    let id = app
        .collection
        .create_card(&card)
        .context("Failed to create card")?;
    let card = app.collection.get_card(id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => {
            println!("Created card \"{}\" ({})", card.title, card.id);
            let path = app.collection.deck_path(id)?;
            println!("  Deck: {}", app.deck_trail(&path)?);
        }
    }
    Ok(())
}

pub fn run_edit(
    app: &mut App,
    card: CardId,
    fields: CardFields,
    deck: Option<DeckId>,
    format: &OutputFormat,
) -> Result<()> {
    let update = CardUpdate {
        title: fields.title,
        description: fields.description,
        front: fields.front,
        back: fields.back,
        deck,
    };
    if update.is_empty() {
        bail!("Nothing to change. Pass at least one of --title, --description, --front, --back, --deck");
    }

    let card = app
        .collection
        .update_card(card, &update)
        .with_context(|| format!("Failed to update {}", card))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => println!("Updated card \"{}\" ({})", card.title, card.id),
    }
    Ok(())
}

pub fn run_rm(app: &mut App, card: CardId) -> Result<()> {
    app.collection
        .delete_card(card)
        .with_context(|| format!("Failed to delete {}", card))?;
    println!("Deleted {}", card);
    Ok(())
}

pub fn run_show(app: &App, card: CardId, format: &OutputFormat, use_color: bool) -> Result<()> {
    let detail = app
        .collection
        .get_card(card)
        .with_context(|| format!("Failed to load {}", card))?;
    let score = app.collection.score(card)?;
    let path = app.collection.deck_path(card)?;
    let stashes = app.collection.stashes_for_card(card)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "card": detail,
                "score": score,
                "deckPath": path,
                "stashes": stashes,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", paint(&detail.title, Color::BOLD, use_color));
            println!("  Deck: {}", app.deck_trail(&path)?);
            if !detail.description.is_empty() {
                println!("  {}", detail.description);
            }
            println!();
            println!("  Front: {}", detail.front);
            println!("  Back:  {}", detail.back);
            println!();
            println!(
                "  Score {:.2} ({} pass / {} fail, {} reviews)",
                score.score, score.success, score.fail, score.times_reviewed
            );
            if !stashes.is_empty() {
                let names: Vec<_> = stashes.iter().map(|s| s.name.as_str()).collect();
                println!("  Stashes: {}", names.join(", "));
            }
        }
    }
    Ok(())
}

pub fn run_ls(
    app: &App,
    deck: DeckId,
    recursive: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let cards = app
        .collection
        .cards_in_deck(deck, recursive)
        .with_context(|| format!("Failed to list cards in {}", deck))?;
    print_cards(&cards, format, use_color)
}

pub fn print_cards(cards: &[Card], format: &OutputFormat, use_color: bool) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(cards)?),
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("(no cards)");
            }
            for card in cards {
                let id = paint(&format!("#{:<5}", card.id.get()), Color::DIM, use_color);
                println!("{} {}", id, card.title);
            }
        }
    }
    Ok(())
}
