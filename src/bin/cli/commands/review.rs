use anyhow::{Context, Result};

use crate::app::App;
use crate::render::{paint, Color};
use crate::OutputFormat;
use deckhand_lib::review::ReviewOptions;
use deckhand_lib::{CardId, ErrorKind, ReviewScope, StoreError};

pub fn run_next(
    app: &mut App,
    scope: ReviewScope,
    options: &ReviewOptions,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let pick = match app.collection.next_card_with(scope, options) {
        Ok(pick) => pick,
        Err(err) if matches!(err.kind(), ErrorKind::EmptyScope | ErrorKind::NoEligibleCandidates) => {
            return report_nothing(&err, format, use_color);
        }
        Err(err) => return Err(err).with_context(|| format!("Failed to pick a card from {}", scope)),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&pick)?),
        OutputFormat::Plain => {
            let path = app.collection.deck_path(pick.card.id)?;
            println!(
                "{} {}",
                paint(&pick.card.title, Color::BOLD, use_color),
                paint(&format!("#{}", pick.card.id.get()), Color::DIM, use_color)
            );
            println!("  Deck: {}", app.deck_trail(&path)?);
            println!();
            println!("  {}", pick.card.front);
            println!();
            println!(
                "  Score {:.2} after {} reviews{}",
                pick.score.score,
                pick.score.times_reviewed,
                if pick.cached { " (pinned)" } else { "" }
            );
        }
    }
    Ok(())
}

pub fn run_counts(
    app: &App,
    scope: ReviewScope,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let counts = app
        .collection
        .review_counts(scope)
        .with_context(|| format!("Failed to count cards in {}", scope))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&counts)?),
        OutputFormat::Plain => println!(
            "{}: {} new, {} due, {} total",
            paint(&scope.to_string(), Color::BOLD, use_color),
            counts.new,
            counts.due,
            counts.total
        ),
    }
    Ok(())
}

fn report_nothing(err: &StoreError, format: &OutputFormat, use_color: bool) -> Result<()> {
    let status = match err.kind() {
        ErrorKind::EmptyScope => "empty",
        _ => "nothing-due",
    };
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "status": status, "message": err.to_string() });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!("{}", paint(&err.to_string(), Color::YELLOW, use_color)),
    }
    Ok(())
}

pub fn run_review(
    app: &mut App,
    card: CardId,
    passed: bool,
    note: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let record = app
        .collection
        .record_outcome(card, passed, note)
        .with_context(|| format!("Failed to record review of {}", card))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Plain => {
            let verdict = if passed {
                paint("pass", Color::GREEN, use_color)
            } else {
                paint("fail", Color::RED, use_color)
            };
            println!(
                "Recorded {} for {}: score {:.2} ({} reviews)",
                verdict, card, record.score, record.times_reviewed
            );
        }
    }
    Ok(())
}

pub fn run_skip(app: &mut App, card: CardId) -> Result<()> {
    app.collection
        .skip_card(card)
        .with_context(|| format!("Failed to skip {}", card))?;
    println!("Skipped {}", card);
    Ok(())
}

pub fn run_history(app: &App, card: CardId, format: &OutputFormat, use_color: bool) -> Result<()> {
    let history = app
        .collection
        .history(card)
        .with_context(|| format!("Failed to read history of {}", card))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&history)?),
        OutputFormat::Plain => {
            if history.is_empty() {
                println!("(never reviewed)");
            }
            for entry in &history {
                let when = entry.occurred_at.format("%Y-%m-%d %H:%M:%S").to_string();
                println!(
                    "{}  {:>3} pass {:>3} fail  score {:.2}  {}",
                    paint(&when, Color::DIM, use_color),
                    entry.success,
                    entry.fail,
                    entry.score,
                    entry.changelog
                );
            }
        }
    }
    Ok(())
}
