mod app;
mod commands;
mod render;

use std::path::PathBuf;
use std::str::FromStr;

use chrono::Duration;
use clap::{Parser, Subcommand};

use commands::card::CardFields;
use deckhand_lib::{CardId, DeckId, RankStrategy, ReviewScope, StashId};

#[derive(Parser)]
#[command(name = "deckhand-cli", about = "Deckhand flashcard decks and reviews", version)]
struct Cli {
    /// Data directory holding deckhand.toml and the collection (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// `deck:ID`, `stash:ID`, or a bare deck id
#[derive(Clone, Copy, Debug)]
struct ScopeArg(ReviewScope);

impl FromStr for ScopeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s.split_once(':').unwrap_or(("deck", s));
        let id: i64 = id
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a valid id", id))?;
        match kind.trim().to_ascii_lowercase().as_str() {
            "deck" => Ok(Self(ReviewScope::Deck(DeckId(id)))),
            "stash" => Ok(Self(ReviewScope::Stash(StashId(id)))),
            other => Err(format!("unknown scope '{}', expected deck or stash", other)),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Create, arrange and list decks
    #[command(subcommand)]
    Deck(DeckCommand),

    /// Create, edit and list cards
    #[command(subcommand)]
    Card(CardCommand),

    /// Manage stashes and their cards
    #[command(subcommand)]
    Stash(StashCommand),

    /// Show the card to review next
    Next {
        /// Scope to draw from: deck:ID, stash:ID, or a deck id
        scope: ScopeArg,
        /// Ranking strategy (none, age, urgency)
        #[arg(long)]
        strategy: Option<RankStrategy>,
        /// Number of eligible cards considered
        #[arg(long)]
        window: Option<u32>,
        /// Eligible cards skipped before the window
        #[arg(long)]
        offset: Option<u32>,
        /// Seconds a reviewed card rests before it is eligible again
        #[arg(long)]
        age_secs: Option<i64>,
    },

    /// Show how many cards in a scope are new and due
    Counts {
        /// Scope to count: deck:ID, stash:ID, or a deck id
        scope: ScopeArg,
    },

    /// Record the result of reviewing a card
    Review {
        card: i64,
        /// The card was recalled
        #[arg(long, conflicts_with = "fail", required_unless_present = "fail")]
        pass: bool,
        /// The card was not recalled
        #[arg(long)]
        fail: bool,
        /// Note stored with this review
        #[arg(long)]
        note: Option<String>,
    },

    /// Put a card back without reviewing it
    Skip { card: i64 },

    /// Show the review history of a card
    History { card: i64 },

    /// Export the deck hierarchy as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import a deck hierarchy into an empty collection
    Import { input: PathBuf },
}

#[derive(Subcommand)]
enum DeckCommand {
    /// Create a deck
    New {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Parent deck id
        #[arg(long)]
        parent: Option<i64>,
    },
    /// Attach a top-level deck under a parent
    Attach { parent: i64, child: i64 },
    /// Move a deck and everything under it
    Move {
        deck: i64,
        /// New parent deck id; omit to make the deck top-level
        #[arg(long)]
        to: Option<i64>,
    },
    /// Rename a deck or change its description
    Edit {
        deck: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a deck with all decks and cards under it
    Rm { deck: i64 },
    /// Show the deck tree
    Tree,
}

#[derive(Subcommand)]
enum CardCommand {
    /// Create a card in a deck
    New {
        deck: i64,
        title: String,
        #[arg(long)]
        front: Option<String>,
        #[arg(long)]
        back: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Change a card's text or move it to another deck
    Edit {
        card: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        front: Option<String>,
        #[arg(long)]
        back: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        deck: Option<i64>,
    },
    /// Delete a card
    Rm { card: i64 },
    /// Show a card with its score
    Show { card: i64 },
    /// List cards in a deck
    Ls {
        deck: i64,
        /// Include cards in sub-decks
        #[arg(long, short)]
        recursive: bool,
    },
}

#[derive(Subcommand)]
enum StashCommand {
    /// Create a stash
    New {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Add a card to a stash
    Add { stash: i64, card: i64 },
    /// Remove a card from a stash
    Rm { stash: i64, card: i64 },
    /// Delete a stash (its cards are kept)
    Delete { stash: i64 },
    /// List stashes, or the cards of one stash
    Ls { stash: Option<i64> },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let mut app = app::App::new(cli.data_dir.as_deref())?;
    log::debug!("Using data directory {}", app.data_dir.display());

    match cli.command {
        Command::Deck(subcmd) => match subcmd {
            DeckCommand::New { name, description, parent } => {
                commands::deck::run_new(
                    &mut app,
                    &name,
                    description.as_deref(),
                    parent.map(DeckId),
                    &cli.format,
                )?;
            }
            DeckCommand::Attach { parent, child } => {
                commands::deck::run_attach(&mut app, DeckId(parent), DeckId(child))?;
            }
            DeckCommand::Move { deck, to } => {
                commands::deck::run_move(&mut app, DeckId(deck), to.map(DeckId))?;
            }
            DeckCommand::Edit { deck, name, description } => {
                commands::deck::run_edit(&mut app, DeckId(deck), name, description)?;
            }
            DeckCommand::Rm { deck } => {
                commands::deck::run_rm(&mut app, DeckId(deck))?;
            }
            DeckCommand::Tree => {
                commands::deck::run_tree(&app, &cli.format, use_color)?;
            }
        },
        Command::Card(subcmd) => match subcmd {
            CardCommand::New { deck, title, front, back, description } => {
                let fields = CardFields { title: None, description, front, back };
                commands::card::run_new(&mut app, DeckId(deck), title, fields, &cli.format)?;
            }
            CardCommand::Edit { card, title, front, back, description, deck } => {
                let fields = CardFields { title, description, front, back };
                commands::card::run_edit(
                    &mut app,
                    CardId(card),
                    fields,
                    deck.map(DeckId),
                    &cli.format,
                )?;
            }
            CardCommand::Rm { card } => {
                commands::card::run_rm(&mut app, CardId(card))?;
            }
            CardCommand::Show { card } => {
                commands::card::run_show(&app, CardId(card), &cli.format, use_color)?;
            }
            CardCommand::Ls { deck, recursive } => {
                commands::card::run_ls(&app, DeckId(deck), recursive, &cli.format, use_color)?;
            }
        },
        Command::Stash(subcmd) => match subcmd {
            StashCommand::New { name, description } => {
                commands::stash::run_new(&mut app, &name, description.as_deref(), &cli.format)?;
            }
            StashCommand::Add { stash, card } => {
                commands::stash::run_add(&mut app, StashId(stash), CardId(card))?;
            }
            StashCommand::Rm { stash, card } => {
                commands::stash::run_rm(&mut app, StashId(stash), CardId(card))?;
            }
            StashCommand::Delete { stash } => {
                commands::stash::run_delete(&mut app, StashId(stash))?;
            }
            StashCommand::Ls { stash } => {
                commands::stash::run_ls(&app, stash.map(StashId), &cli.format, use_color)?;
            }
        },
        Command::Next { scope, strategy, window, offset, age_secs } => {
            let mut options = *app.collection.review_options();
            if let Some(strategy) = strategy {
                options.strategy = strategy;
            }
            if let Some(window) = window {
                options.purgatory_size = window;
            }
            if let Some(offset) = offset {
                options.purgatory_index = offset;
            }
            if let Some(secs) = age_secs {
                options.age_of_consent = Duration::seconds(secs.clamp(0, i64::MAX / 1_000));
            }
            commands::review::run_next(&mut app, scope.0, &options, &cli.format, use_color)?;
        }
        Command::Counts { scope } => {
            commands::review::run_counts(&app, scope.0, &cli.format, use_color)?;
        }
        Command::Review { card, pass, fail: _, note } => {
            commands::review::run_review(
                &mut app,
                CardId(card),
                pass,
                note.as_deref(),
                &cli.format,
                use_color,
            )?;
        }
        Command::Skip { card } => {
            commands::review::run_skip(&mut app, CardId(card))?;
        }
        Command::History { card } => {
            commands::review::run_history(&app, CardId(card), &cli.format, use_color)?;
        }
        Command::Export { output } => {
            commands::transfer::run_export(&app, output.as_deref())?;
        }
        Command::Import { input } => {
            commands::transfer::run_import(&mut app, &input)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdout())
}
