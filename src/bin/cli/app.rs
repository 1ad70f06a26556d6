use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use deckhand_lib::config::Config;
use deckhand_lib::hierarchy::DeckNode;
use deckhand_lib::{Collection, DeckId};

/// Shared application state for CLI commands
pub struct App {
    pub data_dir: PathBuf,
    pub collection: Collection,
}

impl App {
    /// Open the collection in `data_dir`, or the default data directory
    pub fn new(data_dir: Option<&Path>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => Config::default_data_dir().context("Failed to get data directory")?,
        };

        let config = Config::load_from_dir(&data_dir)
            .with_context(|| format!("Failed to load config from {}", data_dir.display()))?;
        let collection = Collection::from_config(&config, &data_dir).with_context(|| {
            format!(
                "Failed to open collection at {}",
                config.database_path(&data_dir).display()
            )
        })?;

        Ok(Self {
            data_dir,
            collection,
        })
    }

    /// Deck names along a path, joined for display
    pub fn deck_trail(&self, path: &[DeckId]) -> Result<String> {
        let names = path
            .iter()
            .map(|id| self.deck(*id).map(|d| d.name))
            .collect::<Result<Vec<_>>>()?;
        Ok(names.join(" / "))
    }

    pub fn deck(&self, id: DeckId) -> Result<DeckNode> {
        self.collection
            .get_deck(id)
            .with_context(|| format!("Failed to load {}", id))
    }
}
