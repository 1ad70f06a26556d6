//! On-disk configuration (`deckhand.toml` in the data directory)
//!
//! ```toml
//! [storage]
//! database = "/path/to/collection.db"
//! busy_timeout_ms = 5000
//!
//! [review]
//! age_of_consent_secs = 600
//! purgatory_size = 15
//! purgatory_index = 0
//! strategy = "urgency"
//!
//! [scoring]
//! prior = 0.5
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::scoring::{SmoothedRatio, DEFAULT_PRIOR};
use crate::review::{RankStrategy, ReviewOptions};

pub const CONFIG_FILE: &str = "deckhand.toml";
pub const DATABASE_FILE: &str = "collection.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),

    #[error("Could not determine data directory")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub review: ReviewConfig,
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Collection file; defaults to `collection.db` in the data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: None,
            busy_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    pub age_of_consent_secs: u64,
    pub purgatory_size: u32,
    pub purgatory_index: u32,
    pub strategy: RankStrategy,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            age_of_consent_secs: 600,
            purgatory_size: 15,
            purgatory_index: 0,
            strategy: RankStrategy::Urgency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Pseudo-count added to both successes and failures
    pub prior: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            prior: DEFAULT_PRIOR,
        }
    }
}

impl Config {
    /// Default data directory (e.g., ~/.local/share/deckhand)
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("deckhand"))
            .ok_or(ConfigError::DataDirNotFound)
    }

    /// Load `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load `deckhand.toml` from a data directory
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        Self::load(&data_dir.join(CONFIG_FILE))
    }

    pub fn validate(&self) -> Result<()> {
        if self.review.purgatory_size == 0 {
            return Err(ConfigError::Invalid(
                "review.purgatory_size must be at least 1".to_string(),
            ));
        }
        if !self.scoring.prior.is_finite() || self.scoring.prior < 0.0 {
            return Err(ConfigError::Invalid(
                "scoring.prior must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    /// Collection file to open for `data_dir`
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        match &self.storage.database {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => data_dir.join(path),
            None => data_dir.join(DATABASE_FILE),
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.storage.busy_timeout_ms)
    }

    pub fn review_options(&self) -> ReviewOptions {
        // chrono caps durations at i64::MAX milliseconds
        let age = self.review.age_of_consent_secs.min((i64::MAX / 1_000) as u64) as i64;
        ReviewOptions {
            age_of_consent: chrono::Duration::seconds(age),
            purgatory_size: self.review.purgatory_size,
            purgatory_index: self.review.purgatory_index,
            strategy: self.review.strategy,
        }
    }

    pub fn scoring(&self) -> SmoothedRatio {
        SmoothedRatio {
            prior: self.scoring.prior,
        }
    }
}
