//! Run configuration.
//!
//! Stored as a JSON object on disk; every field is optional:
//! ```json
//! {
//!   "raters": ["Kevin", "Nate", "Jon", "Josh"],
//!   "data_dir": "data",
//!   "catalog": { "delay_ms": 100 }
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Largest batch the collection endpoint accepts.
pub const MAX_BATCH_SIZE: usize = 75;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rater identifiers in join order.
    pub raters: Vec<String>,
    /// Directory holding one ratings file per rater.
    pub data_dir: PathBuf,
    /// Ratings file extension, without the dot.
    pub extension: String,
    /// Intermediate analysis file, read back by the enricher.
    pub analysis_output: PathBuf,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub url: String,
    pub output: PathBuf,
    pub batch_size: usize,
    /// Pause between batch requests.
    pub delay_ms: u64,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raters: Vec::new(),
            data_dir: PathBuf::from("data"),
            extension: "csv".to_string(),
            analysis_output: PathBuf::from("analysis_results.json"),
            catalog: CatalogConfig::default(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: "https://api.scryfall.com/cards/collection".to_string(),
            output: PathBuf::from("scryfall_data.json"),
            batch_size: MAX_BATCH_SIZE,
            delay_ms: 100,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: concat!("card_rater/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Path of the ratings file for `rater`.
    pub fn ratings_path(&self, rater: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", rater, self.extension))
    }
}

impl CatalogConfig {
    /// Batch size clamped to what the endpoint accepts.
    pub fn effective_batch_size(&self) -> usize {
        match self.batch_size {
            0 => {
                warn!("catalog batch_size of 0 raised to 1");
                1
            }
            n if n > MAX_BATCH_SIZE => {
                warn!(
                    requested = n,
                    max = MAX_BATCH_SIZE,
                    "catalog batch_size exceeds remote limit, clamping"
                );
                MAX_BATCH_SIZE
            }
            n => n,
        }
    }
}
