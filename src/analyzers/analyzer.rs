use crate::analyzers::aggregate::aggregate;
use crate::analyzers::types::AnalysisResults;
use crate::config::Config;
use crate::loader::{RaterTable, load_ratings};
use crate::merge::merge;
use crate::output::write_results;
use anyhow::{Result, bail};
use std::collections::HashSet;
use tracing::info;

/// Loads every configured rater, merges and aggregates their ratings, and
/// writes the bundle to `config.analysis_output`.
pub fn analyze(config: &Config) -> Result<AnalysisResults> {
    let results = build_results(config)?;
    write_results(&config.analysis_output, &results)?;
    Ok(results)
}

/// Same as [`analyze`] without writing anything.
pub fn build_results(config: &Config) -> Result<AnalysisResults> {
    if config.raters.is_empty() {
        bail!("No raters configured; pass --rater or set \"raters\" in the config file");
    }

    let mut seen = HashSet::new();
    if let Some(dup) = config.raters.iter().find(|r| !seen.insert(r.as_str())) {
        bail!("Rater '{dup}' is listed more than once");
    }

    let tables: Vec<RaterTable> = config
        .raters
        .iter()
        .map(|rater| {
            info!(rater = %rater, "Loading ratings");
            load_ratings(&config.ratings_path(rater), rater)
        })
        .collect();

    let mut merged = merge(&tables);
    merged.exclude_basic_lands();

    info!(cards = merged.cards.len(), "Ratings merged");
    Ok(aggregate(&merged))
}
