//! Catalog enrichment: looks up every analyzed card in batches and stores
//! the matched records.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::CatalogConfig;
use crate::output::write_catalog;
use crate::services::catalog_api::{CardIdentifier, CatalogApi, CatalogError};

static FACE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*//\s*").expect("face split pattern is valid"));

#[derive(Deserialize)]
struct AnalysisFile {
    all_cards: Option<Vec<CardEntry>>,
}

#[derive(Deserialize)]
struct CardEntry {
    #[serde(rename = "Name")]
    name: Option<String>,
}

/// Outcome of one enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub cards: usize,
    pub batches: usize,
    pub failed_batches: usize,
    pub records: usize,
    pub not_found: usize,
    /// Whether the output file was written.
    pub written: bool,
}

/// Front face of a multi-faced card name: the text before the first `//`.
pub fn front_face(name: &str) -> &str {
    FACE_SPLIT.split(name).next().unwrap_or(name)
}

/// Reads card names from the analysis results file.
///
/// A missing, undecodable or card-less file is an error.
pub fn read_card_names(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        bail!(
            "Could not find {}. Run the analyze command first.",
            path.display()
        );
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let file: AnalysisFile = serde_json::from_str(&content)
        .with_context(|| format!("Could not decode JSON from '{}'", path.display()))?;

    let Some(cards) = file.all_cards else {
        bail!("'all_cards' key not found in '{}'", path.display());
    };

    let names: Vec<String> = cards.into_iter().filter_map(|c| c.name).collect();
    if names.is_empty() {
        bail!("No cards found in 'all_cards'. Nothing to fetch.");
    }
    Ok(names)
}

/// Lookup identifiers for each name, resolved to the front face.
pub fn lookup_identifiers(names: &[String]) -> Vec<CardIdentifier> {
    names
        .iter()
        .map(|name| CardIdentifier::named(front_face(name)))
        .collect()
}

/// Looks up `identifiers` in batches of `batch_size`, one request per batch.
///
/// A failed batch is logged and skipped; the rest still run.
pub async fn fetch_records<A: CatalogApi>(
    api: &A,
    identifiers: &[CardIdentifier],
    batch_size: usize,
    delay: Duration,
) -> (Vec<Value>, EnrichSummary) {
    let mut records = Vec::new();
    let mut summary = EnrichSummary {
        cards: identifiers.len(),
        ..EnrichSummary::default()
    };

    for (idx, chunk) in identifiers.chunks(batch_size.max(1)).enumerate() {
        if idx > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let batch = idx + 1;
        summary.batches += 1;
        info!(batch, size = chunk.len(), "Fetching batch");

        match api.lookup(chunk).await {
            Ok(resp) => {
                let missing = resp.not_found_names();
                if !missing.is_empty() {
                    warn!(batch, names = ?missing, "Could not find catalog data");
                    summary.not_found += missing.len();
                }
                records.extend(resp.data);
            }
            Err(CatalogError::Status { status, body }) => {
                error!(batch, status = status.as_u16(), response = %body, "Catalog HTTP error");
                summary.failed_batches += 1;
            }
            Err(e) => {
                error!(batch, error = %e, "Catalog request failed");
                summary.failed_batches += 1;
            }
        }
    }

    summary.records = records.len();
    info!(records = summary.records, "Catalog fetch finished");
    (records, summary)
}

/// Reads `input`, fetches catalog records for every card and writes them to
/// `config.output`. Nothing is written when no records were fetched.
#[tracing::instrument(skip(api, config, input), fields(input = %input.display()))]
pub async fn enrich<A: CatalogApi>(
    api: &A,
    config: &CatalogConfig,
    input: &Path,
) -> Result<EnrichSummary> {
    let names = read_card_names(input)?;
    let identifiers = lookup_identifiers(&names);
    info!(cards = identifiers.len(), "Cards to fetch");

    let (records, mut summary) = fetch_records(
        api,
        &identifiers,
        config.effective_batch_size(),
        Duration::from_millis(config.delay_ms),
    )
    .await;

    if records.is_empty() {
        warn!("No data was fetched from the catalog. Output file not written.");
        return Ok(summary);
    }

    write_catalog(&config.output, &records)?;
    summary.written = true;
    Ok(summary)
}
