//! JSON persistence for analysis results and catalog records.
//!
//! Output files are overwritten on every run.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::AnalysisResults;

/// Serializes `value` as four-space indented JSON, replacing any file at `path`.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    let mut ser = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut ser)
        .with_context(|| format!("Failed to serialize JSON for '{}'", path.display()))?;
    writer.flush()?;

    debug!(path = %path.display(), "JSON written");
    Ok(())
}

/// Writes the analysis bundle read back later by the enricher.
pub fn write_results(path: &Path, results: &AnalysisResults) -> Result<()> {
    write_json(path, results)?;
    info!(
        path = %path.display(),
        cards = results.all_cards.len(),
        "Analysis results written"
    );
    Ok(())
}

/// Writes fetched catalog records as a JSON array, passed through unchanged.
pub fn write_catalog(path: &Path, records: &[serde_json::Value]) -> Result<()> {
    write_json(path, &records)?;
    info!(path = %path.display(), records = records.len(), "Catalog data written");
    Ok(())
}
