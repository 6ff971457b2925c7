//! Trait and types for batch card lookups against a remote catalog.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One entry of a collection lookup request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardIdentifier {
    pub name: String,
}

impl CardIdentifier {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Body returned by the collection endpoint. Records are passed through untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionResponse {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub not_found: Vec<Value>,
}

impl CollectionResponse {
    /// Names of unmatched identifiers; entries without a name report as `Unknown`.
    pub fn not_found_names(&self) -> Vec<String> {
        self.not_found
            .iter()
            .map(|item| {
                item.get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown")
                    .to_string()
            })
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("could not decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Abstraction over a card catalog provider (e.g., Scryfall).
#[async_trait::async_trait]
pub trait CatalogApi: Send + Sync {
    /// Looks up one batch of identifiers in a single request.
    async fn lookup(
        &self,
        identifiers: &[CardIdentifier],
    ) -> Result<CollectionResponse, CatalogError>;
}
