use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::HeaderValue;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::fetch::{BasicClient, HttpClient, post_json};
use crate::services::catalog_api::{
    CardIdentifier, CatalogApi, CatalogError, CollectionResponse,
};

#[derive(Serialize)]
struct CollectionRequest<'a> {
    identifiers: &'a [CardIdentifier],
}

/// Client for the Scryfall `/cards/collection` endpoint.
pub struct ScryfallClient<C = BasicClient> {
    http: C,
    url: Url,
    user_agent: HeaderValue,
}

impl ScryfallClient<BasicClient> {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let http = BasicClient::with_timeouts(
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.connect_timeout_secs),
        )?;
        Self::with_client(http, config)
    }
}

impl<C: HttpClient> ScryfallClient<C> {
    pub fn with_client(http: C, config: &CatalogConfig) -> Result<Self> {
        let url = Url::parse(&config.url)
            .with_context(|| format!("Invalid catalog url '{}'", config.url))?;
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .with_context(|| format!("Invalid user agent '{}'", config.user_agent))?;
        Ok(Self {
            http,
            url,
            user_agent,
        })
    }
}

#[async_trait]
impl<C: HttpClient> CatalogApi for ScryfallClient<C> {
    async fn lookup(
        &self,
        identifiers: &[CardIdentifier],
    ) -> Result<CollectionResponse, CatalogError> {
        let body = serde_json::to_vec(&CollectionRequest { identifiers })
            .map_err(CatalogError::Encode)?;

        let response = post_json(&self.http, self.url.clone(), body, &self.user_agent).await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(CatalogError::Status { status, body: text });
        }

        debug!(bytes = text.len(), "Collection response received");
        serde_json::from_str(&text).map_err(CatalogError::Decode)
    }
}
