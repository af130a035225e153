// file: src/search/mod.rs
// description: Google Custom Search client and excerpt enrichment loop
// reference: https://developers.google.com/custom-search/v1/overview

use crate::config::SearchConfig;
use crate::error::{AppError, Result};
use crate::fetcher::ContentFetcher;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One hit as returned by the Custom Search JSON API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchItem {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

/// A search hit augmented with a fetched excerpt of its target page.
///
/// Transient: built per item, rendered once, discarded.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug)]
pub struct WebSearchClient {
    client: Client,
    endpoint: String,
    api_key: String,
    engine_id: String,
    num_results: usize,
}

impl WebSearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::Config("GOOGLE_API_KEY is not set".to_string()))?;
        let engine_id = config
            .engine_id
            .clone()
            .ok_or_else(|| AppError::Config("GOOGLE_SEARCH_ENGINE_ID is not set".to_string()))?;

        Ok(Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            api_key,
            engine_id,
            num_results: config.num_results,
        })
    }

    /// Run one search query and return the raw hits (possibly empty).
    pub async fn search(&self, query: &str) -> Result<Vec<SearchItem>> {
        debug!("searching for: {}", query);

        let num = self.num_results.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Api {
                service: "search",
                status,
                body,
            });
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| AppError::Parse {
            service: "search",
            message: e.to_string(),
        })?;

        debug!("search returned {} items", parsed.items.len());
        Ok(parsed.items)
    }

    /// Fetch an excerpt for each hit in turn. A hit whose page cannot be
    /// fetched keeps an empty body rather than dropping out of the list.
    pub async fn enrich(
        &self,
        items: Vec<SearchItem>,
        fetcher: &ContentFetcher,
    ) -> Vec<EnrichedResult> {
        let mut enriched = Vec::with_capacity(items.len());
        for item in items {
            let body = fetcher.fetch_excerpt(&item.link).await;
            enriched.push(EnrichedResult {
                title: item.title,
                link: item.link,
                snippet: item.snippet,
                body,
            });
        }
        enriched
    }

    /// Search and enrich in one pass: the shape both apps consume.
    pub async fn search_enriched(
        &self,
        query: &str,
        fetcher: &ContentFetcher,
    ) -> Result<Vec<EnrichedResult>> {
        let items = self.search(query).await?;
        Ok(self.enrich(items, fetcher).await)
    }
}
