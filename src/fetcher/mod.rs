// file: src/fetcher/mod.rs
// description: page content fetcher producing bounded plain-text excerpts
// reference: https://docs.rs/reqwest

mod excerpt;

pub use excerpt::{excerpt, page_text};

use crate::config::FetcherConfig;
use crate::error::{AppError, Result};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Fetches a web page and reduces it to a word-bounded plain-text excerpt.
///
/// Failures of any kind (bad URL, connection error, non-success status,
/// unreadable body) yield an empty excerpt instead of an error, so a dead
/// link in a result list never aborts the surrounding loop.
pub struct ContentFetcher {
    client: reqwest::Client,
    max_chars: usize,
}

impl ContentFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            max_chars: config.max_chars,
        })
    }

    /// Fetch `url` and return an excerpt of its visible text, capped at the
    /// configured character budget and never cut mid-word. Returns an empty
    /// string on any failure.
    pub async fn fetch_excerpt(&self, url: &str) -> String {
        match self.try_fetch(url).await {
            Ok(text) => text,
            Err(e) => {
                // Suppressed by contract; logged so the data loss is visible.
                debug!("content fetch failed for {}: {}", url, e);
                String::new()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).map_err(|e| AppError::Parse {
            service: "fetcher",
            message: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await?
            .error_for_status()?;

        let html = response.text().await?;
        let text = page_text(&html);
        Ok(excerpt(&text, self.max_chars))
    }
}
