// file: src/arxiv/mod.rs
// description: arXiv Atom API client for literature search
// reference: https://info.arxiv.org/help/api/user-manual.html

use crate::config::ArxivConfig;
use crate::error::{AppError, Result};
use chrono::DateTime;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::debug;

/// One paper from an arXiv query, reduced to the fields we display.
#[derive(Debug, Clone, Serialize)]
pub struct Paper {
    pub title: String,
    pub authors: Vec<String>,
    /// Publication date as YYYY-MM-DD.
    pub published: String,
    pub summary: String,
    pub pdf_url: String,
}

pub struct ArxivClient {
    client: Client,
    endpoint: String,
    max_results: usize,
}

impl ArxivClient {
    pub fn new(config: &ArxivConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            max_results: config.max_results,
        }
    }

    /// Query arXiv sorted by relevance, bounded by the configured count.
    pub async fn search(&self, query: &str) -> Result<Vec<Paper>> {
        debug!("searching arXiv for: {}", query);

        let search_query = format!("all:{query}");
        let max_results = self.max_results.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "relevance"),
                ("sortOrder", "descending"),
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
                service: "arxiv",
                status,
                body,
            });
        }

        let feed = response.text().await?;
        let papers = parse_feed(&feed)?;
        debug!("arXiv returned {} papers", papers.len());
        Ok(papers)
    }
}

/// Parse an Atom feed into papers.
///
/// The feed is lenient-parsed with the HTML tree builder; Atom's element
/// names survive that intact, and CSS selectors keep the field extraction
/// short. Entries missing a title are skipped.
pub fn parse_feed(feed: &str) -> Result<Vec<Paper>> {
    let entry_sel = selector("entry")?;
    let title_sel = selector("title")?;
    let author_sel = selector("author > name")?;
    let published_sel = selector("published")?;
    let summary_sel = selector("summary")?;
    let pdf_sel = selector(r#"link[title="pdf"]"#)?;

    let document = Html::parse_document(feed);
    let mut papers = Vec::new();

    for entry in document.select(&entry_sel) {
        let title = match entry.select(&title_sel).next() {
            Some(el) => collapse(&el.text().collect::<String>()),
            None => continue,
        };
        if title.is_empty() {
            continue;
        }

        let authors: Vec<String> = entry
            .select(&author_sel)
            .map(|el| collapse(&el.text().collect::<String>()))
            .filter(|name| !name.is_empty())
            .collect();

        let published = entry
            .select(&published_sel)
            .next()
            .map(|el| format_date(el.text().collect::<String>().trim()))
            .unwrap_or_default();

        let summary = entry
            .select(&summary_sel)
            .next()
            .map(|el| collapse(&el.text().collect::<String>()))
            .unwrap_or_default();

        let pdf_url = entry
            .select(&pdf_sel)
            .next()
            .and_then(|el| el.value().attr("href"))
            .unwrap_or_default()
            .to_owned();

        papers.push(Paper {
            title,
            authors,
            published,
            summary,
            pdf_url,
        });
    }

    Ok(papers)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::Parse {
        service: "arxiv",
        message: e.to_string(),
    })
}

/// arXiv wraps titles and abstracts across lines; collapse to single spaces.
fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduce an RFC 3339 timestamp to YYYY-MM-DD.
fn format_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format("%Y-%m-%d").to_string(),
        Err(_) => raw.chars().take(10).collect(),
    }
}
