// file: src/stocks/mod.rs
// description: market data client for daily price history
// reference: Yahoo Finance v8 chart endpoint

pub mod analysis;
pub mod chart;

pub use analysis::{analyze, trend_label, StockAnalysis};

use crate::config::StocksConfig;
use crate::error::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// One daily OHLC row.
#[derive(Debug, Clone, Copy)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A ticker's daily history over the lookback window, plus the provider's
/// live quote when it sends one.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
    pub market_price: Option<f64>,
}

impl PriceHistory {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

pub struct MarketDataClient {
    client: Client,
    endpoint: String,
    lookback_days: i64,
}

impl MarketDataClient {
    pub fn new(config: &StocksConfig) -> Result<Self> {
        // The chart endpoint rejects requests without a browser-like UA.
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36")
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            lookback_days: config.lookback_days,
        })
    }

    /// Fetch daily bars for the lookback window ending now. Rows with a
    /// missing close are dropped; an unknown ticker yields an empty history.
    pub async fn history(&self, ticker: &str) -> Result<PriceHistory> {
        let end = Utc::now();
        let start = end - Duration::days(self.lookback_days);

        debug!(
            "fetching {} history from {} to {}",
            ticker,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        let url = format!("{}/{}", self.endpoint, ticker);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", start.timestamp().to_string().as_str()),
                ("period2", end.timestamp().to_string().as_str()),
                ("interval", "1d"),
            ])
            .send()
            .await?;

        if response.status().as_u16() == 404 {
            // Unknown ticker: treated as no data, not a hard failure.
            return Ok(PriceHistory {
                ticker: ticker.to_string(),
                bars: Vec::new(),
                market_price: None,
            });
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Api {
                service: "stocks",
                status,
                body,
            });
        }

        let parsed: ChartResponse = response.json().await.map_err(|e| AppError::Parse {
            service: "stocks",
            message: e.to_string(),
        })?;

        Ok(build_history(ticker, parsed))
    }
}

fn build_history(ticker: &str, response: ChartResponse) -> PriceHistory {
    let Some(result) = response
        .chart
        .result
        .and_then(|mut results| (!results.is_empty()).then(|| results.remove(0)))
    else {
        return PriceHistory {
            ticker: ticker.to_string(),
            bars: Vec::new(),
            market_price: None,
        };
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let mut bars = Vec::with_capacity(result.timestamp.len());

    for (i, ts) in result.timestamp.iter().enumerate() {
        let close = quote.close.get(i).copied().flatten();
        let Some(close) = close else { continue };
        let Some(timestamp) = DateTime::from_timestamp(*ts, 0) else {
            continue;
        };

        bars.push(PriceBar {
            timestamp,
            open: quote.open.get(i).copied().flatten().unwrap_or(close),
            high: quote.high.get(i).copied().flatten().unwrap_or(close),
            low: quote.low.get(i).copied().flatten().unwrap_or(close),
            close,
        });
    }

    PriceHistory {
        ticker: ticker.to_string(),
        bars,
        market_price: result.meta.regular_market_price,
    }
}
