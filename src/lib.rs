// file: src/lib.rs
// description: library entry point and public api exports
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod agents;
pub mod arxiv;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod llm;
pub mod report;
pub mod search;
pub mod stocks;
pub mod utils;

pub use agents::{travel_task, travel_team, Agent, AgentMessage, GroupChat};
pub use arxiv::{ArxivClient, Paper};
pub use config::{
    AgentsConfig, ArxivConfig, Config, FetcherConfig, LlmConfig, SearchConfig, StocksConfig,
};
pub use error::{AppError, Result};
pub use fetcher::ContentFetcher;
pub use llm::{ChatBackend, ChatClient, ChatMessage};
pub use search::{EnrichedResult, SearchItem, WebSearchClient};
pub use stocks::{analyze, MarketDataClient, PriceBar, PriceHistory, StockAnalysis};
