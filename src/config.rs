// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{AppError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub search: SearchConfig,
    pub fetcher: FetcherConfig,
    pub arxiv: ArxivConfig,
    pub stocks: StocksConfig,
    pub llm: LlmConfig,
    pub agents: AgentsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    pub endpoint: String,
    pub num_results: usize,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub engine_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetcherConfig {
    pub max_chars: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArxivConfig {
    pub endpoint: String,
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StocksConfig {
    pub endpoint: String,
    pub lookback_days: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentsConfig {
    pub max_turns: usize,
    pub termination_keyword: String,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("DESK_RESEARCH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config.load_credentials();
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        let mut config = Self {
            search: SearchConfig {
                endpoint: "https://customsearch.googleapis.com/customsearch/v1".to_string(),
                num_results: 2,
                api_key: None,
                engine_id: None,
            },
            fetcher: FetcherConfig {
                max_chars: 500,
                timeout_secs: 10,
            },
            arxiv: ArxivConfig {
                endpoint: "http://export.arxiv.org/api/query".to_string(),
                max_results: 2,
            },
            stocks: StocksConfig {
                endpoint: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
                lookback_days: 365,
            },
            llm: LlmConfig {
                endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
                model: "gpt-4o".to_string(),
                api_key: None,
            },
            agents: AgentsConfig {
                max_turns: 20,
                termination_keyword: "TERMINATE".to_string(),
            },
        };
        config.load_credentials();
        config
    }

    // Credentials live in the environment (or a .env file), never in the
    // config file itself.
    fn load_credentials(&mut self) {
        if self.search.api_key.is_none() {
            self.search.api_key = std::env::var("GOOGLE_API_KEY").ok();
        }
        if self.search.engine_id.is_none() {
            self.search.engine_id = std::env::var("GOOGLE_SEARCH_ENGINE_ID").ok();
        }
        if self.llm.api_key.is_none() {
            self.llm.api_key = std::env::var("OPENAI_API_KEY").ok();
        }
    }

    fn validate(&self) -> Result<()> {
        if self.search.num_results == 0 {
            return Err(AppError::Config(
                "search.num_results must be greater than 0".to_string(),
            ));
        }

        if self.fetcher.max_chars == 0 {
            return Err(AppError::Config(
                "fetcher.max_chars must be greater than 0".to_string(),
            ));
        }

        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::Config(
                "fetcher.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.arxiv.max_results == 0 {
            return Err(AppError::Config(
                "arxiv.max_results must be greater than 0".to_string(),
            ));
        }

        if self.stocks.lookback_days <= 0 {
            return Err(AppError::Config(
                "stocks.lookback_days must be greater than 0".to_string(),
            ));
        }

        if self.agents.max_turns == 0 {
            return Err(AppError::Config(
                "agents.max_turns must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
