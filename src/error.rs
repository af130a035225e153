// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} API request failed with status {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to parse {service} response: {message}")]
    Parse {
        service: &'static str,
        message: String,
    },

    #[error("No historical data available for the specified ticker.")]
    NoHistoricalData,

    #[error("Chat completion returned no choices")]
    EmptyCompletion,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
