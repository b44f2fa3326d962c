use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedhookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} failed with status: {status}")]
    Status { url: String, status: u16 },

    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Feed has no entries: {0}")]
    EmptyFeed(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Error sending the message to the webhook: {0}")]
    DeliveryTransport(#[source] reqwest::Error),

    #[error("Webhook responded with non-OK status: {0}")]
    DeliveryStatus(u16),
}

impl FeedhookError {
    /// Only a bad webhook status is worth another delivery attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DeliveryStatus(_))
    }
}

pub type Result<T> = std::result::Result<T, FeedhookError>;
