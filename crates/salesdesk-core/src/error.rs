//! Error types for SalesDesk

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The completion service answered with a non-success status
    #[error("Completion API error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The extracted intent could not be decoded into a query descriptor
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Whether this error came from talking to the completion service
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Upstream { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
