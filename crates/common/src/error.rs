use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed candle at index {index}: {reason}")]
    MalformedCandle { index: usize, reason: String },

    #[error("Exchange API error: {0}")]
    Exchange(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors caused by caller input rather than upstream failures.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::InvalidConfig(_) | Error::MalformedCandle { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
