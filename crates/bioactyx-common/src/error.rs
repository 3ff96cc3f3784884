use thiserror::Error;

#[derive(Debug, Error)]
pub enum BioactyxError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BioactyxError {
    /// HTTP status code carried by a non-success response, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BioactyxError::Status { status, .. } => Some(*status),
            BioactyxError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BioactyxError>;
