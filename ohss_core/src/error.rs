use thiserror::Error;

#[derive(Error, Debug)]
pub enum OhssError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("API token is not defined; set the {0} environment variable")]
    MissingToken(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response from issue tracker: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OhssError {
    /// Configuration errors are fatal at startup; everything else is a
    /// per-cycle fetch failure.
    pub fn is_config(&self) -> bool {
        matches!(self, OhssError::InvalidConfig(_) | OhssError::MissingToken(_))
    }
}

pub type Result<T> = std::result::Result<T, OhssError>;
