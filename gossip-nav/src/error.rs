//! Error types for GossipNav

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// GossipNav error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bearing requested for a target this agent has never heard of
    #[error("Unknown target: {0}")]
    UnknownTarget(u8),

    /// Radio could not send or receive
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}
