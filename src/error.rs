//! Error types for yadns
//!
//! Library modules return [`Result`]; the binary wraps the final error with
//! `anyhow` context before logging it.

use thiserror::Error;

/// Result type alias for yadns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by the config loader, the provider client and the updater
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The provider rejected the call or answered with a bad envelope
    #[error("Provider error: {0}")]
    Provider(String),

    /// A listing returned no records
    #[error("Provider returned no records for {0}")]
    EmptyResult(String),

    /// No record of type A exists in the zone
    #[error("No A record found for {0}")]
    NoARecord(String),

    /// A record failed validation against the configured domain
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A request was built without one of its required keys
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// An IP-echo service answered with something other than an address
    #[error("IP source error: {0}")]
    IpSource(String),

    /// Transport failure (connect, timeout, HTTP status)
    #[error("Network error: {0}")]
    Network(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Whether the error is a logical rejection rather than a transport or parse failure
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Provider(_) | Self::EmptyResult(_) | Self::MissingField(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network(format!("request timed out: {}", err))
        } else {
            Self::Network(err.to_string())
        }
    }
}
