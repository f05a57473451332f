//! Error types for cf-ddns.

use thiserror::Error;

/// Result type alias for cf-ddns.
pub type Result<T> = std::result::Result<T, DdnsError>;

/// DDNS error types.
#[derive(Error, Debug)]
pub enum DdnsError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport error, including timeouts.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response.
    #[error("HTTP {status} from {url}: {body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    /// Provider-specific error.
    #[error("Provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    /// IP detection error.
    #[error("IP detection failed: {0}")]
    IpDetection(String),

    /// The account has no zone for the domain.
    #[error("No zone found for domain: {0}")]
    ZoneNotFound(String),

    /// The zone has no A record for the domain.
    #[error("No A record found for domain: {0}")]
    RecordNotFound(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for DdnsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            DdnsError::Serialization(e.to_string())
        } else {
            DdnsError::Network(e.to_string())
        }
    }
}

impl From<reqwest::header::InvalidHeaderValue> for DdnsError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        DdnsError::Config(format!("invalid header value: {}", e))
    }
}

impl From<toml::de::Error> for DdnsError {
    fn from(e: toml::de::Error) -> Self {
        DdnsError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for DdnsError {
    fn from(e: toml::ser::Error) -> Self {
        DdnsError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for DdnsError {
    fn from(e: serde_json::Error) -> Self {
        DdnsError::Serialization(e.to_string())
    }
}
