use thiserror::Error;

/// Process-level error type for startup and configuration faults.
///
/// Analysis failures never reach this type; they are handled by the typed
/// result of the analysis client and converted to response payloads at the
/// service boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents configuration-related errors (e.g., malformed environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents a failure to construct the HTTP client at startup.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}
