//! Process configuration, read once at startup from the environment.

use std::env;
use std::net::{IpAddr, SocketAddr};

use url::Url;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Read-only configuration for the whole process.
///
/// Constructed once in `main` and shared by reference; nothing mutates it
/// afterwards. A missing API key is a supported state, not a startup
/// failure: analysis requests degrade instead.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind the HTTP listener to.
    pub host: String,
    /// Port to bind the HTTP listener to.
    pub port: u16,
    /// Credential for the completion backend, if configured.
    pub api_key: Option<String>,
    /// Base URL of the completion backend (overridable for testing).
    pub base_url: Url,
}

impl AppConfig {
    /// Loads configuration from the environment, applying defaults.
    ///
    /// Reads a local `.env` file first if one exists. The only fatal
    /// condition is a malformed `OPENAI_BASE_URL` override.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();

        let host = env::var("MAILSENSE_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("MAILSENSE_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let base_url = match env::var("OPENAI_BASE_URL") {
            Ok(raw) => Url::parse(raw.trim())?,
            Err(_) => Url::parse(DEFAULT_BASE_URL)?,
        };

        Ok(Self {
            host,
            port,
            api_key,
            base_url,
        })
    }

    /// Resolves the configured host and port into a bindable socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        let host: IpAddr = self
            .host
            .parse()
            .map_err(|_| AppError::Config(format!("invalid host: {}", self.host)))?;
        Ok(SocketAddr::new(host, self.port))
    }
}
