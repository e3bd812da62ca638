//! Client for the external completion backend.
//!
//! Sends one chat-completion request per analysis and shapes whatever
//! comes back into an [`EmailAnalysis`] with every field populated.
//! Transport-level failures are retried a fixed number of times; nothing
//! else is. All failures surface as a typed [`AnalysisError`].

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

use crate::error::AppError;
use crate::models::{Email, EmailAnalysis};

// --- Constants ---
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_TRANSPORT_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(500);
const COMPLETION_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You are an email analysis assistant. Always respond with \
                             valid JSON in the exact format requested.";

/// Fallback text for a missing or unusable `summary` field.
pub const FALLBACK_SUMMARY: &str = "Unable to generate summary";
/// Fallback text for a missing or unusable `intent` field.
pub const FALLBACK_INTENT: &str = "Unknown";
/// Fallback text for a missing or unusable `suggested_action` field.
pub const FALLBACK_ACTION: &str = "Review email manually";

/// Failures the analysis client can report.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No API key is configured. The client performed no network I/O.
    #[error("analysis backend is not configured")]
    Unconfigured,
    /// The backend call was attempted and failed: transport exhaustion,
    /// timeout, non-2xx status, or an unusable completion payload.
    #[error("analysis backend error: {0}")]
    Backend(String),
}

/// Defines the public interface for an email analyzer.
///
/// This trait abstracts the specific completion backend, allowing the
/// service to be exercised against a stub in tests.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Produces an analysis for one email, or a typed failure.
    async fn analyze(&self, email: &Email) -> Result<EmailAnalysis, AnalysisError>;
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct AnalysisClient {
    http: Client,
    api_key: Option<String>,
    endpoint: Url,
}

impl AnalysisClient {
    /// Creates a client against the given backend base URL.
    ///
    /// `api_key` of `None` builds a permanently unconfigured client; every
    /// `analyze` call then short-circuits without touching the network.
    pub fn new(api_key: Option<String>, base_url: &Url) -> Result<Self, AppError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let endpoint = Url::parse(&format!(
            "{}/chat/completions",
            base_url.as_str().trim_end_matches('/')
        ))?;
        Ok(Self {
            http,
            api_key,
            endpoint,
        })
    }

    async fn post_with_retries(&self, key: &str, payload: &Value) -> Result<reqwest::Response, AnalysisError> {
        let mut last_error = String::new();
        for attempt in 1..=MAX_TRANSPORT_ATTEMPTS {
            match self
                .http
                .post(self.endpoint.clone())
                .bearer_auth(key)
                .json(payload)
                .send()
                .await
            {
                Ok(response) => return Ok(response),
                Err(err) => {
                    warn!("completion attempt {} failed: {}", attempt, err);
                    last_error = err.to_string();
                    if attempt < MAX_TRANSPORT_ATTEMPTS {
                        tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                    }
                }
            }
        }
        error!(
            "completion request failed after {} attempts: {}",
            MAX_TRANSPORT_ATTEMPTS, last_error
        );
        Err(AnalysisError::Backend(format!(
            "transport failure after {} attempts: {}",
            MAX_TRANSPORT_ATTEMPTS, last_error
        )))
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn analyze(&self, email: &Email) -> Result<EmailAnalysis, AnalysisError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(AnalysisError::Unconfigured);
        };

        // Credential presence and length only; never the value.
        info!(
            key_length = key.len(),
            "requesting analysis for email {}", email.id
        );

        let payload = completion_payload(email);
        let response = self.post_with_retries(key, &payload).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("completion request failed with status {}: {}", status, body);
            return Err(AnalysisError::Backend(format!(
                "completion request failed with status {}: {}",
                status, body
            )));
        }

        let json: Value = response.json().await.map_err(|err| {
            error!("completion response was not valid JSON: {}", err);
            AnalysisError::Backend(format!("invalid completion response: {}", err))
        })?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                error!("completion response carried no content");
                AnalysisError::Backend("empty completion content".to_string())
            })?;

        shape_analysis(content)
    }
}

/// Builds the chat-completion request body for one email.
///
/// Deterministic: derived only from the email's subject, sender, and body.
fn completion_payload(email: &Email) -> Value {
    serde_json::json!({
        "model": COMPLETION_MODEL,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": analysis_prompt(email) }
        ],
        "response_format": { "type": "json_object" }
    })
}

fn analysis_prompt(email: &Email) -> String {
    format!(
        "Analyze the following email and provide a JSON response with exactly these keys:\n\
         - summary: A 1-2 sentence summary of the email\n\
         - intent: The purpose/type of the email (e.g., \"support request\", \
         \"payment confirmation\", \"collaboration inquiry\", \"security alert\", \"newsletter\")\n\
         - suggested_action: A short and practical next step\n\
         \n\
         Email details:\n\
         Subject: {}\n\
         Sender: {}\n\
         Body: {}\n\
         \n\
         Respond only with valid JSON in the requested format.",
        email.subject, email.sender, email.body
    )
}

/// Shapes the completion content into a fully-populated analysis.
///
/// Content that is not a JSON object is a backend failure. A valid object
/// with missing, non-string, or empty fields succeeds with each such field
/// defaulted independently.
fn shape_analysis(content: &str) -> Result<EmailAnalysis, AnalysisError> {
    let parsed: Value = serde_json::from_str(content).map_err(|err| {
        error!("completion content was not valid JSON: {}", err);
        AnalysisError::Backend(format!("unparseable completion content: {}", err))
    })?;
    let fields = parsed.as_object().ok_or_else(|| {
        error!("completion content was not a JSON object");
        AnalysisError::Backend("completion content is not a JSON object".to_string())
    })?;

    let field_or = |name: &str, fallback: &str| -> String {
        fields
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(fallback)
            .to_string()
    };

    Ok(EmailAnalysis {
        summary: field_or("summary", FALLBACK_SUMMARY),
        intent: field_or("intent", FALLBACK_INTENT),
        suggested_action: field_or("suggested_action", FALLBACK_ACTION),
    })
}
