use serde::{Deserialize, Serialize};

/// A single email in the fixed inbox.
#[derive(Debug, Clone, Serialize)]
pub struct Email {
    /// The unique identifier for the email. Positive, stable, never reused.
    pub id: u32,
    /// The sender address as displayed in the listing.
    pub sender: String,
    /// The subject line.
    pub subject: String,
    /// The full message body. Unbounded plain text.
    pub body: String,
    /// Display-formatted receipt time. Treated as an opaque string, never parsed.
    pub timestamp: String,
}

/// The AI analysis produced for one email.
///
/// Every field is guaranteed non-empty in any value handed to a caller;
/// missing or unusable upstream data is replaced per-field with fixed
/// fallback text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAnalysis {
    /// A 1-2 sentence summary of the email.
    pub summary: String,
    /// A short categorical label for the email's purpose (open set, not an enum).
    pub intent: String,
    /// A short, practical next step for the reader.
    pub suggested_action: String,
}
