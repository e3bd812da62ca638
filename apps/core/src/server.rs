//! HTTP surface: the inbox listing page and the analysis endpoint.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use tracing::warn;

use crate::analysis::{AnalysisService, SummaryOutcome};
use crate::models::Email;
use crate::store::{EmailRepository, EmailStore};

/// Shared per-process state, constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EmailStore>,
    pub service: Arc<AnalysisService>,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/summary/:id", get(email_summary))
        .route("/health", get(health))
        .with_state(state)
}

/// Main inbox view with the email list.
/// GET /
async fn index(State(state): State<AppState>) -> impl IntoResponse {
    Html(render_inbox(state.store.all()))
}

/// On-demand AI analysis for one email.
/// GET /summary/:id
async fn email_summary(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> impl IntoResponse {
    match state.service.get_summary(id).await {
        SummaryOutcome::NotFound => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Email not found" })),
        )
            .into_response(),
        SummaryOutcome::Success(analysis) | SummaryOutcome::Degraded(analysis) => {
            (StatusCode::OK, Json(analysis)).into_response()
        }
        SummaryOutcome::Failed(analysis) => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(analysis)).into_response()
        }
    }
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Renders the inbox listing with the records embedded as JSON for the
/// page script.
fn render_inbox(emails: &[Email]) -> String {
    let rows: String = emails.iter().map(render_row).collect();
    let records = serde_json::to_string(emails).unwrap_or_else(|err| {
        warn!("failed to serialize email records for embedding: {}", err);
        "[]".to_string()
    });
    // A body containing "</script>" must not close the inline block.
    let records = records.replace('<', "\\u003c");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>MailSense Inbox</title>
    <style>
        body {{ font-family: sans-serif; margin: 2rem auto; max-width: 60rem; color: #212529; }}
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{ padding: 0.5rem 0.75rem; text-align: left; border-bottom: 1px solid #dee2e6; }}
        thead tr {{ background-color: #212529; color: #fff; }}
        tr.email-row:hover {{ background-color: #f8f9fa; }}
        .analysis-card {{ margin: 0.5rem 0; padding: 1rem; background-color: #f8f9fa;
                          border: 1px solid #dee2e6; border-radius: 0.375rem; }}
        .analysis-card h4 {{ margin-top: 0; }}
        .muted {{ color: #6c757d; }}
        button {{ cursor: pointer; }}
        #email-details {{ margin-top: 1.5rem; padding: 1rem; border: 1px solid #dee2e6;
                          border-radius: 0.375rem; display: none; }}
    </style>
</head>
<body>
    <h1>MailSense Inbox</h1>
    <p class="muted">Manage your emails with AI-powered analysis</p>
    <table>
        <thead>
            <tr><th>ID</th><th>Sender</th><th>Subject</th><th>Timestamp</th><th>Actions</th></tr>
        </thead>
        <tbody>
{rows}        </tbody>
    </table>
    <div id="email-details">
        <h3 id="detail-subject"></h3>
        <p><strong>From:</strong> <span id="detail-sender"></span></p>
        <p><strong>Time:</strong> <span id="detail-timestamp"></span></p>
        <p id="detail-body"></p>
    </div>
    <script>
        const emails = {records};

        async function analyzeEmail(emailId) {{
            const button = document.getElementById(`btn-${{emailId}}`);
            const card = document.getElementById(`analysis-${{emailId}}`);
            button.textContent = 'Analyzing...';
            button.disabled = true;

            const email = emails.find(e => e.id === emailId);
            if (email) {{
                document.getElementById('detail-subject').textContent = email.subject;
                document.getElementById('detail-sender').textContent = email.sender;
                document.getElementById('detail-timestamp').textContent = email.timestamp;
                document.getElementById('detail-body').textContent = email.body;
                document.getElementById('email-details').style.display = 'block';
            }}

            try {{
                const response = await fetch(`/summary/${{emailId}}`);
                const data = await response.json();
                document.getElementById(`summary-${{emailId}}`).textContent =
                    data.summary || 'No summary available';
                document.getElementById(`intent-${{emailId}}`).textContent =
                    data.intent || 'Unknown';
                document.getElementById(`action-${{emailId}}`).textContent =
                    data.suggested_action || 'No action suggested';
            }} catch (error) {{
                console.error('Error:', error);
                document.getElementById(`summary-${{emailId}}`).textContent =
                    'Failed to analyze email - please try again later';
                document.getElementById(`intent-${{emailId}}`).textContent = 'Error';
                document.getElementById(`action-${{emailId}}`).textContent =
                    'Check your connection and try again';
            }}

            card.style.display = '';
            button.textContent = 'AI Analyze';
            button.disabled = false;
        }}
    </script>
</body>
</html>
"#
    )
}

fn render_row(email: &Email) -> String {
    format!(
        r#"            <tr class="email-row">
                <td>{id}</td>
                <td>{sender}</td>
                <td>{subject}</td>
                <td>{timestamp}</td>
                <td><button id="btn-{id}" onclick="analyzeEmail({id})">AI Analyze</button></td>
            </tr>
            <tr id="analysis-{id}" style="display: none;">
                <td colspan="5">
                    <div class="analysis-card">
                        <h4>AI Analysis</h4>
                        <p><strong>Summary:</strong> <span id="summary-{id}"></span></p>
                        <p><strong>Intent:</strong> <span id="intent-{id}"></span></p>
                        <p><strong>Suggested Action:</strong> <span id="action-{id}"></span></p>
                    </div>
                </td>
            </tr>
"#,
        id = email.id,
        sender = escape_html(&email.sender),
        subject = escape_html(&email.subject),
        timestamp = escape_html(&email.timestamp),
    )
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Q&A</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Q&amp;A&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain sender"), "plain sender");
    }

    #[test]
    fn test_render_inbox_lists_every_email() {
        let store = EmailStore::with_sample_inbox();
        let page = render_inbox(store.all());

        for email in store.all() {
            assert!(page.contains(&escape_html(&email.subject)));
            assert!(page.contains(&escape_html(&email.sender)));
            assert!(page.contains(&format!("analyzeEmail({})", email.id)));
        }
        assert!(page.contains("const emails ="));
    }

    #[test]
    fn test_render_inbox_embedding_cannot_break_out_of_script() {
        let emails = vec![Email {
            id: 1,
            sender: "a@b.com".to_string(),
            subject: "s".to_string(),
            body: "</script><script>alert(1)</script>".to_string(),
            timestamp: "t".to_string(),
        }];

        let page = render_inbox(&emails);

        assert!(!page.contains("</script><script>alert(1)"));
    }
}
