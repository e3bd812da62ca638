//! Per-request orchestration of email analysis.
//!
//! Stateless across requests: every call restarts at the store lookup.

use std::sync::Arc;

use tracing::{error, info};

use crate::analysis::client::{AnalysisError, Analyzer};
use crate::models::EmailAnalysis;
use crate::store::EmailRepository;

/// The terminal state of one analysis request.
///
/// Carries the exact payload the HTTP layer serves; every variant except
/// `NotFound` holds a fully-populated analysis.
#[derive(Debug)]
pub enum SummaryOutcome {
    /// No email matches the requested id.
    NotFound,
    /// The backend produced an analysis (possibly with defaulted fields).
    Success(EmailAnalysis),
    /// No backend credential is configured; informational placeholder
    /// content served with a success status. Not an error.
    Degraded(EmailAnalysis),
    /// The backend call failed; fixed fallback content served with a
    /// server-error status.
    Failed(EmailAnalysis),
}

/// Orchestrates lookup, client invocation, and fallback shaping.
pub struct AnalysisService {
    store: Arc<dyn EmailRepository>,
    analyzer: Arc<dyn Analyzer>,
}

impl AnalysisService {
    pub fn new(store: Arc<dyn EmailRepository>, analyzer: Arc<dyn Analyzer>) -> Self {
        Self { store, analyzer }
    }

    /// Resolves one analysis request to its terminal state.
    ///
    /// Matches the client's typed result exhaustively; no failure escapes
    /// as a fault.
    pub async fn get_summary(&self, id: u32) -> SummaryOutcome {
        let Some(email) = self.store.find_by_id(id) else {
            info!("summary requested for unknown email id {}", id);
            return SummaryOutcome::NotFound;
        };

        match self.analyzer.analyze(email).await {
            Ok(analysis) => SummaryOutcome::Success(analysis),
            Err(AnalysisError::Unconfigured) => {
                info!(
                    "analysis backend unconfigured; serving degraded result for email {}",
                    id
                );
                SummaryOutcome::Degraded(degraded_analysis())
            }
            Err(AnalysisError::Backend(detail)) => {
                error!("analysis failed for email {}: {}", id, detail);
                SummaryOutcome::Failed(unavailable_analysis())
            }
        }
    }
}

fn degraded_analysis() -> EmailAnalysis {
    EmailAnalysis {
        summary: "AI not available".to_string(),
        intent: "N/A".to_string(),
        suggested_action: "Set the OPENAI_API_KEY environment variable".to_string(),
    }
}

fn unavailable_analysis() -> EmailAnalysis {
    EmailAnalysis {
        summary: "AI analysis temporarily unavailable".to_string(),
        intent: "Service Error".to_string(),
        suggested_action: "Please try again in a moment".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Email;
    use crate::store::EmailStore;
    use async_trait::async_trait;

    /// Stub analyzer with a scripted outcome.
    enum StubAnalyzer {
        Succeed(EmailAnalysis),
        Unconfigured,
        BackendFailure,
    }

    #[async_trait]
    impl Analyzer for StubAnalyzer {
        async fn analyze(&self, _email: &Email) -> Result<EmailAnalysis, AnalysisError> {
            match self {
                StubAnalyzer::Succeed(analysis) => Ok(analysis.clone()),
                StubAnalyzer::Unconfigured => Err(AnalysisError::Unconfigured),
                StubAnalyzer::BackendFailure => {
                    Err(AnalysisError::Backend("connection refused".to_string()))
                }
            }
        }
    }

    fn service_with(analyzer: StubAnalyzer) -> AnalysisService {
        AnalysisService::new(
            Arc::new(EmailStore::with_sample_inbox()),
            Arc::new(analyzer),
        )
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let service = service_with(StubAnalyzer::Succeed(EmailAnalysis {
            summary: "unused".to_string(),
            intent: "unused".to_string(),
            suggested_action: "unused".to_string(),
        }));

        let outcome = service.get_summary(999).await;

        assert!(matches!(outcome, SummaryOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_successful_analysis_passes_through() {
        let analysis = EmailAnalysis {
            summary: "A billing receipt.".to_string(),
            intent: "payment confirmation".to_string(),
            suggested_action: "No action needed".to_string(),
        };
        let service = service_with(StubAnalyzer::Succeed(analysis.clone()));

        let outcome = service.get_summary(2).await;

        match outcome {
            SummaryOutcome::Success(result) => assert_eq!(result, analysis),
            other => panic!("expected Success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_maps_to_degraded() {
        let service = service_with(StubAnalyzer::Unconfigured);

        let outcome = service.get_summary(1).await;

        match outcome {
            SummaryOutcome::Degraded(result) => {
                assert_eq!(result.summary, "AI not available");
                assert_eq!(result.intent, "N/A");
                assert!(result.suggested_action.contains("OPENAI_API_KEY"));
            }
            other => panic!("expected Degraded, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_backend_failure_maps_to_fixed_fallback() {
        let service = service_with(StubAnalyzer::BackendFailure);

        let outcome = service.get_summary(1).await;

        match outcome {
            SummaryOutcome::Failed(result) => {
                assert_eq!(result.summary, "AI analysis temporarily unavailable");
                assert_eq!(result.intent, "Service Error");
                assert_eq!(result.suggested_action, "Please try again in a moment");
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }
}
