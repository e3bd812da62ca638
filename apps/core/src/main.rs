// MailSense Backend Entry Point
// Inbox listing + on-demand AI email analysis

mod analysis;
mod config;
mod error;
mod models;
mod server;
mod store;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::analysis::{AnalysisClient, AnalysisService};
use crate::config::AppConfig;
use crate::server::{router, AppState};
use crate::store::EmailStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    match config.api_key.as_deref() {
        Some(key) => info!("analysis backend configured (key length {})", key.len()),
        None => warn!(
            "OPENAI_API_KEY is not set; analysis requests will return degraded results"
        ),
    }

    let store = Arc::new(EmailStore::with_sample_inbox());
    let client = Arc::new(
        AnalysisClient::new(config.api_key.clone(), &config.base_url)
            .context("failed to build analysis client")?,
    );
    let service = Arc::new(AnalysisService::new(store.clone(), client));
    let state = AppState { store, service };

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("MailSense listening on {}", addr);

    axum::serve(listener, router(state))
        .await
        .context("server error")?;
    Ok(())
}
