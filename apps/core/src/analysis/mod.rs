//! # Analysis Module
//!
//! On-demand AI analysis of emails.
//!
//! ## Components
//! - `client`: the completion-backend client (prompt construction, wire
//!   call, response shaping, typed failures)
//! - `service`: per-request orchestration of lookup, invocation, and
//!   fallback shaping

pub mod client;
pub mod service;

pub use client::{AnalysisClient, AnalysisError, Analyzer};
pub use service::{AnalysisService, SummaryOutcome};
