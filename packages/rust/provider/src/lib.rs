//! Content-generation capability for AutoDraft.
//!
//! This crate provides:
//! - [`ContentProvider`] — the capability seam the pipeline generates through
//! - [`DeterministicProvider`] — template-based generation, no network
//! - [`RemoteProvider`] — structured generation against a chat-completions
//!   endpoint, falling back to the deterministic variant on any failure
//! - [`extract_json`] — pure best-effort JSON payload extraction

mod deterministic;
mod extract;
mod remote;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use autodraft_shared::{AppConfig, ProviderKind, Result};

pub use deterministic::DeterministicProvider;
pub use extract::extract_json;
pub use remote::RemoteProvider;

// ---------------------------------------------------------------------------
// Provider records
// ---------------------------------------------------------------------------

/// One proposed topic, before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCandidate {
    pub title: String,
    pub angle: String,
    /// Usefulness score, 0–100.
    pub score: i32,
}

/// Generated draft body and summary, before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftContent {
    pub content_md: String,
    pub summary: String,
}

// ---------------------------------------------------------------------------
// Capability trait
// ---------------------------------------------------------------------------

/// The pluggable content-generation capability.
///
/// Implementations are chosen once at construction via [`build_provider`];
/// pipeline code never branches on the concrete variant.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Propose `n` topic candidates for a pillar/audience brief.
    ///
    /// The caller constrains `n` to `[1, 50]`. Order is significant and is
    /// preserved downstream. The deterministic variant returns exactly `n`
    /// candidates; the remote variant may return fewer (never more).
    async fn topic_candidates(
        &self,
        pillar: &str,
        audience: &str,
        n: usize,
    ) -> Result<Vec<TopicCandidate>>;

    /// Expand one topic into a Markdown draft body and a one-sentence summary.
    async fn draft_content(
        &self,
        title: &str,
        angle: &str,
        pillar: &str,
        audience: &str,
    ) -> Result<DraftContent>;
}

/// Construct the provider variant selected by the configuration.
pub fn build_provider(config: &AppConfig) -> Result<Box<dyn ContentProvider>> {
    match config.provider.kind {
        ProviderKind::Deterministic => Ok(Box::new(DeterministicProvider::new())),
        ProviderKind::Remote => Ok(Box::new(RemoteProvider::from_config(&config.provider)?)),
    }
}
