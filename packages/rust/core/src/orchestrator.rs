//! Per-topic pipeline orchestration.
//!
//! Drives Draft → Quality Gate → Export for each selected topic, strictly
//! sequentially, with failures isolated per topic: one broken topic yields
//! one FAILED outcome and never disturbs the rest of the batch.

use tracing::{info, instrument, warn};

use autodraft_provider::ContentProvider;
use autodraft_shared::{
    AutodraftError, DraftOutcome, DraftStatus, OutcomeStatus, PipelineConfig, Result, TopicId,
    TopicStatus,
};
use autodraft_storage::{DraftRepo, TopicRepo};

use crate::steps;

/// Run the draft pipeline for each selected topic id.
///
/// Returns exactly one outcome per requested id, in input order. A topic
/// that completes is marked `DONE`; a topic that fails at any point is
/// marked `ERROR` (best effort) and reported as `FAILED` with the risk-100
/// sentinel. Nothing escapes the per-topic boundary. The caller validates
/// that `topic_ids` is non-empty.
#[instrument(skip_all, fields(topics = topic_ids.len()))]
pub async fn run_selected(
    config: &PipelineConfig,
    provider: &dyn ContentProvider,
    topics: &dyn TopicRepo,
    drafts: &dyn DraftRepo,
    topic_ids: &[String],
) -> Vec<DraftOutcome> {
    let mut results: Vec<DraftOutcome> = Vec::with_capacity(topic_ids.len());

    for topic_id in topic_ids {
        match process_topic(config, provider, topics, drafts, topic_id).await {
            Ok(outcome) => results.push(outcome),
            Err(e) => {
                warn!(topic_id = %topic_id, error = %e, "topic processing failed");
                mark_errored(topics, topic_id).await;
                results.push(DraftOutcome::failed(topic_id.clone()));
            }
        }
    }

    info!(
        total = results.len(),
        failed = results
            .iter()
            .filter(|r| r.status == OutcomeStatus::Failed)
            .count(),
        "batch complete"
    );
    results
}

/// Run Draft → Quality Gate → Export for one topic and mark it `DONE`.
async fn process_topic(
    config: &PipelineConfig,
    provider: &dyn ContentProvider,
    topics: &dyn TopicRepo,
    drafts: &dyn DraftRepo,
    topic_id: &str,
) -> Result<DraftOutcome> {
    let id: TopicId = topic_id.parse()?;
    let topic = topics
        .get_topic(&id)
        .await?
        .ok_or_else(|| AutodraftError::not_found("topic", topic_id))?;

    let draft = steps::draft::generate_draft(provider, drafts, &topic).await?;
    let draft = steps::quality_gate::apply_quality_gate(drafts, draft, config.review_threshold).await?;
    let draft = steps::export::export_draft_html(drafts, &config.export_dir, draft).await?;

    // A high risk score still counts as a completed run
    topics.update_topic_status(&id, TopicStatus::Done).await?;

    let status = match draft.status {
        DraftStatus::NeedsReview => OutcomeStatus::NeedsReview,
        DraftStatus::Drafted | DraftStatus::Exported => OutcomeStatus::Exported,
    };

    Ok(DraftOutcome {
        topic_id: topic_id.to_string(),
        draft_id: draft.id.to_string(),
        status,
        risk_score: draft.risk_score,
        summary: draft.summary,
        export_html_ref: draft.export_html_ref,
    })
}

/// Best-effort `ERROR` marking; its own failure is logged, never propagated.
async fn mark_errored(topics: &dyn TopicRepo, topic_id: &str) {
    let Ok(id) = topic_id.parse::<TopicId>() else {
        return;
    };
    if let Err(e) = topics.update_topic_status(&id, TopicStatus::Error).await {
        warn!(topic_id = %topic_id, error = %e, "failed to record ERROR status");
    }
}
