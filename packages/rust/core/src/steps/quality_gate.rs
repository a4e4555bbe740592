//! Quality gate: risk scoring and review routing.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use tracing::debug;

use autodraft_shared::{Draft, DraftStatus, Result};
use autodraft_storage::DraftRepo;

/// Content below this many characters is penalized as too short to verify.
const MIN_CONTENT_CHARS: usize = 600;

/// Weight added by the brevity rule.
const BREVITY_WEIGHT: i32 = 10;

/// Pattern rules, applied in order. Each contributes its weight at most once.
static RULES: LazyLock<Vec<(Regex, i32)>> = LazyLock::new(|| {
    vec![
        // Exaggeration
        (Regex::new(r"\b100%\b|무조건|확실").expect("valid regex"), 25),
        // False guarantees
        (Regex::new(r"합격\s*보장|단기간에").expect("valid regex"), 20),
        // Personal data
        (
            Regex::new(r"010-\d{4}-\d{4}|전화번호|주민등록").expect("valid regex"),
            40,
        ),
    ]
});

/// Compute the content-policy risk score for a Markdown body.
///
/// Pattern weights sum once per matching rule, plus the brevity penalty,
/// clamped to [0, 100].
pub fn calc_risk_score(text: &str) -> i32 {
    let mut score = 0;
    for (pattern, weight) in RULES.iter() {
        if pattern.is_match(text) {
            score += weight;
        }
    }
    if text.chars().count() < MIN_CONTENT_CHARS {
        score += BREVITY_WEIGHT;
    }
    score.min(100)
}

/// Score `draft` and route it to `EXPORTED` or `NEEDS_REVIEW`.
///
/// The routed status is final. Both branches persist the draft and proceed
/// to export — `NEEDS_REVIEW` is advisory, not a block.
pub async fn apply_quality_gate(
    drafts: &dyn DraftRepo,
    mut draft: Draft,
    review_threshold: i32,
) -> Result<Draft> {
    let risk = calc_risk_score(&draft.content_md);
    draft.risk_score = risk;
    draft.status = if risk >= review_threshold {
        DraftStatus::NeedsReview
    } else {
        DraftStatus::Exported
    };
    draft.updated_at = Utc::now();

    drafts.save_draft(&draft).await?;
    debug!(draft_id = %draft.id, risk, status = %draft.status, "quality gate applied");
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodraft_shared::{DraftId, Topic, TopicId, TopicStatus};
    use autodraft_storage::{Store, TopicRepo};

    async fn test_store() -> Store {
        let tmp = std::env::temp_dir().join(format!("ad_core_{}.db", uuid::Uuid::now_v7()));
        Store::open(&tmp).await.expect("open test db")
    }

    async fn seed_topic(store: &Store) -> TopicId {
        let topic = Topic {
            id: TopicId::new(),
            pillar: "수학".into(),
            audience: "중학생".into(),
            title: "제목".into(),
            angle: "구성".into(),
            score: 80,
            status: TopicStatus::New,
            created_at: Utc::now(),
        };
        store.create_topic(&topic).await.expect("seed topic");
        topic.id
    }

    fn make_draft(topic_id: TopicId, content_md: &str) -> Draft {
        Draft {
            id: DraftId::new(),
            topic_id,
            title: "제목".into(),
            content_md: content_md.into(),
            summary: "요약".into(),
            risk_score: 0,
            status: DraftStatus::Drafted,
            export_html_ref: String::new(),
            last_error: None,
            updated_at: Utc::now(),
        }
    }

    /// Clean filler text of at least `chars` characters.
    fn long_clean_text(chars: usize) -> String {
        "내용을 차분하게 정리한 문단입니다. ".repeat(chars / 20 + 1)
    }

    #[test]
    fn exaggeration_scores_25_when_long_enough() {
        let text = "100%".repeat(150);
        assert!(text.chars().count() >= MIN_CONTENT_CHARS);
        assert_eq!(calc_risk_score(&text), 25);
    }

    #[test]
    fn exaggeration_plus_brevity_scores_35() {
        let text = "100%".repeat(100);
        assert!(text.chars().count() < MIN_CONTENT_CHARS);
        assert_eq!(calc_risk_score(&text), 35);
    }

    #[test]
    fn phone_pattern_contributes_40_once() {
        let once = format!("{}연락처는 010-1234-5678 입니다.", long_clean_text(600));
        let thrice = format!(
            "{}010-1234-5678 010-2345-6789 010-3456-7890",
            long_clean_text(600)
        );
        assert_eq!(calc_risk_score(&once), 40);
        assert_eq!(calc_risk_score(&thrice), 40);
    }

    #[test]
    fn each_rule_fires_at_most_once() {
        let text = format!("{}무조건 확실 무조건 확실", long_clean_text(600));
        assert_eq!(calc_risk_score(&text), 25);
    }

    #[test]
    fn rule_weights_accumulate() {
        let text = "무조건 합격보장 전화번호 010-1111-2222";
        // 25 + 20 + 40 + brevity 10 = 95
        assert_eq!(calc_risk_score(text), 95);

        // More matches per rule change nothing
        let text = format!("{text} 확실 단기간에 주민등록");
        assert_eq!(calc_risk_score(&text), 95);
    }

    #[test]
    fn guarantee_pattern_allows_interior_whitespace() {
        let text = format!("{}합격 보장 코스", long_clean_text(600));
        assert_eq!(calc_risk_score(&text), 20);
    }

    #[test]
    fn clean_long_content_scores_zero() {
        assert_eq!(calc_risk_score(&long_clean_text(600)), 0);
    }

    #[test]
    fn brevity_counts_characters_not_bytes() {
        // 250 Hangul syllables: 750 bytes, but only 250 characters
        let text = "가".repeat(250);
        assert!(text.len() >= MIN_CONTENT_CHARS);
        assert_eq!(calc_risk_score(&text), BREVITY_WEIGHT);
    }

    #[tokio::test]
    async fn routes_below_threshold_to_exported() {
        let store = test_store().await;
        let topic_id = seed_topic(&store).await;
        let draft = make_draft(topic_id, &long_clean_text(600));

        let gated = apply_quality_gate(&store, draft, 30).await.expect("gate");
        assert_eq!(gated.risk_score, 0);
        assert_eq!(gated.status, DraftStatus::Exported);

        let persisted = store.get_draft(&gated.id).await.unwrap().unwrap();
        assert_eq!(persisted.status, DraftStatus::Exported);
        assert_eq!(persisted.risk_score, 0);
    }

    #[tokio::test]
    async fn routes_at_threshold_to_needs_review() {
        let store = test_store().await;
        let topic_id = seed_topic(&store).await;
        // Brevity alone: risk 10; threshold 10 routes to review
        let draft = make_draft(topic_id, "짧은 본문");

        let gated = apply_quality_gate(&store, draft, 10).await.expect("gate");
        assert_eq!(gated.risk_score, 10);
        assert_eq!(gated.status, DraftStatus::NeedsReview);

        let persisted = store.get_draft(&gated.id).await.unwrap().unwrap();
        assert_eq!(persisted.status, DraftStatus::NeedsReview);
    }
}
