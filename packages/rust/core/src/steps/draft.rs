//! Draft step: expands one topic into a persisted draft.

use chrono::Utc;
use tracing::debug;

use autodraft_provider::ContentProvider;
use autodraft_shared::{Draft, DraftId, DraftStatus, Result, Topic};
use autodraft_storage::DraftRepo;

/// Generate a draft for `topic` and persist it.
///
/// The new row starts at `DRAFTED` with a zero risk score and no export
/// reference. Provider or persistence failures propagate to the caller.
pub async fn generate_draft(
    provider: &dyn ContentProvider,
    drafts: &dyn DraftRepo,
    topic: &Topic,
) -> Result<Draft> {
    let content = provider
        .draft_content(&topic.title, &topic.angle, &topic.pillar, &topic.audience)
        .await?;

    let draft = Draft {
        id: DraftId::new(),
        topic_id: topic.id.clone(),
        title: topic.title.clone(),
        content_md: content.content_md,
        summary: content.summary,
        risk_score: 0,
        status: DraftStatus::Drafted,
        export_html_ref: String::new(),
        last_error: None,
        updated_at: Utc::now(),
    };

    drafts.create_draft(&draft).await?;
    debug!(draft_id = %draft.id, topic_id = %topic.id, "draft created");
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodraft_provider::DeterministicProvider;
    use autodraft_shared::{TopicId, TopicStatus};
    use autodraft_storage::{Store, TopicRepo};

    async fn test_store() -> Store {
        let tmp = std::env::temp_dir().join(format!("ad_core_{}.db", uuid::Uuid::now_v7()));
        Store::open(&tmp).await.expect("open test db")
    }

    fn make_topic() -> Topic {
        Topic {
            id: TopicId::new(),
            pillar: "수학".into(),
            audience: "중학생".into(),
            title: "수학 관련 자주 묻는 질문 5가지".into(),
            angle: "FAQ형 구성(질문→답→정리)".into(),
            score: 85,
            status: TopicStatus::New,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn creates_drafted_row() {
        let store = test_store().await;
        let provider = DeterministicProvider::new();
        let topic = make_topic();
        store.create_topic(&topic).await.unwrap();

        let draft = generate_draft(&provider, &store, &topic)
            .await
            .expect("draft");

        assert_eq!(draft.topic_id, topic.id);
        assert_eq!(draft.title, topic.title);
        assert_eq!(draft.status, DraftStatus::Drafted);
        assert_eq!(draft.risk_score, 0);
        assert_eq!(draft.export_html_ref, "");
        assert!(draft.last_error.is_none());
        assert!(draft.content_md.contains(&topic.title));

        let persisted = store
            .get_draft(&draft.id)
            .await
            .unwrap()
            .expect("persisted");
        assert_eq!(persisted.content_md, draft.content_md);
        assert_eq!(persisted.status, DraftStatus::Drafted);
    }

    #[tokio::test]
    async fn each_run_creates_a_new_row() {
        let store = test_store().await;
        let provider = DeterministicProvider::new();
        let topic = make_topic();
        store.create_topic(&topic).await.unwrap();

        let first = generate_draft(&provider, &store, &topic).await.unwrap();
        let second = generate_draft(&provider, &store, &topic).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(store.get_draft(&first.id).await.unwrap().is_some());
        assert!(store.get_draft(&second.id).await.unwrap().is_some());
    }
}
