//! Topic factory: turns provider candidates into persisted topics.

use chrono::Utc;
use tracing::{info, instrument};

use autodraft_provider::ContentProvider;
use autodraft_shared::{Result, Topic, TopicId, TopicIdea, TopicStatus};
use autodraft_storage::TopicRepo;

/// Generate `n` topic candidates for a brief and persist each as a `NEW` topic.
///
/// Candidates are persisted in provider order, which is preserved in the
/// returned ideas. Existing topics are not consulted — the factory does not
/// deduplicate. Persistence failures propagate.
#[instrument(skip_all, fields(pillar = %pillar, audience = %audience, n))]
pub async fn generate_topics(
    provider: &dyn ContentProvider,
    topics: &dyn TopicRepo,
    pillar: &str,
    audience: &str,
    n: usize,
) -> Result<Vec<TopicIdea>> {
    let now = Utc::now();
    let candidates = provider.topic_candidates(pillar, audience, n).await?;

    let mut items: Vec<TopicIdea> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let topic = Topic {
            id: TopicId::new(),
            pillar: pillar.to_string(),
            audience: audience.to_string(),
            title: candidate.title,
            angle: candidate.angle,
            score: candidate.score,
            status: TopicStatus::New,
            created_at: now,
        };
        topics.create_topic(&topic).await?;

        items.push(TopicIdea {
            topic_id: topic.id,
            title: topic.title,
            angle: topic.angle,
            score: topic.score,
        });
    }

    info!(count = items.len(), "topic candidates persisted");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodraft_provider::DeterministicProvider;
    use autodraft_storage::Store;

    async fn test_store() -> Store {
        let tmp = std::env::temp_dir().join(format!("ad_core_{}.db", uuid::Uuid::now_v7()));
        Store::open(&tmp).await.expect("open test db")
    }

    #[tokio::test]
    async fn persists_n_topics_in_order() {
        let store = test_store().await;
        let provider = DeterministicProvider::new();

        let ideas = generate_topics(&provider, &store, "수학", "중학생", 6)
            .await
            .expect("generate");

        assert_eq!(ideas.len(), 6);
        // Scores decay with index, confirming provider order survived
        for pair in ideas.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }

        for idea in &ideas {
            let topic = store
                .get_topic(&idea.topic_id)
                .await
                .unwrap()
                .expect("persisted");
            assert_eq!(topic.status, TopicStatus::New);
            assert_eq!(topic.pillar, "수학");
            assert_eq!(topic.audience, "중학생");
            assert_eq!(topic.title, idea.title);
        }
    }

    #[tokio::test]
    async fn assigns_unique_ids() {
        let store = test_store().await;
        let provider = DeterministicProvider::new();

        let ideas = generate_topics(&provider, &store, "영어", "직장인", 8)
            .await
            .unwrap();

        let mut ids: Vec<_> = ideas.iter().map(|i| i.topic_id.to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[tokio::test]
    async fn does_not_deduplicate_repeated_briefs() {
        let store = test_store().await;
        let provider = DeterministicProvider::new();

        let first = generate_topics(&provider, &store, "과학", "고등학생", 4)
            .await
            .unwrap();
        let second = generate_topics(&provider, &store, "과학", "고등학생", 4)
            .await
            .unwrap();

        // Same titles, fresh rows
        assert_eq!(first[0].title, second[0].title);
        assert_ne!(first[0].topic_id, second[0].topic_id);
    }
}
