//! Template-based content generation.
//!
//! Produces the same output for the same brief, with no network access.
//! Also serves as the fallback target for [`RemoteProvider`](crate::RemoteProvider).

use async_trait::async_trait;

use autodraft_shared::Result;

use crate::{ContentProvider, DraftContent, TopicCandidate};

/// Fixed (title, angle) templates, cycled by candidate index.
///
/// `{pillar}` and `{audience}` are substituted per brief.
const TOPIC_TEMPLATES: [(&str, &str); 4] = [
    ("{pillar} 관련 자주 묻는 질문 5가지", "FAQ형 구성(질문→답→정리)"),
    (
        "{audience}가 {pillar}에서 흔히 하는 실수 3가지",
        "실수→원인→해결 루틴→연습",
    ),
    ("{pillar}를 10분 만에 이해시키는 설명법", "비유+예시+체크리스트"),
    (
        "이번 주 {pillar} 핵심 요약 + 숙제 가이드",
        "요약→예시→숙제포인트",
    ),
];

/// Template-based provider. Stateless; construct freely.
#[derive(Debug, Clone, Default)]
pub struct DeterministicProvider;

impl DeterministicProvider {
    pub fn new() -> Self {
        Self
    }
}

fn fill(template: &str, pillar: &str, audience: &str) -> String {
    template
        .replace("{pillar}", pillar)
        .replace("{audience}", audience)
}

/// Usefulness score for the candidate at `index`: 85 − i, clamped to [40, 95].
fn candidate_score(index: usize) -> i32 {
    (85 - index as i32).clamp(40, 95)
}

#[async_trait]
impl ContentProvider for DeterministicProvider {
    async fn topic_candidates(
        &self,
        pillar: &str,
        audience: &str,
        n: usize,
    ) -> Result<Vec<TopicCandidate>> {
        let candidates = (0..n)
            .map(|i| {
                let (title_tpl, angle) = TOPIC_TEMPLATES[i % TOPIC_TEMPLATES.len()];
                TopicCandidate {
                    title: fill(title_tpl, pillar, audience),
                    angle: angle.to_string(),
                    score: candidate_score(i),
                }
            })
            .collect();
        Ok(candidates)
    }

    async fn draft_content(
        &self,
        title: &str,
        angle: &str,
        pillar: &str,
        audience: &str,
    ) -> Result<DraftContent> {
        let summary = format!("{title}에 대해 {angle} 흐름으로 정리합니다. 대상: {audience}");
        let content_md = format!(
            "# {title}\n\
             \n\
             > 대상: {audience}  \n\
             > 카테고리: {pillar}  \n\
             > 구성: {angle}\n\
             \n\
             ## 1) 문제 상황\n\
             - 왜 어려운지 2~3가지 포인트로 정리합니다.\n\
             \n\
             ## 2) 핵심 개념\n\
             - 쉬운 말로 정의\n\
             - 예시 1개\n\
             \n\
             ## 3) 적용 루틴\n\
             1. 오늘 할 일\n\
             2. 내일 할 일\n\
             3. 체크리스트\n\
             \n\
             ## 4) 연습/숙제\n\
             - 연습문제 2개(또는 체크 질문 3개)\n\
             \n\
             ## 마무리\n\
             - 다음 글 예고 / 과장 없는 CTA\n"
        );
        Ok(DraftContent {
            content_md,
            summary,
        })
    }
}
