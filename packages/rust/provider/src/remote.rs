//! Remote structured-generation provider.
//!
//! Issues one chat-completions request per generation call — no retry. Any
//! failure (transport, extraction, payload shape) falls back to the embedded
//! [`DeterministicProvider`] for that call, so generation errors never
//! surface above this module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use autodraft_shared::{AutodraftError, ProviderConfig, Result};

use crate::extract::extract_json;
use crate::{ContentProvider, DeterministicProvider, DraftContent, TopicCandidate};

/// Score used when a returned topic item omits the `score` field.
const DEFAULT_TOPIC_SCORE: i64 = 70;

/// Chat-completions-backed provider with deterministic fallback.
pub struct RemoteProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    fallback: DeterministicProvider,
}

impl RemoteProvider {
    /// Build the provider from config, reading the API key from the
    /// configured environment variable.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AutodraftError::config(format!(
                    "provider API key not found. Set the {} environment variable.",
                    config.api_key_env
                ))
            })?;

        // Validate early; the request path builds URLs by string suffix.
        Url::parse(&config.base_url).map_err(|e| {
            AutodraftError::Provider(format!("invalid base_url {:?}: {e}", config.base_url))
        })?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("AutoDraft/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AutodraftError::Provider(format!("client build: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            fallback: DeterministicProvider::new(),
        })
    }

    /// Send one completion request and return the raw response text.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: "You are a helpful assistant.",
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AutodraftError::Provider(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AutodraftError::Provider(format!("HTTP {status}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AutodraftError::Provider(format!("invalid response body: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AutodraftError::Provider("empty completion".into()))
    }
}

#[async_trait]
impl ContentProvider for RemoteProvider {
    async fn topic_candidates(
        &self,
        pillar: &str,
        audience: &str,
        n: usize,
    ) -> Result<Vec<TopicCandidate>> {
        let prompt = topic_prompt(pillar, audience, n);
        let outcome = match self.complete(&prompt).await {
            Ok(text) => parse_topic_payload(&text, n),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(candidates) => Ok(candidates),
            Err(e) => {
                warn!(error = %e, "remote topic generation failed, using deterministic fallback");
                self.fallback.topic_candidates(pillar, audience, n).await
            }
        }
    }

    async fn draft_content(
        &self,
        title: &str,
        angle: &str,
        pillar: &str,
        audience: &str,
    ) -> Result<DraftContent> {
        let prompt = draft_prompt(title, angle, pillar, audience);
        let outcome = match self.complete(&prompt).await {
            Ok(text) => parse_draft_payload(&text),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(content) => Ok(content),
            Err(e) => {
                warn!(error = %e, "remote draft generation failed, using deterministic fallback");
                self.fallback
                    .draft_content(title, angle, pillar, audience)
                    .await
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

fn topic_prompt(pillar: &str, audience: &str, n: usize) -> String {
    format!(
        "너는 한국어 블로그 글 기획자다.\n\
         주제 영역(pillar)과 대상(audience)을 보고, 블로그 글 제목 후보 {n}개를 만들어라.\n\
         \n\
         반드시 JSON 배열만 출력:\n\
         [\n  \
           {{\"title\":\"...\",\"angle\":\"...\",\"score\":0-100}},\n  \
           ...\n\
         ]\n\
         \n\
         조건:\n\
         - title은 40자 이내\n\
         - angle은 한 문장(구성/전개 요약)\n\
         - score는 실전 유용도 점수(0~100)\n\
         pillar={pillar}\n\
         audience={audience}\n"
    )
}

fn draft_prompt(title: &str, angle: &str, pillar: &str, audience: &str) -> String {
    format!(
        "너는 한국어 블로그 글 작성자다.\n\
         아래 정보를 바탕으로 '블로그에 붙여넣기 쉬운' 마크다운 초안을 작성해라.\n\
         \n\
         반드시 JSON 객체만 출력:\n\
         {{\n  \
           \"summary\": \"한 문장 요약\",\n  \
           \"content_md\": \"마크다운 전체\"\n\
         }}\n\
         \n\
         작성 규칙:\n\
         - 과장/보장 표현(100%, 무조건, 합격보장 등) 금지\n\
         - H1 1개, H2 3~6개\n\
         - 목록(ul/ol), 인용문(> ) 포함\n\
         - 마지막에 짧은 CTA(상담 유도는 과장 없이)\n\
         title={title}\n\
         angle={angle}\n\
         pillar={pillar}\n\
         audience={audience}\n"
    )
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Payload parsing
// ---------------------------------------------------------------------------

fn default_score() -> i64 {
    DEFAULT_TOPIC_SCORE
}

#[derive(Deserialize)]
struct TopicItemPayload {
    title: String,
    angle: String,
    #[serde(default = "default_score")]
    score: i64,
}

#[derive(Deserialize)]
struct DraftPayload {
    summary: String,
    content_md: String,
}

/// Parse a topic-list payload out of free-form response text.
///
/// Lists longer than `n` are truncated; shorter lists are returned as-is
/// (the caller receives fewer than `n`).
fn parse_topic_payload(text: &str, n: usize) -> Result<Vec<TopicCandidate>> {
    let json = extract_json(text)
        .ok_or_else(|| AutodraftError::Provider("no JSON payload in response".into()))?;

    let items: Vec<TopicItemPayload> = serde_json::from_str(&json)
        .map_err(|e| AutodraftError::Provider(format!("unexpected topic payload shape: {e}")))?;

    Ok(items
        .into_iter()
        .take(n)
        .map(|item| TopicCandidate {
            title: item.title,
            angle: item.angle,
            score: item.score.clamp(0, 100) as i32,
        })
        .collect())
}

/// Parse a draft payload out of free-form response text.
fn parse_draft_payload(text: &str) -> Result<DraftContent> {
    let json = extract_json(text)
        .ok_or_else(|| AutodraftError::Provider("no JSON payload in response".into()))?;

    let payload: DraftPayload = serde_json::from_str(&json)
        .map_err(|e| AutodraftError::Provider(format!("unexpected draft payload shape: {e}")))?;

    Ok(DraftContent {
        content_md: payload.content_md,
        summary: payload.summary,
    })
}
