//! Core domain types for the AutoDraft pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AutodraftError;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

macro_rules! prefixed_id {
    ($name:ident, $prefix:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh, time-sortable identifier.
            pub fn new() -> Self {
                Self(format!("{}{}", $prefix, Uuid::now_v7().simple()))
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = AutodraftError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                if s.len() > $prefix.len() && s.starts_with($prefix) {
                    Ok(Self(s.to_string()))
                } else {
                    Err(AutodraftError::validation(format!(
                        "invalid {} identifier: {s:?}",
                        stringify!($name)
                    )))
                }
            }
        }
    };
}

prefixed_id!(TopicId, "t_", "Topic identifier (`t_<uuid-v7>`).");
prefixed_id!(DraftId, "d_", "Draft identifier (`d_<uuid-v7>`).");

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Lifecycle state of a [`Topic`].
///
/// Starts at `New`; the orchestrator moves it exactly once to `Done` or
/// `Error` when the topic's pipeline run finishes. Never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopicStatus {
    New,
    Done,
    Error,
}

impl TopicStatus {
    /// Canonical storage string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Done => "DONE",
            Self::Error => "ERROR",
        }
    }

    /// Parse a storage string back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NEW" => Some(Self::New),
            "DONE" => Some(Self::Done),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a [`Draft`].
///
/// Starts at `Drafted`; the quality gate moves it to exactly one of
/// `Exported` or `NeedsReview`. Export itself does not change status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftStatus {
    Drafted,
    Exported,
    NeedsReview,
}

impl DraftStatus {
    /// Canonical storage string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drafted => "DRAFTED",
            Self::Exported => "EXPORTED",
            Self::NeedsReview => "NEEDS_REVIEW",
        }
    }

    /// Parse a storage string back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DRAFTED" => Some(Self::Drafted),
            "EXPORTED" => Some(Self::Exported),
            "NEEDS_REVIEW" => Some(Self::NeedsReview),
            _ => None,
        }
    }
}

impl std::fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// A proposed content idea awaiting draft expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// Unique identifier, assigned at creation.
    pub id: TopicId,
    /// Content category the idea belongs to.
    pub pillar: String,
    /// Target readership.
    pub audience: String,
    /// Generated title.
    pub title: String,
    /// Generated one-sentence structural angle.
    pub angle: String,
    /// Usefulness score from the provider, 0–100.
    pub score: i32,
    /// Lifecycle state.
    pub status: TopicStatus,
    /// When the topic was created.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// The generated document body for a [`Topic`], carrying risk and export state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    /// Unique identifier, assigned at creation.
    pub id: DraftId,
    /// Owning topic.
    pub topic_id: TopicId,
    /// Title copied from the topic at draft time.
    pub title: String,
    /// Generated Markdown body.
    pub content_md: String,
    /// One-sentence summary.
    pub summary: String,
    /// Content-policy risk, 0–100. Zero until the quality gate runs.
    pub risk_score: i32,
    /// Lifecycle state.
    pub status: DraftStatus,
    /// Location of the exported HTML document; empty until export succeeds.
    pub export_html_ref: String,
    /// Diagnostic text reserved for external reporting; the pipeline never sets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Public records
// ---------------------------------------------------------------------------

/// Lightweight public record emitted per generated topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicIdea {
    pub topic_id: TopicId,
    pub title: String,
    pub angle: String,
    pub score: i32,
}

/// Terminal status of one topic's pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    Exported,
    NeedsReview,
    Failed,
}

/// Per-topic result record returned by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOutcome {
    /// The requested topic id, echoed verbatim.
    pub topic_id: String,
    /// Created draft id, or empty when the run failed before/at draft creation.
    pub draft_id: String,
    pub status: OutcomeStatus,
    /// Risk score, or the 100 sentinel when the content could not be verified.
    pub risk_score: i32,
    pub summary: String,
    pub export_html_ref: String,
}

impl DraftOutcome {
    /// The failure record for a topic whose run did not complete.
    pub fn failed(topic_id: impl Into<String>) -> Self {
        Self {
            topic_id: topic_id.into(),
            draft_id: String::new(),
            status: OutcomeStatus::Failed,
            risk_score: 100,
            summary: String::new(),
            export_html_ref: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_id_has_prefix_and_roundtrips() {
        let id = TopicId::new();
        assert!(id.as_str().starts_with("t_"));
        let parsed: TopicId = id.to_string().parse().expect("parse TopicId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn draft_id_has_prefix_and_roundtrips() {
        let id = DraftId::new();
        assert!(id.as_str().starts_with("d_"));
        let parsed: DraftId = id.to_string().parse().expect("parse DraftId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn id_parse_rejects_wrong_prefix() {
        assert!("x_0123abcd".parse::<TopicId>().is_err());
        assert!("t_".parse::<TopicId>().is_err());
        assert!("".parse::<DraftId>().is_err());
    }

    #[test]
    fn topic_ids_are_unique() {
        let a = TopicId::new();
        let b = TopicId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn status_storage_roundtrip() {
        for status in [TopicStatus::New, TopicStatus::Done, TopicStatus::Error] {
            assert_eq!(TopicStatus::parse(status.as_str()), Some(status));
        }
        for status in [
            DraftStatus::Drafted,
            DraftStatus::Exported,
            DraftStatus::NeedsReview,
        ] {
            assert_eq!(DraftStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TopicStatus::parse("bogus"), None);
        assert_eq!(DraftStatus::parse(""), None);
    }

    #[test]
    fn outcome_status_serializes_screaming() {
        let json = serde_json::to_string(&OutcomeStatus::NeedsReview).unwrap();
        assert_eq!(json, r#""NEEDS_REVIEW""#);
        let json = serde_json::to_string(&OutcomeStatus::Failed).unwrap();
        assert_eq!(json, r#""FAILED""#);
    }

    #[test]
    fn failed_outcome_carries_sentinel() {
        let outcome = DraftOutcome::failed("t_missing");
        assert_eq!(outcome.topic_id, "t_missing");
        assert_eq!(outcome.draft_id, "");
        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert_eq!(outcome.risk_score, 100);
        assert_eq!(outcome.export_html_ref, "");
    }

    #[test]
    fn draft_serialization_skips_absent_last_error() {
        let draft = Draft {
            id: DraftId::new(),
            topic_id: TopicId::new(),
            title: "제목".into(),
            content_md: "# 제목\n본문".into(),
            summary: "요약".into(),
            risk_score: 0,
            status: DraftStatus::Drafted,
            export_html_ref: String::new(),
            last_error: None,
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&draft).expect("serialize");
        assert!(!json.contains("last_error"));
        assert!(json.contains(r#""status":"DRAFTED""#));

        let parsed: Draft = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.id, draft.id);
        assert_eq!(parsed.status, DraftStatus::Drafted);
    }
}
