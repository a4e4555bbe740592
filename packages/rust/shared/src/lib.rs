//! Shared types, error model, and configuration for AutoDraft.
//!
//! This crate is the foundation depended on by all other AutoDraft crates.
//! It provides:
//! - [`AutodraftError`] — the unified error type
//! - Domain types ([`Topic`], [`Draft`], [`TopicId`], [`DraftId`], statuses)
//! - Configuration ([`AppConfig`], [`PipelineConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, PipelineConfig, ProviderConfig, ProviderKind, QualityConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from, validate_api_key,
};
pub use error::{AutodraftError, Result};
pub use types::{
    Draft, DraftId, DraftOutcome, DraftStatus, OutcomeStatus, Topic, TopicId, TopicIdea,
    TopicStatus,
};
