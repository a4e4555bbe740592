//! Application configuration for AutoDraft.
//!
//! User config lives at `~/.autodraft/autodraft.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AutodraftError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "autodraft.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".autodraft";

// ---------------------------------------------------------------------------
// Config structs (matching autodraft.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Content-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Quality-gate settings.
    #[serde(default)]
    pub quality: QualityConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// SQLite database file path.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Directory exported HTML documents are written to.
    #[serde(default = "default_export_dir")]
    pub export_dir: String,

    /// Default number of topic candidates per brief.
    #[serde(default = "default_topic_count")]
    pub topic_count: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            export_dir: default_export_dir(),
            topic_count: default_topic_count(),
        }
    }
}

fn default_db_path() -> String {
    "./autodraft.db".into()
}
fn default_export_dir() -> String {
    "./exports".into()
}
fn default_topic_count() -> u32 {
    10
}

/// Which content-provider variant to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Template-based generation, no network.
    #[default]
    Deterministic,
    /// Remote structured-generation service, falling back to deterministic.
    Remote,
}

/// `[provider]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider variant, resolved once at construction.
    #[serde(default)]
    pub kind: ProviderKind,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Base URL of the chat-completions endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model id sent with each generation request.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            model: default_model(),
        }
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4.1-mini".into()
}

/// `[quality]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Risk score at or above which a draft is routed to NEEDS_REVIEW.
    #[serde(default = "default_review_threshold")]
    pub review_threshold: i32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            review_threshold: default_review_threshold(),
        }
    }
}

fn default_review_threshold() -> i32 {
    30
}

// ---------------------------------------------------------------------------
// Pipeline config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime configuration passed by reference into the orchestrator and steps.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory exported HTML documents are written to.
    pub export_dir: PathBuf,
    /// Quality-gate review threshold.
    pub review_threshold: i32,
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            export_dir: PathBuf::from(&config.defaults.export_dir),
            review_threshold: config.quality.review_threshold,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.autodraft/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AutodraftError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.autodraft/autodraft.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AutodraftError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        AutodraftError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| AutodraftError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| AutodraftError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| AutodraftError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that the provider API key env var is set and non-empty.
///
/// Only meaningful for the remote provider; the deterministic variant
/// needs no credentials and always validates.
pub fn validate_api_key(config: &AppConfig) -> Result<()> {
    if config.provider.kind != ProviderKind::Remote {
        return Ok(());
    }

    let var_name = &config.provider.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(()),
        _ => Err(AutodraftError::config(format!(
            "provider API key not found. Set the {var_name} environment variable \
             or switch [provider].kind to \"deterministic\"."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("export_dir"));
        assert!(toml_str.contains("OPENAI_API_KEY"));
        assert!(toml_str.contains("deterministic"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.topic_count, 10);
        assert_eq!(parsed.quality.review_threshold, 30);
        assert_eq!(parsed.provider.kind, ProviderKind::Deterministic);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[provider]
kind = "remote"
model = "gpt-4.1"

[quality]
review_threshold = 50
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.provider.kind, ProviderKind::Remote);
        assert_eq!(config.provider.model, "gpt-4.1");
        assert_eq!(config.provider.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.quality.review_threshold, 50);
        assert_eq!(config.defaults.export_dir, "./exports");
    }

    #[test]
    fn pipeline_config_from_app_config() {
        let app = AppConfig::default();
        let pipeline = PipelineConfig::from(&app);
        assert_eq!(pipeline.export_dir, PathBuf::from("./exports"));
        assert_eq!(pipeline.review_threshold, 30);
    }

    #[test]
    fn api_key_validation_for_remote() {
        let mut config = AppConfig::default();
        config.provider.kind = ProviderKind::Remote;
        // Use a unique env var name to avoid interfering with other tests
        config.provider.api_key_env = "AD_TEST_NONEXISTENT_KEY_12345".into();
        let result = validate_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }

    #[test]
    fn api_key_not_required_for_deterministic() {
        let mut config = AppConfig::default();
        config.provider.api_key_env = "AD_TEST_NONEXISTENT_KEY_12345".into();
        assert!(validate_api_key(&config).is_ok());
    }
}
