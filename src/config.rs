//! Configuration primitives for ComplaintBase.
//!
//! Stored in a machine-readable TOML file located at:
//!   %APPDATA%/ComplaintBase/config/config.toml on Windows
//!   $XDG_DATA_HOME/ComplaintBase/config/config.toml on Linux
//!   ~/Library/Application Support/ComplaintBase/config/config.toml on macOS
//!
//! The config tracks the default dataset, which issue taxonomy the
//! dashboards classify with, chat sampling limits, and how to reach the
//! hosted completion endpoint.

use crate::classification::IssueTaxonomy;
use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Which comment export to open when none is given on the command line.
    #[serde(default)]
    pub dataset: DatasetSettings,
    /// Issue taxonomy used by the dashboards.
    #[serde(default)]
    pub classifier: ClassifierSettings,
    /// Chat assistant sampling and suggestion knobs.
    #[serde(default)]
    pub chat: ChatSettings,
    /// Hosted completion endpoint settings.
    #[serde(default)]
    pub llm: LlmSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSettings {
    /// JSON or JSON Lines export of the comment table.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Per-post reply/reshare totals export, if available.
    #[serde(default)]
    pub post_metrics_path: Option<PathBuf>,
    /// Drop promotional and too-short comments before the comment-level
    /// aggregations (issue counts, themes, timelines).
    #[serde(default = "default_customer_only")]
    pub customer_only: bool,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: None,
            post_metrics_path: None,
            customer_only: default_customer_only(),
        }
    }
}

const fn default_customer_only() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClassifierSettings {
    #[serde(default)]
    pub taxonomy: IssueTaxonomy,
}

/// Chat assistant preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Comment texts sent to the LLM as context; capped at
    /// [`MAX_CONTEXT_SAMPLES`].
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    /// Number of follow-up questions requested after each answer.
    #[serde(default = "default_suggestion_count")]
    pub suggestion_count: usize,
    #[serde(default = "default_suggestions_enabled")]
    pub suggestions_enabled: bool,
    /// System message for answer and summary prompts.
    #[serde(default = "default_assistant_persona")]
    pub assistant_persona: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            suggestion_count: default_suggestion_count(),
            suggestions_enabled: default_suggestions_enabled(),
            assistant_persona: default_assistant_persona(),
        }
    }
}

const fn default_sample_size() -> usize {
    15
}

/// Hard cap on complaint texts placed in one prompt, whatever the config says.
pub const MAX_CONTEXT_SAMPLES: usize = 20;

impl ChatSettings {
    /// `sample_size` capped at [`MAX_CONTEXT_SAMPLES`].
    pub fn context_sample_size(&self) -> usize {
        self.sample_size.min(MAX_CONTEXT_SAMPLES)
    }
}

const fn default_suggestion_count() -> usize {
    3
}

const fn default_suggestions_enabled() -> bool {
    true
}

fn default_assistant_persona() -> String {
    "You are a Telkom complaints assistant.".into()
}

/// Azure OpenAI chat-completions deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_deployment")]
    pub deployment: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Name of the environment variable holding the API key. The key itself
    /// is never written to disk.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Wall-clock timeout (ms) for a single completion request.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            deployment: default_deployment(),
            api_version: default_api_version(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl LlmSettings {
    /// Reads the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

fn default_endpoint() -> String {
    "https://localhost.openai.azure.com".into()
}

fn default_deployment() -> String {
    "gpt-4o".into()
}

fn default_api_version() -> String {
    "2025-01-01-preview".into()
}

fn default_api_key_env() -> String {
    "AZURE_OPENAI_API_KEY".into()
}

const fn default_max_tokens() -> u32 {
    300
}

const fn default_timeout_ms() -> u64 {
    30_000
}

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Overrides the data directory; tests point it at a temp dir.
pub const HOME_ENV: &str = "COMPLAINTBASE_HOME";

const APP_DIR_NAME: &str = "ComplaintBase";

/// Directory holding `config/`. `COMPLAINTBASE_HOME` wins over the OS data
/// directory.
pub fn workspace_root() -> Result<PathBuf> {
    match env::var_os(HOME_ENV) {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home)),
        _ => BaseDirs::new()
            .map(|dirs| dirs.data_dir().join(APP_DIR_NAME))
            .context("Unable to determine OS data directory"),
    }
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(workspace_root()?.join("config"))
}

/// `<workspace>/config/config.toml`.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Reads the config file. A missing file means defaults; an unreadable or
/// invalid one is an error.
pub fn load_or_default() -> Result<AppConfig> {
    let path = config_file_path()?;
    let data = match fs::read_to_string(&path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read config file {}", path.display()))
        }
    };
    let config: AppConfig = toml::from_str(&data)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    if config.chat.sample_size > MAX_CONTEXT_SAMPLES {
        warn!(
            configured = config.chat.sample_size,
            limit = MAX_CONTEXT_SAMPLES,
            "chat.sample_size is above the limit and will be capped"
        );
    }
    Ok(config)
}

pub fn save(config: &AppConfig) -> Result<()> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
    let path = dir.join(CONFIG_FILE_NAME);
    let data = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&path, data)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    debug!(path = %path.display(), "Saved config");
    Ok(())
}
