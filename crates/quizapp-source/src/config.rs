//! Configuration loading and source factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizapp_core::model::{
    QuizSettings, OPENTDB_CATEGORY, OPENTDB_DIFFICULTY, OPENTDB_TYPE, QUESTION_COUNT,
};
use quizapp_core::traits::QuestionSource;

use crate::fixed::StaticSource;
use crate::opentdb::{BatchQuery, OpenTdbSource, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Environment variable overriding `source.base_url`.
pub const API_URL_ENV: &str = "QUIZAPP_API_URL";

/// Largest batch the Open Trivia DB API serves per request.
const MAX_AMOUNT: u32 = 50;

/// Where questions come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the trivia API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Questions per session.
    #[serde(default = "default_amount")]
    pub amount: u32,
    /// Trivia category id.
    #[serde(default = "default_category")]
    pub category: u32,
    /// Difficulty filter.
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    /// Question type filter.
    #[serde(default = "default_kind", alias = "type")]
    pub kind: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_amount() -> u32 {
    QUESTION_COUNT
}
fn default_category() -> u32 {
    OPENTDB_CATEGORY
}
fn default_difficulty() -> String {
    OPENTDB_DIFFICULTY.to_string()
}
fn default_kind() -> String {
    OPENTDB_TYPE.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            amount: default_amount(),
            category: default_category(),
            difficulty: default_difficulty(),
            kind: default_kind(),
            timeout_secs: default_timeout(),
        }
    }
}

impl SourceConfig {
    pub fn batch_query(&self) -> BatchQuery {
        BatchQuery {
            amount: self.amount,
            category: self.category,
            difficulty: self.difficulty.clone(),
            kind: self.kind.clone(),
        }
    }
}

/// Top-level quizapp configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizappConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub quiz: QuizSettings,
}

impl QuizappConfig {
    /// Reject values the quiz cannot run with.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            (1..=MAX_AMOUNT).contains(&self.source.amount),
            "source.amount must be between 1 and {MAX_AMOUNT}"
        );
        anyhow::ensure!(
            self.source.timeout_secs >= 1,
            "source.timeout_secs must be at least 1"
        );
        anyhow::ensure!(
            self.quiz.question_time_secs >= 1,
            "quiz.question_time_secs must be at least 1"
        );
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn apply_api_url_override(config: &mut QuizappConfig, value: Option<String>) {
    if let Some(url) = value.filter(|u| !u.is_empty()) {
        config.source.base_url = url;
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizapp.toml` in the current directory
/// 2. `~/.config/quizapp/config.toml`
///
/// Environment variable override: `QUIZAPP_API_URL`.
pub fn load_config() -> Result<QuizappConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizappConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizapp.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<QuizappConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => QuizappConfig::default(),
    };

    config.source.base_url = resolve_env_vars(&config.source.base_url);
    apply_api_url_override(&mut config, std::env::var(API_URL_ENV).ok());
    config.validate()?;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizapp"))
}

/// Create the remote question source from its configuration.
pub fn create_source(config: &SourceConfig) -> Result<Box<dyn QuestionSource>> {
    let source = OpenTdbSource::new(&config.base_url, config.batch_query(), config.timeout_secs)?;
    Ok(Box::new(source))
}

/// Create a source that serves the built-in question set without network.
pub fn create_offline_source() -> Box<dyn QuestionSource> {
    Box::new(StaticSource::fallback())
}
