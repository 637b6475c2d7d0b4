//! Environment-driven configuration (a `.env` file is loaded first by the binary)

use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::llm::{CLAUDE_API_URL, CLAUDE_MODEL};

const DEFAULT_SAVE_DEBOUNCE_MS: u64 = 500;
const APP_DIR: &str = "training-planner";
const DB_FILE: &str = "planner.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value}")]
  Invalid { key: String, value: String },

  #[error("No data directory available; set PLANNER_DB_PATH")]
  NoDataDir,
}

impl Serialize for ConfigError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// Program generator settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
  /// Generation is disabled without a key
  pub api_key: Option<String>,
  pub api_url: String,
  pub model: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub db_path: PathBuf,
  pub save_debounce: Duration,
  pub export_dir: PathBuf,
  pub llm: LlmConfig,
}

impl AppConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    let db_path = match non_empty("PLANNER_DB_PATH") {
      Some(path) => PathBuf::from(path),
      None => dirs::data_dir()
        .ok_or(ConfigError::NoDataDir)?
        .join(APP_DIR)
        .join(DB_FILE),
    };

    let save_debounce = match non_empty("PLANNER_SAVE_DEBOUNCE_MS") {
      Some(raw) => Duration::from_millis(raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key: "PLANNER_SAVE_DEBOUNCE_MS".into(),
        value: raw.clone(),
      })?),
      None => Duration::from_millis(DEFAULT_SAVE_DEBOUNCE_MS),
    };

    let export_dir = non_empty("PLANNER_EXPORT_DIR")
      .map(PathBuf::from)
      .unwrap_or_else(|| PathBuf::from("."));

    let api_url = non_empty("PLANNER_LLM_API_URL").unwrap_or_else(|| CLAUDE_API_URL.to_string());
    Url::parse(&api_url).map_err(|_| ConfigError::Invalid {
      key: "PLANNER_LLM_API_URL".into(),
      value: api_url.clone(),
    })?;

    Ok(Self {
      db_path,
      save_debounce,
      export_dir,
      llm: LlmConfig {
        api_key: non_empty("ANTHROPIC_API_KEY"),
        api_url,
        model: non_empty("PLANNER_LLM_MODEL").unwrap_or_else(|| CLAUDE_MODEL.to_string()),
      },
    })
  }

  /// Config rooted in `dir`, used by tests and throwaway sessions
  pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
    let dir = dir.into();
    Self {
      db_path: dir.join(DB_FILE),
      save_debounce: Duration::from_millis(DEFAULT_SAVE_DEBOUNCE_MS),
      export_dir: dir,
      llm: LlmConfig {
        api_key: None,
        api_url: CLAUDE_API_URL.to_string(),
        model: CLAUDE_MODEL.to_string(),
      },
    }
  }
}

fn non_empty(key: &str) -> Option<String> {
  env::var(key).ok().filter(|v| !v.trim().is_empty())
}
