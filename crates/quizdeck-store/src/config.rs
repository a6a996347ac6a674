//! Configuration and store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizdeck_core::model::{Settings, DEFAULT_QUIZ_TITLE, DEFAULT_TIME_LIMIT_MINUTES};
use quizdeck_core::traits::Store;

use crate::fallback::FallbackStore;
use crate::local::LocalStore;
use crate::remote::{RemoteStore, DEFAULT_TIMEOUT_SECS};

/// User key for sessions without a user id. The local store ignores it.
pub const LOCAL_USER: &str = "local";

/// Remote document store settings.
///
/// Note: Custom Debug impl masks the API key to keep it out of logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_app_id")]
    pub app_id: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("app_id", &self.app_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_app_id() -> String {
    "quizdeck".to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings used when nothing is stored for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultSettings {
    /// Question cap; absent or zero shows every question.
    #[serde(default)]
    pub num_questions: Option<u32>,
    #[serde(default)]
    pub enable_timer: bool,
    #[serde(default = "default_time_limit")]
    pub time_limit_minutes: u32,
    #[serde(default = "default_title")]
    pub quiz_title: String,
}

fn default_time_limit() -> u32 {
    DEFAULT_TIME_LIMIT_MINUTES
}
fn default_title() -> String {
    DEFAULT_QUIZ_TITLE.to_string()
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            num_questions: None,
            enable_timer: false,
            time_limit_minutes: default_time_limit(),
            quiz_title: default_title(),
        }
    }
}

impl From<&DefaultSettings> for Settings {
    fn from(d: &DefaultSettings) -> Self {
        Settings {
            num_questions: d.num_questions.filter(|n| *n > 0),
            enable_timer: d.enable_timer,
            time_limit_minutes: d.time_limit_minutes,
            quiz_title: d.quiz_title.clone(),
        }
    }
}

/// Top-level quizdeck configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizdeckConfig {
    /// Default question file.
    #[serde(default = "default_questions")]
    pub questions: PathBuf,
    /// Directory of the local store.
    #[serde(default = "default_local_dir")]
    pub local_dir: PathBuf,
    /// Opaque user key for the remote store.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub defaults: DefaultSettings,
}

fn default_questions() -> PathBuf {
    PathBuf::from("questions.csv")
}
fn default_local_dir() -> PathBuf {
    PathBuf::from(".quizdeck")
}

impl Default for QuizdeckConfig {
    fn default() -> Self {
        Self {
            questions: default_questions(),
            local_dir: default_local_dir(),
            user_id: None,
            remote: None,
            defaults: DefaultSettings::default(),
        }
    }
}

impl QuizdeckConfig {
    /// The key progress is stored under.
    pub fn user_key(&self) -> &str {
        self.user_id.as_deref().unwrap_or(LOCAL_USER)
    }

    pub fn default_settings(&self) -> Settings {
        Settings::from(&self.defaults)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizdeck.toml` in the current directory
/// 2. `~/.config/quizdeck/config.toml`
///
/// Environment variable overrides: `QUIZDECK_API_KEY`, `QUIZDECK_USER_ID`.
pub fn load_config() -> Result<QuizdeckConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizdeckConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizdeck.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizdeckConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizdeckConfig::default(),
    };

    Ok(apply_env(config))
}

/// Apply env var overrides, then resolve `${VAR}` references.
fn apply_env(mut config: QuizdeckConfig) -> QuizdeckConfig {
    if let Ok(user) = std::env::var("QUIZDECK_USER_ID") {
        config.user_id = Some(user);
    }
    if let (Ok(key), Some(remote)) = (std::env::var("QUIZDECK_API_KEY"), config.remote.as_mut()) {
        remote.api_key = key;
    }

    config.user_id = config
        .user_id
        .as_deref()
        .map(resolve_env_vars)
        .filter(|u| !u.trim().is_empty());
    if let Some(remote) = config.remote.as_mut() {
        remote.base_url = resolve_env_vars(&remote.base_url);
        remote.api_key = resolve_env_vars(&remote.api_key);
        remote.app_id = resolve_env_vars(&remote.app_id);
    }
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizdeck"))
}

/// Pick the store for a session.
///
/// A configured remote with a user id gets the remote store backed by the
/// local one; anything else gets the local store alone.
pub fn create_store(config: &QuizdeckConfig) -> Result<Arc<dyn Store>> {
    let local = Arc::new(LocalStore::new(&config.local_dir));

    match (&config.remote, &config.user_id) {
        (Some(remote), Some(_)) => {
            let primary = RemoteStore::with_timeout(
                &remote.base_url,
                &remote.api_key,
                &remote.app_id,
                remote.timeout_secs,
            )
            .context("failed to set up remote store")?;
            tracing::debug!("using remote store at {}", remote.base_url);
            Ok(Arc::new(FallbackStore::new(Arc::new(primary), local)))
        }
        (Some(_), None) => {
            tracing::info!("no user id configured, keeping progress locally");
            Ok(local)
        }
        (None, _) => Ok(local),
    }
}
