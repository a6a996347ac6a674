pub mod init;
pub mod reset;
pub mod settings;
pub mod stats;
pub mod take;
pub mod validate;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use quizdeck_core::session::QuizSession;
use quizdeck_store::{create_store, load_config_from, QuizdeckConfig};

/// A per-quiz question cap given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionCap {
    All,
    Limit(u32),
}

impl QuestionCap {
    pub fn limit(self) -> Option<u32> {
        match self {
            QuestionCap::All => None,
            QuestionCap::Limit(n) => Some(n),
        }
    }
}

impl FromStr for QuestionCap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(QuestionCap::All);
        }
        match s.parse::<u32>() {
            Ok(0) => Ok(QuestionCap::All),
            Ok(n) => Ok(QuestionCap::Limit(n)),
            Err(_) => Err(format!("expected a number or \"all\", got {s:?}")),
        }
    }
}

/// Load config, applying a `--user` override.
pub fn load_config(config: Option<&Path>, user: Option<String>) -> Result<QuizdeckConfig> {
    let mut config = load_config_from(config)?;
    if let Some(user) = user.filter(|u| !u.trim().is_empty()) {
        config.user_id = Some(user);
    }
    Ok(config)
}

/// A session over the configured store with the user's stored state applied.
pub async fn open_session(config: &QuizdeckConfig) -> Result<QuizSession> {
    let store = create_store(config)?;
    tracing::debug!("using {} store for user {}", store.name(), config.user_key());
    let mut session =
        QuizSession::new(store, config.user_key()).with_settings(config.default_settings());
    session.restore().await;
    Ok(session)
}

/// The question file to use: the flag if given, otherwise the configured one.
pub fn questions_path(flag: Option<PathBuf>, config: &QuizdeckConfig) -> PathBuf {
    flag.unwrap_or_else(|| config.questions.clone())
}
