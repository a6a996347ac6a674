//! Local JSON store.
//!
//! Three fixed keys, one file each. Local storage is shared by every user
//! on the machine.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use quizdeck_core::error::StoreError;
use quizdeck_core::traits::{StateField, Store, StoredState};

pub const SETTINGS_KEY: &str = "quiz_settings";
pub const SESSION_ANSWERS_KEY: &str = "quiz_session_answers";
pub const WRONG_ANSWERS_KEY: &str = "quiz_wrong_answers";

/// Key-value store backed by JSON files in one directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, field: StateField) -> PathBuf {
        let key = match field {
            StateField::Settings => SETTINGS_KEY,
            StateField::SessionAnswers => SESSION_ANSWERS_KEY,
            StateField::WronglyAnswered => WRONG_ANSWERS_KEY,
        };
        self.dir.join(format!("{key}.json"))
    }

    /// Read one key. Missing files and malformed JSON both read as absent.
    async fn read<T: DeserializeOwned>(&self, field: StateField) -> Result<Option<T>, StoreError> {
        let path = self.path(field);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("ignoring malformed {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    async fn write<T: Serialize>(&self, field: StateField, value: &T) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        tokio::fs::write(self.path(field), json).await?;
        Ok(())
    }

    async fn remove(&self, field: StateField) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path(field)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl Store for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn load(&self, _user: &str) -> Result<Option<StoredState>, StoreError> {
        let state = StoredState {
            settings: self.read(StateField::Settings).await?,
            session_answers: self.read(StateField::SessionAnswers).await?,
            wrongly_answered: self.read(StateField::WronglyAnswered).await?,
            last_updated: None,
        };
        Ok((!state.is_empty()).then_some(state))
    }

    async fn save(&self, _user: &str, record: &StoredState, merge: bool) -> Result<(), StoreError> {
        match &record.settings {
            Some(settings) => self.write(StateField::Settings, settings).await?,
            None if !merge => self.remove(StateField::Settings).await?,
            None => {}
        }
        match &record.session_answers {
            Some(answers) => self.write(StateField::SessionAnswers, answers).await?,
            None if !merge => self.remove(StateField::SessionAnswers).await?,
            None => {}
        }
        match &record.wrongly_answered {
            Some(wrong) => self.write(StateField::WronglyAnswered, wrong).await?,
            None if !merge => self.remove(StateField::WronglyAnswered).await?,
            None => {}
        }
        Ok(())
    }

    async fn clear(&self, _user: &str, field: StateField) -> Result<(), StoreError> {
        self.remove(field).await
    }
}
