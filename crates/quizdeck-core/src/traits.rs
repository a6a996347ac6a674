//! Persistence seam.
//!
//! The session controller only talks to a [`Store`]. Backends live in the
//! `quizdeck-store` crate; which one is used is decided once, when the
//! session is built.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{Settings, Verdict};

/// The persisted per-user record. Every field is optional so a merge save
/// can carry just the part that changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_answers: Option<BTreeMap<String, Verdict>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrongly_answered: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl StoredState {
    /// A record carrying only settings.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: Some(settings),
            ..Self::default()
        }
    }

    /// Overlay the fields present in `other`.
    pub fn merge(&mut self, other: StoredState) {
        if other.settings.is_some() {
            self.settings = other.settings;
        }
        if other.session_answers.is_some() {
            self.session_answers = other.session_answers;
        }
        if other.wrongly_answered.is_some() {
            self.wrongly_answered = other.wrongly_answered;
        }
        if other.last_updated.is_some() {
            self.last_updated = other.last_updated;
        }
    }

    /// Empty one field. Settings go back to absent; progress fields become
    /// empty collections so a merge save overwrites the stored value.
    pub fn clear(&mut self, field: StateField) {
        match field {
            StateField::Settings => self.settings = None,
            StateField::SessionAnswers => self.session_answers = Some(BTreeMap::new()),
            StateField::WronglyAnswered => self.wrongly_answered = Some(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_none()
            && self.session_answers.is_none()
            && self.wrongly_answered.is_none()
    }
}

/// One clearable field of a [`StoredState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
    Settings,
    SessionAnswers,
    WronglyAnswered,
}

impl StateField {
    /// Field name in the stored JSON document.
    pub fn as_str(&self) -> &'static str {
        match self {
            StateField::Settings => "settings",
            StateField::SessionAnswers => "sessionAnswers",
            StateField::WronglyAnswered => "wronglyAnswered",
        }
    }
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable storage for a user's settings and progress.
#[async_trait]
pub trait Store: Send + Sync {
    /// Human-readable backend name (e.g. "local").
    fn name(&self) -> &str;

    /// Load the record for `user`, or `None` if nothing is stored.
    async fn load(&self, user: &str) -> Result<Option<StoredState>, StoreError>;

    /// Save `record`. With `merge`, only present fields are written;
    /// otherwise the whole record is replaced.
    async fn save(&self, user: &str, record: &StoredState, merge: bool) -> Result<(), StoreError>;

    /// Empty one field of the stored record.
    async fn clear(&self, user: &str, field: StateField) -> Result<(), StoreError>;
}

/// A store that keeps nothing. Sessions built without a backend use it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

#[async_trait]
impl Store for NoopStore {
    fn name(&self) -> &str {
        "noop"
    }

    async fn load(&self, _user: &str) -> Result<Option<StoredState>, StoreError> {
        Ok(None)
    }

    async fn save(&self, _user: &str, _record: &StoredState, _merge: bool) -> Result<(), StoreError> {
        Ok(())
    }

    async fn clear(&self, _user: &str, _field: StateField) -> Result<(), StoreError> {
        Ok(())
    }
}
