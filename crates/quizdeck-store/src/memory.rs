//! In-memory store for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use quizdeck_core::error::StoreError;
use quizdeck_core::traits::{StateField, Store, StoredState};

/// A store that keeps records in a map and can be told to fail.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, StoredState>>,
    failing: AtomicBool,
    save_count: AtomicU32,
    clear_count: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails as if the network were down.
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    /// Seed a record for `user`.
    pub fn with_state(self, user: &str, state: StoredState) -> Self {
        self.lock().insert(user.to_string(), state);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> u32 {
        self.save_count.load(Ordering::Relaxed)
    }

    /// Number of successful clears.
    pub fn clear_count(&self) -> u32 {
        self.clear_count.load(Ordering::Relaxed)
    }

    /// Current record for `user`.
    pub fn state(&self, user: &str) -> Option<StoredState> {
        self.lock().get(user).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoredState>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::Relaxed) {
            Err(StoreError::Network("memory store set to fail".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self, user: &str) -> Result<Option<StoredState>, StoreError> {
        self.check()?;
        Ok(self.state(user))
    }

    async fn save(&self, user: &str, record: &StoredState, merge: bool) -> Result<(), StoreError> {
        self.check()?;
        let mut records = self.lock();
        if merge {
            records
                .entry(user.to_string())
                .or_default()
                .merge(record.clone());
        } else {
            records.insert(user.to_string(), record.clone());
        }
        self.save_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn clear(&self, user: &str, field: StateField) -> Result<(), StoreError> {
        self.check()?;
        self.lock()
            .entry(user.to_string())
            .or_default()
            .clear(field);
        self.clear_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
