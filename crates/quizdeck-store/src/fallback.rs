//! Remote-first store that degrades to a local one.

use std::sync::Arc;

use async_trait::async_trait;

use quizdeck_core::error::StoreError;
use quizdeck_core::traits::{StateField, Store, StoredState};

/// Reads and writes go to `primary`; when it fails, `fallback` takes the
/// operation instead. Only a failure of both is returned.
pub struct FallbackStore {
    primary: Arc<dyn Store>,
    fallback: Arc<dyn Store>,
}

impl FallbackStore {
    pub fn new(primary: Arc<dyn Store>, fallback: Arc<dyn Store>) -> Self {
        Self { primary, fallback }
    }

    /// Log a primary failure before `op` moves to the fallback.
    fn report(&self, op: &str, e: &StoreError) {
        if e.is_unavailable() {
            tracing::warn!(
                "{} store unreachable, {op} goes to {} store: {e}",
                self.primary.name(),
                self.fallback.name()
            );
        } else {
            tracing::error!(
                "{} store rejected {op}, using {} store: {e}",
                self.primary.name(),
                self.fallback.name()
            );
        }
    }
}

#[async_trait]
impl Store for FallbackStore {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn load(&self, user: &str) -> Result<Option<StoredState>, StoreError> {
        match self.primary.load(user).await {
            Ok(Some(state)) => return Ok(Some(state)),
            Ok(None) => {
                tracing::debug!("no record in {} store, trying {}", self.primary.name(), self.fallback.name());
            }
            Err(e) => self.report("load", &e),
        }
        self.fallback.load(user).await
    }

    async fn save(&self, user: &str, record: &StoredState, merge: bool) -> Result<(), StoreError> {
        match self.primary.save(user, record, merge).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.report("save", &e);
                self.fallback.save(user, record, merge).await
            }
        }
    }

    async fn clear(&self, user: &str, field: StateField) -> Result<(), StoreError> {
        match self.primary.clear(user, field).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.report(&format!("clear of {field}"), &e);
                self.fallback.clear(user, field).await
            }
        }
    }
}
