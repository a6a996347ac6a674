//! Background persistence.
//!
//! State changes are queued on an unbounded channel and written by one task
//! in submission order. Callers never wait on the store except through
//! [`Persister::flush`].

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::traits::{StateField, Store, StoredState};

enum Command {
    Save { record: StoredState, merge: bool },
    Clear(StateField),
    Flush(oneshot::Sender<()>),
}

pub(crate) struct Persister {
    tx: Option<mpsc::UnboundedSender<Command>>,
}

impl Persister {
    /// Start the writer task on the current tokio runtime. Outside a
    /// runtime, writes are dropped.
    pub(crate) fn spawn(store: Arc<dyn Store>, user: String) -> Self {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!("no async runtime, progress will not be persisted");
                return Self { tx: None };
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(run(store, user, rx));
        Self { tx: Some(tx) }
    }

    pub(crate) fn save(&self, record: StoredState, merge: bool) {
        self.send(Command::Save { record, merge });
    }

    pub(crate) fn clear(&self, field: StateField) {
        self.send(Command::Clear(field));
    }

    /// Wait until every write queued so far has been attempted.
    pub(crate) async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        self.send(Command::Flush(done));
        let _ = wait.await;
    }

    fn send(&self, command: Command) {
        if let Some(tx) = &self.tx {
            if tx.send(command).is_err() {
                tracing::warn!("persistence task has stopped, dropping write");
            }
        }
    }
}

async fn run(store: Arc<dyn Store>, user: String, mut rx: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Save { record, merge } => {
                if let Err(e) = store.save(&user, &record, merge).await {
                    tracing::warn!("failed to save progress to {} store: {e}", store.name());
                }
            }
            Command::Clear(field) => {
                if let Err(e) = store.clear(&user, field).await {
                    tracing::warn!("failed to clear {field} in {} store: {e}", store.name());
                }
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("persistence task finished");
}
