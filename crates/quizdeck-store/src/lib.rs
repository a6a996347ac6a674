//! quizdeck-store — Persistence backends.
//!
//! Implements the `Store` trait for a local JSON directory, a remote
//! document store over HTTP, and a fallback composition of the two, plus an
//! in-memory store for tests. Configuration decides once which one a
//! session gets.

pub mod config;
pub mod fallback;
pub mod local;
pub mod memory;
pub mod remote;

pub use config::{create_store, load_config, load_config_from, QuizdeckConfig, RemoteConfig};
pub use fallback::FallbackStore;
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use quizdeck_core::error::StoreError;
pub use remote::RemoteStore;
