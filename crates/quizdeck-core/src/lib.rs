//! quizdeck-core — Question model, grading engine, and progress tracking.
//!
//! This crate defines the question data model, the classifier that turns raw
//! CSV rows into typed questions, the grading rules for every question
//! variant, and the session controller that ties them to a persistent store.

pub mod classifier;
pub mod error;
pub mod grading;
pub mod model;
pub mod parser;
mod persist;
pub mod progress;
pub mod report;
pub mod response;
pub mod session;
pub mod statistics;
pub mod timer;
pub mod traits;
