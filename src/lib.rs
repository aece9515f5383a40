//! Lexiflow - streaming lexicon scoring and rolling aggregation
//!
//! Reads short text events from an append-only JSONL stream, scores each one
//! against a category lexicon, folds the scores into bounded rolling state and
//! hands snapshots of that state to a presenter on a fixed cadence.

#[cfg(test)]
mod tests;

pub mod config;
pub mod driver;
pub mod presenter;
pub mod stream_core;
pub mod ui;

pub use config::{ConfigError, LexiflowConfig};
pub use driver::{Driver, DriverConfig, RunSummary, StopReason};
