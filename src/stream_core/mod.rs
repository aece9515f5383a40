//! Stream Core - Lexicon Scoring and Rolling Aggregation
//!
//! This module turns an unbounded stream of short text events into bounded,
//! continuously updated summary state suitable for display.
//!
//! # Architecture
//!
//! ```text
//! JSONL file → JsonlTailReader (StreamReader) → Event
//!     ↓
//! EventScorer (content_score, impact_score)
//!     ↓
//! SignalDetector (HIGH IMPACT, OPPORTUNITY, SIGNIFICANT)
//!     ↓
//! RollingAggregator (paired window, keyword counts, contributors, totals)
//!     ↓
//! Snapshot → Presenter
//! ```

pub mod aggregator;
pub mod backoff;
pub mod detector;
pub mod event;
pub mod lexicon;
pub mod reader;
pub mod scorer;
pub mod window;

pub use aggregator::{Rates, RollingAggregator, Snapshot, TermCount, Totals};
pub use backoff::ExponentialBackoff;
pub use detector::SignalDetector;
pub use event::{Event, EventError};
pub use lexicon::{Category, Lexicon, LexiconError};
pub use reader::{JsonlTailReader, PollOutcome, StreamError, StreamReader};
pub use scorer::{score, EventScorer, ScoreResult};
pub use window::{PairedWindow, SeriesPoint, DEFAULT_WINDOW_CAPACITY};
