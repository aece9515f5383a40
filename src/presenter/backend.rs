//! Presenter trait for aggregate snapshots
//!
//! Defines the interface for rendering snapshots to different outputs.

use crate::stream_core::Snapshot;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum PresenterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("terminal error: {0}")]
    Terminal(String),
}

/// Consumer of aggregate snapshots, invoked on the render cadence.
#[async_trait]
pub trait Presenter: Send {
    /// Render one snapshot. Failures are logged by the caller and never
    /// affect the aggregate state.
    async fn render(&mut self, snapshot: &Snapshot) -> Result<(), PresenterError>;

    /// Presenter name for logging
    fn name(&self) -> &'static str;

    /// Whether the presenter asked the driver to stop (e.g. the user quit
    /// an interactive view).
    fn wants_shutdown(&self) -> bool {
        false
    }
}
