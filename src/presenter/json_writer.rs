//! JSON snapshot writer - replaces a file with the latest snapshot on every tick

use super::backend::{Presenter, PresenterError};
use crate::stream_core::Snapshot;
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct SnapshotDocument<'a> {
    generated_at: i64,
    #[serde(flatten)]
    snapshot: &'a Snapshot,
}

pub struct JsonSnapshotWriter {
    path: PathBuf,
}

impl JsonSnapshotWriter {
    pub fn new(path: PathBuf) -> Self {
        log::info!("📝 Writing snapshots to: {}", path.display());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save snapshot to the JSON file (write to a temp file, then rename so
    /// readers never see a half-written document)
    pub fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), PresenterError> {
        let document = SnapshotDocument {
            generated_at: Utc::now().timestamp(),
            snapshot,
        };
        let json = serde_json::to_string_pretty(&document)?;
        write_atomic(&self.path, json.as_bytes())?;

        log::debug!(
            "Saved snapshot ({} events) to {}",
            snapshot.totals.event_count,
            self.path.display()
        );
        Ok(())
    }
}

pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

#[async_trait]
impl Presenter for JsonSnapshotWriter {
    async fn render(&mut self, snapshot: &Snapshot) -> Result<(), PresenterError> {
        self.save_snapshot(snapshot)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
