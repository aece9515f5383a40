//! Pollable event sources, including an async JSONL tail reader with file
//! rotation detection

use super::event::{Event, EventError};
use async_trait::async_trait;
use chrono::Utc;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("stream source unavailable: {0}")]
    Unavailable(String),

    #[error("stream IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of one poll. Records keep arrival order; malformed ones are passed
/// through as errors so the caller can log and count them.
#[derive(Debug)]
pub enum PollOutcome {
    Records(Vec<Result<Event, EventError>>),
    EndOfStream,
}

/// A source that yields each event at most once, in arrival order.
#[async_trait]
pub trait StreamReader: Send {
    async fn poll(&mut self) -> Result<PollOutcome, StreamError>;

    fn describe(&self) -> String;
}

/// Reads a JSONL file that another process keeps appending to.
///
/// Only newline-terminated lines are emitted while following; a partially
/// written line is held back until its newline arrives.
pub struct JsonlTailReader {
    path: PathBuf,
    file: Option<BufReader<File>>,
    inode: Option<u64>,
    offset: u64,
    partial: Vec<u8>,
    from_start: bool,
    follow: bool,
}

impl JsonlTailReader {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            file: None,
            inode: None,
            offset: 0,
            partial: Vec::new(),
            from_start: true,
            follow: true,
        }
    }

    /// Start at the current end of the file instead of replaying it.
    pub fn skip_existing(mut self) -> Self {
        self.from_start = false;
        self
    }

    /// Read what is there once, then report end of stream.
    pub fn once(mut self) -> Self {
        self.follow = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open(&mut self, seek_to_end: bool) -> Result<(), StreamError> {
        let file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StreamError::Unavailable(format!(
                    "{} does not exist yet",
                    self.path.display()
                )))
            }
            Err(e) => return Err(e.into()),
        };
        let metadata = file.metadata().await?;

        #[cfg(unix)]
        {
            self.inode = Some(metadata.ino());
        }

        let mut reader = BufReader::new(file);
        self.offset = if seek_to_end {
            reader.seek(SeekFrom::End(0)).await?
        } else {
            0
        };
        if seek_to_end {
            log::info!(
                "📖 Started tailing: {} (skipping {} existing bytes)",
                self.path.display(),
                metadata.len()
            );
        } else {
            log::info!("📖 Started tailing: {}", self.path.display());
        }
        self.partial.clear();
        self.file = Some(reader);
        Ok(())
    }

    /// Detect if the file has been rotated (inode changed) or truncated.
    async fn detect_rotation(&self) -> Result<bool, StreamError> {
        let metadata = match tokio::fs::metadata(&self.path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StreamError::Unavailable(format!(
                    "{} disappeared",
                    self.path.display()
                )))
            }
            Err(e) => return Err(e.into()),
        };

        #[cfg(unix)]
        {
            if self.inode.is_some_and(|old| old != metadata.ino()) {
                return Ok(true);
            }
        }

        Ok(metadata.len() < self.offset)
    }

    /// Drain complete lines. Bytes are decoded per line, so a line that is
    /// not valid UTF-8 becomes an error record without touching its
    /// neighbours, and `offset` always tracks what was consumed.
    async fn read_available(&mut self) -> Result<Vec<Result<String, EventError>>, StreamError> {
        let mut lines = Vec::new();
        let Some(reader) = self.file.as_mut() else {
            return Ok(lines);
        };

        loop {
            let mut buf = Vec::new();
            let n = reader.read_until(b'\n', &mut buf).await?;
            if n == 0 {
                break;
            }
            self.offset += n as u64;

            if buf.last() != Some(&b'\n') {
                self.partial.extend_from_slice(&buf);
                break;
            }

            let mut line = std::mem::take(&mut self.partial);
            line.extend_from_slice(&buf);
            lines.extend(decode_line(line));
        }

        if !self.follow && !self.partial.is_empty() {
            lines.extend(decode_line(std::mem::take(&mut self.partial)));
        }
        Ok(lines)
    }
}

/// Blank lines yield nothing.
fn decode_line(bytes: Vec<u8>) -> Option<Result<String, EventError>> {
    match String::from_utf8(bytes) {
        Ok(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| Ok(trimmed.to_string()))
        }
        Err(e) => Some(Err(EventError::Malformed(format!(
            "line is not valid UTF-8: {}",
            e.utf8_error()
        )))),
    }
}

#[async_trait]
impl StreamReader for JsonlTailReader {
    async fn poll(&mut self) -> Result<PollOutcome, StreamError> {
        if self.file.is_none() {
            if !self.follow && self.offset > 0 {
                return Ok(PollOutcome::EndOfStream);
            }
            self.open(!self.from_start).await?;
        } else if self.follow && self.detect_rotation().await? {
            log::info!("🔄 File rotation detected, reopening: {}", self.path.display());
            self.open(false).await?;
        }

        let lines = self.read_available().await?;

        if !self.follow && lines.is_empty() {
            self.file = None;
            // Remember that the file was consumed even if it was empty.
            self.offset = self.offset.max(1);
            return Ok(PollOutcome::EndOfStream);
        }

        let arrived_at = Utc::now();
        let records = lines
            .into_iter()
            .map(|line| line.and_then(|line| Event::from_jsonl(&line, arrived_at)))
            .collect();
        Ok(PollOutcome::Records(records))
    }

    fn describe(&self) -> String {
        format!("jsonl:{}", self.path.display())
    }
}
