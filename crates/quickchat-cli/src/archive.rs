//! JSON-lines message archive
//!
//! Each stored message is appended as one JSON object per line. The file is
//! flushed and synced before `append` returns, so a `Stored` message is on
//! disk even if the process dies right after.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use quickchat_core::{ArchiveError, ArchiveRecord, MessageArchive};

/// Append-only archive backed by a JSON-lines file
#[derive(Debug, Clone)]
pub struct JsonLinesArchive {
    path: PathBuf,
}

impl JsonLinesArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every archived record in append order. A missing file is an
    /// empty archive.
    pub fn read_all(&self) -> anyhow::Result<Vec<ArchiveRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str::<ArchiveRecord>(line).with_context(|| {
                    format!("Malformed record on line {} of {}", index + 1, self.path.display())
                })
            })
            .collect()
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        file.flush()?;
        file.sync_data()
    }
}

impl MessageArchive for JsonLinesArchive {
    fn append(&mut self, record: &ArchiveRecord) -> Result<(), ArchiveError> {
        let line = serde_json::to_string(record).map_err(|e| ArchiveError::WriteFailed {
            reason: e.to_string(),
        })?;

        self.write_line(&line).map_err(|e| ArchiveError::WriteFailed {
            reason: format!("{}: {}", self.path.display(), e),
        })?;

        debug!("Archived message {} to {}", record.sequence_id, self.path.display());
        Ok(())
    }

    fn is_available(&self) -> bool {
        !self.path.is_dir()
    }
}
