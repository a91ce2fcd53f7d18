//! Storage abstraction for stored messages
//!
//! The ledger hands every message entering `Stored` to a `MessageArchive`
//! before committing the transition. Implementations append durably; the
//! engine never reads the archive back.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::message::Message;
use crate::errors::ArchiveError;

// ----------------------------------------------------------------------------
// Archive Record
// ----------------------------------------------------------------------------

/// The persisted form of a stored message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub sequence_id: u64,
    pub recipient: String,
    pub body: String,
    pub fingerprint: String,
}

impl From<&Message> for ArchiveRecord {
    fn from(message: &Message) -> Self {
        Self {
            sequence_id: message.sequence_id(),
            recipient: message.recipient().to_string(),
            body: message.body().to_string(),
            fingerprint: message.fingerprint().to_string(),
        }
    }
}

// ----------------------------------------------------------------------------
// Archive Trait
// ----------------------------------------------------------------------------

/// Append-only durable store for stored messages
pub trait MessageArchive: Send {
    /// Append one record. `Ok` means the write is durable.
    fn append(&mut self, record: &ArchiveRecord) -> Result<(), ArchiveError>;

    /// Check if the archive is accessible
    fn is_available(&self) -> bool {
        true
    }
}

// ----------------------------------------------------------------------------
// Memory Archive Implementation
// ----------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryArchiveState {
    records: Vec<ArchiveRecord>,
    unavailable: bool,
}

/// In-memory archive for tests and sessions without a data directory.
///
/// Clones share the same records, so a test can keep a handle after giving
/// the archive to a ledger.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    state: Arc<Mutex<MemoryArchiveState>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent appends fail with `ArchiveError::Unavailable`
    pub fn set_available(&self, available: bool) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unavailable = !available;
    }

    /// Snapshot of everything appended so far
    pub fn records(&self) -> Vec<ArchiveRecord> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .clone()
    }
}

impl MessageArchive for MemoryArchive {
    fn append(&mut self, record: &ArchiveRecord) -> Result<(), ArchiveError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.unavailable {
            return Err(ArchiveError::Unavailable);
        }
        state.records.push(record.clone());
        Ok(())
    }

    fn is_available(&self) -> bool {
        !self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sequence_id: u64) -> ArchiveRecord {
        ArchiveRecord {
            sequence_id,
            recipient: "+27726030002".to_string(),
            body: "Hello".to_string(),
            fingerprint: format!("0{}-token-{}-hello-hello", sequence_id, sequence_id),
        }
    }

    #[test]
    fn test_memory_archive_shares_records() {
        let handle = MemoryArchive::new();
        let mut archive = handle.clone();

        archive.append(&record(1)).unwrap();
        archive.append(&record(2)).unwrap();

        let records = handle.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].sequence_id, 2);
    }

    #[test]
    fn test_unavailable_archive_rejects() {
        let mut archive = MemoryArchive::new();
        archive.set_available(false);
        assert!(!archive.is_available());
        assert_eq!(archive.append(&record(1)), Err(ArchiveError::Unavailable));
        assert!(archive.records().is_empty());
    }
}
