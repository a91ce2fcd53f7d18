//! Message lifecycle
//!
//! Message records, the disposition state machine, the shared ledger that
//! numbers and counts messages, and the archive seam used by `store`.

pub mod archive;
pub mod ledger;
pub mod message;

pub use archive::{ArchiveRecord, MemoryArchive, MessageArchive};
pub use ledger::{LedgerStats, MessageLedger};
pub use message::{Disposition, DispositionAction, Message, Outcome};
