//! Message ledger
//!
//! Owns the state shared by every session using it: sequence numbering, the
//! total-sent counter, the sent and stored collections, and the archive.
//! Everything sits behind one mutex so there is a single writer at a time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hashbrown::HashMap;
use tracing::{debug, warn};

use super::archive::{ArchiveRecord, MemoryArchive, MessageArchive};
use super::message::{Disposition, DispositionAction, Message, Outcome};
use crate::config::{MessageConfig, RecipientMode};
use crate::errors::LifecycleError;
use crate::identity::UserRegistry;
use crate::validation::validate_phone;
use crate::{QuickchatError, Result};

/// First sequence id handed out by a fresh or cleared ledger
const FIRST_SEQUENCE_ID: u64 = 1;

/// State reported for a message this ledger did not issue
const UNTRACKED: &str = "untracked by this ledger";

/// Source of ledger generations. Zero is never handed out, so a
/// deserialized message never matches a live ledger.
static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

fn next_epoch() -> u64 {
    NEXT_EPOCH.fetch_add(1, Ordering::Relaxed)
}

// ----------------------------------------------------------------------------
// Statistics
// ----------------------------------------------------------------------------

/// Counters derived from dispositions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerStats {
    pub created: u64,
    pub sent: u64,
    pub stored: u64,
    pub discarded: u64,
}

impl LedgerStats {
    /// Messages still awaiting a disposition
    pub fn pending(&self) -> u64 {
        self.created
            .saturating_sub(self.sent + self.stored + self.discarded)
    }
}

// ----------------------------------------------------------------------------
// Ledger
// ----------------------------------------------------------------------------

struct LedgerState {
    /// Generation stamped on every message issued since the last clear
    epoch: u64,
    next_sequence: u64,
    /// Authoritative disposition of every issued sequence id
    dispositions: HashMap<u64, Disposition>,
    stats: LedgerStats,
    sent: Vec<Message>,
    stored: Vec<Message>,
    archive: Box<dyn MessageArchive>,
}

impl LedgerState {
    /// The caller's copy may be stale; only the recorded disposition counts
    fn ensure_created(&self, message: &Message, action: DispositionAction) -> Result<()> {
        let recorded = if message.epoch() == self.epoch {
            self.dispositions.get(&message.sequence_id()).copied()
        } else {
            None
        };

        match recorded {
            Some(Disposition::Created) => Ok(()),
            Some(disposition) => Err(QuickchatError::invalid_transition(
                disposition.as_str(),
                action.as_str(),
            )),
            None => Err(QuickchatError::invalid_transition(UNTRACKED, action.as_str())),
        }
    }

    fn commit(&mut self, message: &mut Message, disposition: Disposition) {
        message.set_disposition(disposition);
        self.dispositions.insert(message.sequence_id(), disposition);
    }
}

/// Shared owner of message numbering, counters and collections
pub struct MessageLedger {
    config: MessageConfig,
    /// Registry used to resolve username recipients
    directory: Option<Arc<UserRegistry>>,
    state: Mutex<LedgerState>,
}

impl MessageLedger {
    /// Create a ledger with an in-memory archive
    pub fn new(config: MessageConfig) -> Self {
        Self::with_archive(config, Box::new(MemoryArchive::new()))
    }

    /// Create a ledger writing stored messages to `archive`
    pub fn with_archive(config: MessageConfig, archive: Box<dyn MessageArchive>) -> Self {
        Self {
            config,
            directory: None,
            state: Mutex::new(LedgerState {
                epoch: next_epoch(),
                next_sequence: FIRST_SEQUENCE_ID,
                dispositions: HashMap::new(),
                stats: LedgerStats::default(),
                sent: Vec::new(),
                stored: Vec::new(),
                archive,
            }),
        }
    }

    /// Resolve username recipients against `registry`
    pub fn with_directory(mut self, registry: Arc<UserRegistry>) -> Self {
        self.directory = Some(registry);
        self
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &MessageConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------------

    /// Create a message with the next sequence id
    pub fn create_message(&self, recipient: impl Into<String>, body: impl Into<String>) -> Message {
        self.create(None, recipient.into(), body.into())
    }

    /// Create a message attributed to `sender`
    pub fn create_message_from(
        &self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        body: impl Into<String>,
    ) -> Message {
        self.create(Some(sender.into()), recipient.into(), body.into())
    }

    fn create(&self, sender: Option<String>, recipient: String, body: String) -> Message {
        let mut state = self.lock();
        let sequence_id = state.next_sequence;
        state.next_sequence += 1;
        state.stats.created += 1;
        state.dispositions.insert(sequence_id, Disposition::Created);
        Message::new(sequence_id, state.epoch, sender, recipient, body)
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Whether `recipient` is acceptable under the configured recipient mode
    pub fn check_recipient(&self, recipient: &str) -> bool {
        match self.config.recipient_mode {
            RecipientMode::PhoneNumber => validate_phone(recipient),
            RecipientMode::Username => match &self.directory {
                Some(registry) => registry.contains(recipient),
                None => {
                    warn!("Username recipients configured without a registry");
                    false
                }
            },
        }
    }

    /// Whether the body fits the configured maximum length
    pub fn check_length(&self, message: &Message) -> bool {
        message.check_length(self.config.max_body_chars)
    }

    /// Recorded disposition of a message issued by this ledger
    pub fn disposition_of(&self, message: &Message) -> Option<Disposition> {
        let state = self.lock();
        if message.epoch() != state.epoch {
            return None;
        }
        state.dispositions.get(&message.sequence_id()).copied()
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Apply a raw action token to a message.
    ///
    /// Unknown tokens change nothing and yield `Outcome::InvalidChoice`.
    pub fn apply(&self, message: &mut Message, token: &str) -> Result<Outcome> {
        match DispositionAction::parse(token) {
            Some(action) => self.apply_action(message, action),
            None => {
                debug!("Unrecognized action for message {}", message.sequence_id());
                Ok(Outcome::InvalidChoice)
            }
        }
    }

    /// Move a `Created` message to the state chosen by `action`.
    ///
    /// The ledger's record decides whether the message is still open, so a
    /// stale copy cannot be dispositioned twice. Failures leave the message
    /// and the ledger unchanged.
    pub fn apply_action(&self, message: &mut Message, action: DispositionAction) -> Result<Outcome> {
        message.ensure_open(action.as_str())?;

        let mut state = self.lock();
        state.ensure_created(message, action)?;

        match action {
            DispositionAction::Send => self.send(&mut state, message),
            DispositionAction::Store => Self::store(&mut state, message),
            DispositionAction::Discard => {
                state.commit(message, Disposition::Discarded);
                state.stats.discarded += 1;
                debug!("Message {} discarded", message.sequence_id());
                Ok(Outcome::Discarded)
            }
        }
    }

    fn send(&self, state: &mut LedgerState, message: &mut Message) -> Result<Outcome> {
        let length_ok = self.check_length(message);
        let recipient_ok = self.check_recipient(message.recipient());

        if !(length_ok && recipient_ok) {
            warn!(
                "Send rejected for message {} (length_ok={}, recipient_ok={})",
                message.sequence_id(),
                length_ok,
                recipient_ok
            );
            return Err(LifecycleError::SendRejected {
                length_ok,
                recipient_ok,
            }
            .into());
        }

        state.commit(message, Disposition::Sent);
        state.stats.sent += 1;
        state.sent.push(message.clone());

        debug!(
            "Message {} sent, total sent {}",
            message.sequence_id(),
            state.stats.sent
        );
        Ok(Outcome::Sent)
    }

    fn store(state: &mut LedgerState, message: &mut Message) -> Result<Outcome> {
        let record = ArchiveRecord::from(&*message);

        if let Err(err) = state.archive.append(&record) {
            warn!("Archive write failed for message {}: {}", message.sequence_id(), err);
            return Err(err.into());
        }

        state.commit(message, Disposition::Stored);
        state.stats.stored += 1;
        state.stored.push(message.clone());

        debug!("Message {} stored", message.sequence_id());
        Ok(Outcome::Stored)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Messages successfully sent through this ledger
    pub fn total_sent(&self) -> u64 {
        self.lock().stats.sent
    }

    /// Messages created through this ledger
    pub fn total_created(&self) -> u64 {
        self.lock().stats.created
    }

    /// Snapshot of the sent collection, in send order
    pub fn sent_messages(&self) -> Vec<Message> {
        self.lock().sent.clone()
    }

    /// Snapshot of the stored collection, in store order
    pub fn stored_messages(&self) -> Vec<Message> {
        self.lock().stored.clone()
    }

    /// Disposition counters
    pub fn statistics(&self) -> LedgerStats {
        self.lock().stats
    }

    /// Whether the archive currently accepts writes
    pub fn archive_available(&self) -> bool {
        self.lock().archive.is_available()
    }

    /// Reset numbering, counters and collections. The archive is left as is.
    ///
    /// Messages issued before the reset are no longer tracked and cannot be
    /// dispositioned.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.epoch = next_epoch();
        state.next_sequence = FIRST_SEQUENCE_ID;
        state.dispositions.clear();
        state.stats = LedgerStats::default();
        state.sent.clear();
        state.stored.clear();
    }
}

impl Default for MessageLedger {
    fn default() -> Self {
        Self::new(MessageConfig::default())
    }
}

impl core::fmt::Debug for MessageLedger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MessageLedger")
            .field("config", &self.config)
            .field("stats", &self.statistics())
            .finish_non_exhaustive()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
