//! Message records and their disposition state machine
//!
//! A message starts `Created` and moves exactly once to one of the terminal
//! states `Sent`, `Stored` or `Discarded`. The fingerprint is recomputed on
//! every edit so it always reflects the current content.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::fingerprint::compute_fingerprint;
use crate::{QuickchatError, Result};

// ----------------------------------------------------------------------------
// Disposition
// ----------------------------------------------------------------------------

/// Lifecycle state of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Composed, not yet acted on
    Created,
    /// Delivered to the recipient
    Sent,
    /// Kept for sending later
    Stored,
    /// Dropped by the user
    Discarded,
}

impl Disposition {
    /// Sent, Stored and Discarded accept no further transition
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Disposition::Created)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Created => "created",
            Disposition::Sent => "sent",
            Disposition::Stored => "stored",
            Disposition::Discarded => "discarded",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ----------------------------------------------------------------------------
// Disposition Actions
// ----------------------------------------------------------------------------

/// User choice applied to a `Created` message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispositionAction {
    Send,
    Store,
    Discard,
}

impl DispositionAction {
    /// Parse a word (`send`, `store`, `discard`) or menu digit (`1`, `2`, `3`).
    ///
    /// Anything else is `None`, which callers report as an invalid choice.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "send" | "1" => Some(DispositionAction::Send),
            "discard" | "2" => Some(DispositionAction::Discard),
            "store" | "3" => Some(DispositionAction::Store),
            _ => None,
        }
    }

    /// State reached when the action succeeds
    pub fn target(&self) -> Disposition {
        match self {
            DispositionAction::Send => Disposition::Sent,
            DispositionAction::Store => Disposition::Stored,
            DispositionAction::Discard => Disposition::Discarded,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DispositionAction::Send => "send",
            DispositionAction::Store => "store",
            DispositionAction::Discard => "discard",
        }
    }
}

impl fmt::Display for DispositionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ----------------------------------------------------------------------------
// Outcome
// ----------------------------------------------------------------------------

/// Successful result of a disposition request, displayed verbatim to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Sent,
    Stored,
    Discarded,
    /// Unrecognized action token; nothing changed
    InvalidChoice,
    /// Presentation layer cancelled before a choice was made
    NoAction,
}

impl Outcome {
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Sent => "Message successfully sent.",
            Outcome::Stored => "Message successfully stored.",
            Outcome::Discarded => "Message discarded.",
            Outcome::InvalidChoice => "Invalid option.",
            Outcome::NoAction => "No action taken.",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// ----------------------------------------------------------------------------
// Message
// ----------------------------------------------------------------------------

/// A message and its disposition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    sequence_id: u64,
    sender: Option<String>,
    recipient: String,
    body: String,
    fingerprint: String,
    disposition: Disposition,
    /// Creation time in Unix milliseconds; display only
    created_at: u64,
    /// Ledger generation that issued the sequence id; zero when deserialized
    #[serde(skip)]
    epoch: u64,
}

impl Message {
    /// Sequence ids come from a `MessageLedger`; see `MessageLedger::create_message`
    pub(crate) fn new(
        sequence_id: u64,
        epoch: u64,
        sender: Option<String>,
        recipient: String,
        body: String,
    ) -> Self {
        let fingerprint = compute_fingerprint(sequence_id, &body);
        Self {
            sequence_id,
            sender,
            recipient,
            body,
            fingerprint,
            disposition: Disposition::Created,
            created_at: current_timestamp(),
            epoch,
        }
    }

    pub fn sequence_id(&self) -> u64 {
        self.sequence_id
    }

    /// Ten-digit zero-padded rendering of the sequence id
    pub fn message_id(&self) -> String {
        format!("{:010}", self.sequence_id)
    }

    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn disposition(&self) -> Disposition {
        self.disposition
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Body length in characters is within `max_chars`
    pub fn check_length(&self, max_chars: usize) -> bool {
        self.body.chars().count() <= max_chars
    }

    /// Replace the body of a `Created` message
    pub fn set_body(&mut self, body: impl Into<String>) -> Result<()> {
        self.ensure_open("edit")?;
        self.body = body.into();
        self.refresh_fingerprint();
        Ok(())
    }

    /// Replace the recipient of a `Created` message
    pub fn set_recipient(&mut self, recipient: impl Into<String>) -> Result<()> {
        self.ensure_open("edit")?;
        self.recipient = recipient.into();
        self.refresh_fingerprint();
        Ok(())
    }

    /// Multi-line report of the message
    pub fn details(&self) -> String {
        format!(
            "MessageID: {}\nMessage Hash: {}\nRecipient: {}\nMessage: {}\nStatus: {}",
            self.message_id(),
            self.fingerprint,
            self.recipient,
            self.body,
            self.disposition
        )
    }

    /// Reject any transition out of a terminal state
    pub(crate) fn ensure_open(&self, action: &str) -> Result<()> {
        if self.disposition.is_terminal() {
            return Err(QuickchatError::invalid_transition(
                self.disposition.as_str(),
                action,
            ));
        }
        Ok(())
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn set_disposition(&mut self, disposition: Disposition) {
        self.disposition = disposition;
    }

    fn refresh_fingerprint(&mut self) {
        self.fingerprint = compute_fingerprint(self.sequence_id, &self.body);
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
