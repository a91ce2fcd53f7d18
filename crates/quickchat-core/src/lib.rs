//! QuickChat Core Engine
//!
//! Credential validation, user registration and login, and the message
//! lifecycle (create, send, store, discard) for the QuickChat messaging app.
//! Presentation and durable storage are plugged in through the `Prompter` and
//! `MessageArchive` traits.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod identity;
pub mod protocol;
pub mod session;
pub mod validation;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use config::{MessageConfig, QuickchatConfig, RecipientMode, SessionConfig};
pub use errors::{
    ArchiveError, LifecycleError, QuickchatError, RegistryError, Result,
    SessionError, ValidationError,
};
pub use fingerprint::compute_fingerprint;
pub use identity::{Identity, Registration, UserRegistry};
pub use protocol::{
    ArchiveRecord, Disposition, DispositionAction, LedgerStats, MemoryArchive, Message,
    MessageArchive, MessageLedger, Outcome,
};
pub use session::{DispatchReport, InputRequest, Prompter, SessionController, SessionSummary};
pub use validation::{
    validate_name, validate_password, validate_phone, validate_username, CredentialField,
};
