//! Login sessions
//!
//! A `SessionController` tracks one authenticated identity at a time, enforces
//! the per-session send quota and routes composed messages through the shared
//! ledger. The `Prompter` trait lets any presentation layer drive the
//! registration, login and compose flows one field at a time.

use core::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::errors::SessionError;
use crate::identity::{Identity, Registration, UserRegistry};
use crate::protocol::{DispositionAction, Message, MessageLedger, Outcome};
use crate::{QuickchatError, Result};

/// Text returned by a successful registration
pub const REGISTRATION_SUCCESS: &str = "Registration successful";

/// Text returned by a failed login
pub const LOGIN_FAILURE: &str = "Username or password incorrect, please try again.";

// ----------------------------------------------------------------------------
// Reports
// ----------------------------------------------------------------------------

/// Result of composing and dispatching one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Snapshot of the message after the action ran. `None` when the action
    /// was not recognized and no message was created.
    pub message: Option<Message>,
    pub outcome: Outcome,
}

/// Quota usage for the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub quota: u32,
    pub sent: u32,
    pub remaining: u32,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Messages sent: {} of {} ({} remaining)",
            self.sent, self.quota, self.remaining
        )
    }
}

// ----------------------------------------------------------------------------
// Session Controller
// ----------------------------------------------------------------------------

/// One login session over a shared registry and ledger
#[derive(Debug)]
pub struct SessionController {
    registry: Arc<UserRegistry>,
    ledger: Arc<MessageLedger>,
    config: SessionConfig,
    active: Option<Identity>,
    quota: u32,
    sent_in_session: u32,
}

impl SessionController {
    pub fn new(registry: Arc<UserRegistry>, ledger: Arc<MessageLedger>, config: SessionConfig) -> Self {
        let quota = config.default_quota.max(1);
        Self {
            registry,
            ledger,
            config,
            active: None,
            quota,
            sent_in_session: 0,
        }
    }

    pub fn registry(&self) -> &Arc<UserRegistry> {
        &self.registry
    }

    pub fn ledger(&self) -> &Arc<MessageLedger> {
        &self.ledger
    }

    /// Register a new identity
    pub fn register(&self, registration: Registration) -> Result<String> {
        self.registry.register(registration)?;
        Ok(REGISTRATION_SUCCESS.to_string())
    }

    /// Authenticate and start a fresh session. A failed attempt leaves any
    /// current session untouched.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        if !self.registry.authenticate(username, password) {
            debug!("Login failed for {}", username);
            return false;
        }

        match self.registry.find_by_username(username) {
            Ok(identity) => {
                debug!("User {} logged in", identity.username());
                self.active = Some(identity);
                self.sent_in_session = 0;
                true
            }
            Err(_) => false,
        }
    }

    /// User-facing text for a login attempt
    pub fn login_status(&self, success: bool) -> String {
        match (&self.active, success) {
            (Some(identity), true) => format!(
                "Welcome {}, {} it is great to see you again.",
                identity.first_name(),
                identity.last_name()
            ),
            _ => LOGIN_FAILURE.to_string(),
        }
    }

    /// End the session
    pub fn logout(&mut self) {
        if let Some(identity) = self.active.take() {
            debug!("User {} logged out", identity.username());
        }
        self.sent_in_session = 0;
        self.quota = self.config.default_quota.max(1);
    }

    pub fn is_authenticated(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_identity(&self) -> Option<&Identity> {
        self.active.as_ref()
    }

    pub fn quota(&self) -> u32 {
        self.quota
    }

    /// Set the send quota; zero is rejected
    pub fn set_quota(&mut self, quota: u32) -> Result<()> {
        if quota == 0 {
            return Err(SessionError::InvalidQuota {
                value: quota.to_string(),
            }
            .into());
        }
        self.quota = quota;
        Ok(())
    }

    /// Set the quota from user text, falling back to the configured default
    /// on non-numeric or non-positive input. Returns the quota in effect.
    pub fn parse_quota(&mut self, text: &str) -> u32 {
        let parsed = text
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|n| *n > 0)
            .and_then(|n| u32::try_from(n).ok());

        let quota = match parsed {
            Some(quota) => quota,
            None => {
                debug!("Quota input not a positive number, using default");
                self.config.default_quota.max(1)
            }
        };
        self.quota = quota;
        quota
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    /// Create a message from the active user and apply `action` to it.
    ///
    /// A send over quota fails before any message is created.
    pub fn compose_and_dispatch(
        &mut self,
        recipient: &str,
        body: &str,
        action: &str,
    ) -> Result<DispatchReport> {
        let sender = match &self.active {
            Some(identity) => identity.username().to_string(),
            None => return Err(SessionError::NotAuthenticated.into()),
        };

        let Some(action) = DispositionAction::parse(action) else {
            debug!("Unrecognized action from {}, nothing created", sender);
            return Ok(DispatchReport {
                message: None,
                outcome: Outcome::InvalidChoice,
            });
        };

        if action == DispositionAction::Send && self.sent_in_session >= self.quota {
            warn!("User {} reached the message limit of {}", sender, self.quota);
            return Err(SessionError::QuotaExceeded { quota: self.quota }.into());
        }

        let mut message = self.ledger.create_message_from(sender, recipient, body);
        let outcome = self.ledger.apply_action(&mut message, action)?;

        if outcome == Outcome::Sent {
            self.sent_in_session += 1;
        }

        Ok(DispatchReport {
            message: Some(message),
            outcome,
        })
    }

    pub fn session_summary(&self) -> SessionSummary {
        SessionSummary {
            quota: self.quota,
            sent: self.sent_in_session,
            remaining: self.quota.saturating_sub(self.sent_in_session),
        }
    }

    /// Messages the active user has sent through the shared ledger
    pub fn recent_messages(&self) -> Vec<Message> {
        self.own_messages(self.ledger.sent_messages())
    }

    /// Messages the active user has stored through the shared ledger
    pub fn stored_messages(&self) -> Vec<Message> {
        self.own_messages(self.ledger.stored_messages())
    }

    fn own_messages(&self, messages: Vec<Message>) -> Vec<Message> {
        let Some(identity) = &self.active else {
            return Vec::new();
        };
        messages
            .into_iter()
            .filter(|message| message.sender() == Some(identity.username()))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Prompted Flows
    // ------------------------------------------------------------------------

    /// Collect registration fields from `prompter`.
    ///
    /// `Ok(None)` means the user cancelled and nothing was registered.
    pub fn run_registration(&self, prompter: &mut dyn Prompter) -> Result<Option<String>> {
        let mut values = Vec::with_capacity(5);
        for request in InputRequest::REGISTRATION {
            match prompter.request(request) {
                Some(value) => values.push(value),
                None => return Ok(None),
            }
        }

        let mut values = values.into_iter();
        let mut next = || values.next().unwrap_or_default();
        let registration = Registration::new(next(), next(), next(), next(), next());
        self.register(registration).map(Some)
    }

    /// Ask for credentials and a quota; returns the login status text, or
    /// `None` when cancelled.
    pub fn run_login(&mut self, prompter: &mut dyn Prompter) -> Option<String> {
        let username = prompter.request(InputRequest::Username)?;
        let password = prompter.request(InputRequest::Password)?;

        let success = self.login(&username, &password);
        let status = self.login_status(success);
        if success {
            let text = prompter.request(InputRequest::Quota).unwrap_or_default();
            self.parse_quota(&text);
        }
        Some(status)
    }

    /// Collect recipient, body and action, then dispatch.
    ///
    /// A cancel before the action is chosen creates no message.
    pub fn run_compose(&mut self, prompter: &mut dyn Prompter) -> Result<Outcome> {
        if !self.is_authenticated() {
            return Err(QuickchatError::Session(SessionError::NotAuthenticated));
        }

        let Some(recipient) = prompter.request(InputRequest::Recipient) else {
            return Ok(Outcome::NoAction);
        };
        let Some(body) = prompter.request(InputRequest::Body) else {
            return Ok(Outcome::NoAction);
        };
        let Some(action) = prompter.request(InputRequest::Action) else {
            return Ok(Outcome::NoAction);
        };

        self.compose_and_dispatch(recipient.trim(), &body, &action)
            .map(|report| report.outcome)
    }
}

// ----------------------------------------------------------------------------
// Prompter
// ----------------------------------------------------------------------------

/// A single value the session needs from the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputRequest {
    FirstName,
    LastName,
    Username,
    Password,
    Phone,
    Quota,
    Recipient,
    Body,
    Action,
}

impl InputRequest {
    /// Registration fields in the order they are validated
    pub const REGISTRATION: [InputRequest; 5] = [
        InputRequest::FirstName,
        InputRequest::LastName,
        InputRequest::Username,
        InputRequest::Password,
        InputRequest::Phone,
    ];

    /// Prompt text shown for the request
    pub fn prompt(&self) -> &'static str {
        match self {
            InputRequest::FirstName => "Enter your first name",
            InputRequest::LastName => "Enter your last name",
            InputRequest::Username => "Enter a username",
            InputRequest::Password => "Enter a password",
            InputRequest::Phone => "Enter your cell phone number (e.g. +27831234567)",
            InputRequest::Quota => "How many messages do you wish to send?",
            InputRequest::Recipient => "Enter the recipient",
            InputRequest::Body => "Enter your message",
            InputRequest::Action => "Choose an action: 1) Send 2) Discard 3) Store",
        }
    }
}

impl fmt::Display for InputRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prompt())
    }
}

/// Source of user input for the prompted flows
pub trait Prompter {
    /// Answer one request. `None` means the user cancelled.
    fn request(&mut self, request: InputRequest) -> Option<String>;
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
