//! Error types for the QuickChat engine
//!
//! This module contains all error types used throughout the engine: credential
//! validation failures, registry conflicts, message lifecycle violations, session
//! errors, archive failures, and the `QuickchatError` type that unifies them.

use crate::validation::CredentialField;

// ----------------------------------------------------------------------------
// Specific Error Types
// ----------------------------------------------------------------------------

/// A credential field failed its format rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: CredentialField,
    pub message: String,
}

/// Specific registry error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Username '{username}' is already registered.")]
    DuplicateUsername { username: String },
    #[error("User '{username}' not found.")]
    NotFound { username: String },
}

/// Specific message lifecycle error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Cannot {action} a message that is {from}")]
    InvalidTransition { from: String, action: String },
    #[error("Message validation failed. Cannot send.")]
    SendRejected { length_ok: bool, recipient_ok: bool },
}

/// Specific session error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("You must be logged in to send messages.")]
    NotAuthenticated,
    #[error("You have reached your message limit of {quota} messages (message limit reached).")]
    QuotaExceeded { quota: u32 },
    #[error("Message limit must be a positive number, got {value}")]
    InvalidQuota { value: String },
}

/// Specific archive error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArchiveError {
    #[error("Message archive is not available")]
    Unavailable,
    #[error("Message archive write failed: {reason}")]
    WriteFailed { reason: String },
}

// ----------------------------------------------------------------------------
// Unified Error Type
// ----------------------------------------------------------------------------

/// Core error types for the QuickChat engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuickchatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Store failed: {0}")]
    Archive(#[from] ArchiveError),

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },
}

// ----------------------------------------------------------------------------
// Convenience Error Constructors
// ----------------------------------------------------------------------------

impl QuickchatError {
    /// Create a validation error carrying the field's user-facing text
    pub fn validation(field: CredentialField) -> Self {
        QuickchatError::Validation(ValidationError {
            field,
            message: field.failure_message().to_string(),
        })
    }

    /// Create a duplicate username error
    pub fn duplicate_username<T: Into<String>>(username: T) -> Self {
        QuickchatError::Registry(RegistryError::DuplicateUsername {
            username: username.into(),
        })
    }

    /// Create a not-found error for a username lookup
    pub fn not_found<T: Into<String>>(username: T) -> Self {
        QuickchatError::Registry(RegistryError::NotFound {
            username: username.into(),
        })
    }

    /// Create an invalid transition error
    pub fn invalid_transition<F: Into<String>, A: Into<String>>(from: F, action: A) -> Self {
        QuickchatError::Lifecycle(LifecycleError::InvalidTransition {
            from: from.into(),
            action: action.into(),
        })
    }

    /// Create a configuration error with a reason
    pub fn config_error<T: Into<String>>(reason: T) -> Self {
        QuickchatError::Configuration {
            reason: reason.into(),
        }
    }

    /// True for a rejected state transition on a terminal message
    pub fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            QuickchatError::Lifecycle(LifecycleError::InvalidTransition { .. })
        )
    }
}

// ----------------------------------------------------------------------------
// Type Aliases
// ----------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, QuickchatError>;

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_map_to_concerns() {
        let err = QuickchatError::invalid_transition("sent", "store");
        assert!(err.is_invalid_transition());
        assert_eq!(err.to_string(), "Cannot store a message that is sent");

        let err = QuickchatError::duplicate_username("kyl_1");
        assert!(matches!(err, QuickchatError::Registry(RegistryError::DuplicateUsername { .. })));
        assert!(!err.is_invalid_transition());

        let err: QuickchatError = ArchiveError::WriteFailed {
            reason: "disk full".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Store failed: Message archive write failed: disk full");
    }
}
