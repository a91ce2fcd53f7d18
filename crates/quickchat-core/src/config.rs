//! Centralized Configuration Management
//!
//! Configuration structures for the message lifecycle and login sessions,
//! grouped under `QuickchatConfig`.

use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Message Configuration
// ----------------------------------------------------------------------------

/// How a message recipient is identified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientMode {
    /// Recipient is an international phone number
    #[default]
    PhoneNumber,
    /// Recipient is the username of a registered identity
    Username,
}

/// Configuration for message validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageConfig {
    /// Maximum body length (in characters, not bytes) accepted by `send`
    pub max_body_chars: usize,
    /// How recipients are checked before sending
    pub recipient_mode: RecipientMode,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            max_body_chars: 250,
            recipient_mode: RecipientMode::PhoneNumber,
        }
    }
}

impl MessageConfig {
    /// Recipients must be registered usernames
    pub fn username_recipients() -> Self {
        Self {
            recipient_mode: RecipientMode::Username,
            ..Self::default()
        }
    }
}

// ----------------------------------------------------------------------------
// Session Configuration
// ----------------------------------------------------------------------------

/// Configuration for login sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Quota applied when none (or an invalid one) is supplied
    pub default_quota: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { default_quota: 5 }
    }
}

// ----------------------------------------------------------------------------
// Unified Configuration
// ----------------------------------------------------------------------------

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuickchatConfig {
    /// Message validation settings
    #[serde(default)]
    pub message: MessageConfig,
    /// Session settings
    #[serde(default)]
    pub session: SessionConfig,
}

impl QuickchatConfig {
    /// Small limits for tests
    pub fn testing() -> Self {
        Self {
            message: MessageConfig {
                max_body_chars: 250,
                recipient_mode: RecipientMode::PhoneNumber,
            },
            session: SessionConfig { default_quota: 3 },
        }
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.message.max_body_chars == 0 {
            return Err("Maximum message length must be greater than 0".to_string());
        }
        if self.session.default_quota == 0 {
            return Err("Default message quota must be greater than 0".to_string());
        }
        Ok(())
    }
}
