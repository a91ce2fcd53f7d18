//! Credential validation rules
//!
//! Pure predicates deciding whether a name, username, password or phone number
//! is acceptable. Empty input is an ordinary `false`; callers holding an
//! absent value pass `""`.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Maximum username length in characters
pub const MAX_USERNAME_CHARS: usize = 5;

/// Minimum password length in characters
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Digits allowed for the country code after the leading `+`
const COUNTRY_CODE_DIGITS: (usize, usize) = (1, 3);

/// Digits allowed for the subscriber number after the country code
const SUBSCRIBER_DIGITS: (usize, usize) = (7, 10);

// ----------------------------------------------------------------------------
// Predicates
// ----------------------------------------------------------------------------

/// A name is non-empty and contains no space character
pub fn validate_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(' ')
}

/// A username contains an underscore and is at most five characters long
pub fn validate_username(username: &str) -> bool {
    if username.is_empty() {
        return false;
    }
    username.contains('_') && username.chars().count() <= MAX_USERNAME_CHARS
}

/// A password has at least eight characters including a capital letter, a
/// digit and a character that is neither a letter nor a digit
pub fn validate_password(password: &str) -> bool {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return false;
    }

    let has_capital = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());

    has_capital && has_digit && has_special
}

/// A phone number is `+`, a 1-3 digit country code and a 7-10 digit number.
///
/// The two digit groups are adjacent, so the rule reduces to a leading `+`
/// followed by 8 to 13 ASCII digits.
pub fn validate_phone(phone: &str) -> bool {
    let Some(digits) = phone.strip_prefix('+') else {
        return false;
    };

    let min = COUNTRY_CODE_DIGITS.0 + SUBSCRIBER_DIGITS.0;
    let max = COUNTRY_CODE_DIGITS.1 + SUBSCRIBER_DIGITS.1;

    (min..=max).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

// ----------------------------------------------------------------------------
// Credential Fields
// ----------------------------------------------------------------------------

/// Fields captured at registration, in validation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialField {
    FirstName,
    LastName,
    Username,
    Password,
    Phone,
}

impl CredentialField {
    /// Registration order
    pub const ALL: [CredentialField; 5] = [
        CredentialField::FirstName,
        CredentialField::LastName,
        CredentialField::Username,
        CredentialField::Password,
        CredentialField::Phone,
    ];

    /// Run this field's rule against a value
    pub fn validate(self, value: &str) -> bool {
        match self {
            CredentialField::FirstName | CredentialField::LastName => validate_name(value),
            CredentialField::Username => validate_username(value),
            CredentialField::Password => validate_password(value),
            CredentialField::Phone => validate_phone(value),
        }
    }

    /// User-facing text shown when the field is rejected
    pub fn failure_message(self) -> &'static str {
        match self {
            CredentialField::FirstName => {
                "First name is not correctly formatted, please ensure it is not empty and contains no spaces."
            }
            CredentialField::LastName => {
                "Last name is not correctly formatted, please ensure it is not empty and contains no spaces."
            }
            CredentialField::Username => {
                "Username is not correctly formatted, please ensure that your username contains an underscore and is no more than five characters in length."
            }
            CredentialField::Password => {
                "Password is not correctly formatted, please ensure that the password contains at least eight characters, a capital letter, a number, and a special character."
            }
            CredentialField::Phone => {
                "Cell phone number incorrectly formatted or does not contain international code."
            }
        }
    }

    /// User-facing text shown when the field is accepted
    pub fn success_message(self) -> &'static str {
        match self {
            CredentialField::FirstName => "First name successfully captured.",
            CredentialField::LastName => "Last name successfully captured.",
            CredentialField::Username => "Username successfully captured.",
            CredentialField::Password => "Password successfully captured.",
            CredentialField::Phone => "Cell phone number successfully added.",
        }
    }

    /// Validate and render the matching user-facing text
    pub fn check(self, value: &str) -> &'static str {
        if self.validate(value) {
            self.success_message()
        } else {
            self.failure_message()
        }
    }

    /// Short label used in prompts and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            CredentialField::FirstName => "first-name",
            CredentialField::LastName => "last-name",
            CredentialField::Username => "username",
            CredentialField::Password => "password",
            CredentialField::Phone => "phone",
        }
    }
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialField {
    type Err = crate::QuickchatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        CredentialField::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| crate::QuickchatError::config_error(format!("Unknown credential field: {}", s)))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
