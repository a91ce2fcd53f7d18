//! Core identity types

use core::fmt;

// ----------------------------------------------------------------------------
// Registration Request
// ----------------------------------------------------------------------------

/// Raw field values supplied for a registration attempt
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    pub phone_number: String,
}

impl Registration {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            username: username.into(),
            password: password.into(),
            phone_number: phone_number.into(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Identity
// ----------------------------------------------------------------------------

/// A registered user's credential record.
///
/// Only `UserRegistry` constructs these, after every field has passed
/// validation.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    first_name: String,
    last_name: String,
    username: String,
    password: String,
    phone_number: String,
}

impl Identity {
    pub(crate) fn from_registration(registration: Registration) -> Self {
        Self {
            first_name: registration.first_name,
            last_name: registration.last_name,
            username: registration.username,
            password: registration.password,
            phone_number: registration.phone_number,
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Exact, case-sensitive credential comparison
    pub(crate) fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("username", &self.username)
            .field("phone_number", &self.phone_number)
            .finish_non_exhaustive()
    }
}
