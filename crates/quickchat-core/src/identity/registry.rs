//! In-memory registry of registered identities
//!
//! Identities are keyed by username. The map sits behind a reader/writer lock
//! so one registry can back several sessions through `Arc`.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hashbrown::HashMap;
use tracing::{debug, warn};

use super::types::{Identity, Registration};
use crate::validation::CredentialField;
use crate::{QuickchatError, Result};

#[derive(Debug, Default)]
struct RegistryState {
    /// Identities indexed by username
    users: HashMap<String, Identity>,
    /// Usernames in registration order
    order: Vec<String>,
}

/// Registered identities, keyed by username
#[derive(Debug, Default)]
pub struct UserRegistry {
    state: RwLock<RegistryState>,
}

impl UserRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate every field in order and store the identity.
    ///
    /// The first failing field is reported with its user-facing text. A taken
    /// username is rejected without touching the registry.
    pub fn register(&self, registration: Registration) -> Result<Identity> {
        let values = [
            (CredentialField::FirstName, registration.first_name.as_str()),
            (CredentialField::LastName, registration.last_name.as_str()),
            (CredentialField::Username, registration.username.as_str()),
            (CredentialField::Password, registration.password.as_str()),
            (CredentialField::Phone, registration.phone_number.as_str()),
        ];

        if let Some((field, _)) = values.iter().find(|(field, value)| !field.validate(value)) {
            debug!("Registration rejected on field {}", field);
            return Err(QuickchatError::validation(*field));
        }

        let mut state = self.write();
        if state.users.contains_key(&registration.username) {
            warn!("Duplicate registration for username {}", registration.username);
            return Err(QuickchatError::duplicate_username(registration.username));
        }

        let identity = Identity::from_registration(registration);
        let username = identity.username().to_string();
        state.users.insert(username.clone(), identity.clone());
        state.order.push(username);

        debug!("Registered user {}", identity.username());
        Ok(identity)
    }

    /// Exact, case-sensitive credential check; empty input never matches
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        if username.is_empty() || password.is_empty() {
            return false;
        }
        self.read()
            .users
            .get(username)
            .is_some_and(|identity| identity.matches(username, password))
    }

    /// Look up an identity by username
    pub fn find_by_username(&self, username: &str) -> Result<Identity> {
        self.read()
            .users
            .get(username)
            .cloned()
            .ok_or_else(|| QuickchatError::not_found(username))
    }

    /// Look up an identity by phone number
    pub fn find_by_phone(&self, phone_number: &str) -> Option<Identity> {
        let state = self.read();
        state
            .order
            .iter()
            .filter_map(|username| state.users.get(username))
            .find(|identity| identity.phone_number() == phone_number)
            .cloned()
    }

    /// Check whether a username is registered
    pub fn contains(&self, username: &str) -> bool {
        self.read().users.contains_key(username)
    }

    /// Usernames in registration order
    pub fn usernames(&self) -> Vec<String> {
        self.read().order.clone()
    }

    /// Every identity other than `username`, in registration order
    pub fn recipients_excluding(&self, username: &str) -> Vec<Identity> {
        let state = self.read();
        state
            .order
            .iter()
            .filter(|name| name.as_str() != username)
            .filter_map(|name| state.users.get(name))
            .cloned()
            .collect()
    }

    /// Number of registered identities
    pub fn len(&self) -> usize {
        self.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
