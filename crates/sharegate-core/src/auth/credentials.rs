use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::session::{Credential, UserRecord};
use super::storage::{KeyValueStorage, StorageError};

/// Storage key holding the raw bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the JSON-serialized user record
pub const USER_KEY: &str = "user";

/// The paired `token` / `user` slots over a persistent storage.
///
/// Created once per page session and handed to every component that needs
/// credentials. Clone is cheap and clones share the same storage.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Read the stored credential.
    ///
    /// Never fails: a missing entry, an empty token, an unreadable backend
    /// or a user entry that is not a JSON object all read as `Absent`.
    pub fn read(&self) -> Credential {
        let token = match self.slot(TOKEN_KEY) {
            Some(token) if !token.is_empty() => token,
            _ => return Credential::Absent,
        };
        let Some(raw_user) = self.slot(USER_KEY) else {
            debug!("Token present without user record");
            return Credential::Absent;
        };

        match Self::parse_user(&raw_user) {
            Some(user) => Credential::Authenticated { token, user },
            None => {
                warn!("Stored user record is malformed, treating session as signed out");
                Credential::Absent
            }
        }
    }

    /// The stored token, if the credential pair is complete.
    pub fn token(&self) -> Option<String> {
        match self.read() {
            Credential::Authenticated { token, .. } => Some(token),
            Credential::Absent => None,
        }
    }

    /// Persist a freshly issued credential pair.
    ///
    /// The user record is written before the token so that a reader never
    /// sees a new token paired with a missing user.
    pub fn store(&self, token: &str, user: &UserRecord) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(user)?;
        self.storage.set(USER_KEY, &user_json)?;
        self.storage.set(TOKEN_KEY, token)?;
        debug!(role = ?user.role, "Stored credentials");
        Ok(())
    }

    /// Remove both entries. Idempotent.
    pub fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "Failed to remove credential entry");
            }
        }
        debug!("Cleared credentials");
    }

    fn slot(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read credential entry");
                None
            }
        }
    }

    fn parse_user(raw: &str) -> Option<UserRecord> {
        let value: Value = serde_json::from_str(raw).ok()?;
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}
