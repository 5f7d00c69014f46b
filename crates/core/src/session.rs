//! Session store: the cached bearer token and display username.
//!
//! The store is the only writer of session fields. Reads never fail: a
//! missing key or a broken persistence collaborator yields an empty field
//! and a log line.

use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::storage::{KeyValueStore, TOKEN_KEY, USERNAME_KEY};

/// Snapshot of the cached session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub username: Option<String>,
    pub token: Option<String>,
}

impl SessionState {
    /// Authenticated means a token is present; the username alone does not count.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.token.is_none()
    }
}

/// A single session field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionField {
    Token,
    Username,
}

impl SessionField {
    pub const ALL: [SessionField; 2] = [SessionField::Token, SessionField::Username];

    /// Persistence key for this field.
    pub fn key(self) -> &'static str {
        match self {
            SessionField::Token => TOKEN_KEY,
            SessionField::Username => USERNAME_KEY,
        }
    }
}

/// What `SessionStore::clear` removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    Field(SessionField),
    All,
}

impl From<SessionField> for ClearScope {
    fn from(field: SessionField) -> Self {
        ClearScope::Field(field)
    }
}

#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read both session fields.
    pub fn load(&self) -> SessionState {
        SessionState {
            username: self.read_field(SessionField::Username),
            token: self.read_field(SessionField::Token),
        }
    }

    /// Current token, if any.
    pub fn token(&self) -> Option<String> {
        self.read_field(SessionField::Token)
    }

    /// Current display username, if any.
    pub fn username(&self) -> Option<String> {
        self.read_field(SessionField::Username)
    }

    /// Overwrite one field.
    pub fn save(&self, field: SessionField, value: &str) -> Result<()> {
        debug!("[Session] Saving {}", field.key());
        self.store.set_item(field.key(), value)
    }

    /// Delete one or all fields. Clearing absent fields is a no-op.
    pub fn clear(&self, scope: impl Into<ClearScope>) -> Result<()> {
        match scope.into() {
            ClearScope::Field(field) => {
                debug!("[Session] Clearing {}", field.key());
                self.store.remove_item(field.key())
            }
            ClearScope::All => {
                debug!("[Session] Clearing all session fields");
                for field in SessionField::ALL {
                    self.store.remove_item(field.key())?;
                }
                Ok(())
            }
        }
    }

    fn read_field(&self, field: SessionField) -> Option<String> {
        match self.store.get_item(field.key()) {
            Ok(Some(value)) if !value.is_empty() => Some(value),
            Ok(_) => None,
            Err(e) => {
                warn!("[Session] Failed to read {}: {}", field.key(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::storage::MemoryStore;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::storage("disk unavailable"))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::storage("disk unavailable"))
        }

        fn remove_item(&self, _key: &str) -> Result<()> {
            Err(Error::storage("disk unavailable"))
        }
    }

    fn session() -> SessionStore {
        SessionStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn save_then_load_round_trips_token() {
        let session = session();
        session.save(SessionField::Token, "abc123").unwrap();

        let state = session.load();
        assert_eq!(state.token.as_deref(), Some("abc123"));
        assert!(state.is_authenticated());
    }

    #[test]
    fn username_without_token_is_not_authenticated() {
        let session = session();
        session.save(SessionField::Username, "maria").unwrap();

        let state = session.load();
        assert_eq!(state.username.as_deref(), Some("maria"));
        assert!(!state.is_authenticated());
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let session = session();
        session.save(SessionField::Token, "").unwrap();
        assert_eq!(session.load().token, None);
    }

    #[test]
    fn clear_all_twice_stays_empty() {
        let session = session();
        session.save(SessionField::Token, "abc123").unwrap();
        session.save(SessionField::Username, "maria").unwrap();

        session.clear(ClearScope::All).unwrap();
        assert!(session.load().is_empty());

        session.clear(ClearScope::All).unwrap();
        assert!(session.load().is_empty());

        session.save(SessionField::Token, "next").unwrap();
        assert_eq!(session.token().as_deref(), Some("next"));
    }

    #[test]
    fn clearing_token_keeps_username() {
        let session = session();
        session.save(SessionField::Token, "abc123").unwrap();
        session.save(SessionField::Username, "maria").unwrap();

        session.clear(SessionField::Token).unwrap();

        let state = session.load();
        assert_eq!(state.token, None);
        assert_eq!(state.username.as_deref(), Some("maria"));
    }

    #[test]
    fn broken_store_loads_empty_instead_of_failing() {
        let session = SessionStore::new(Arc::new(BrokenStore));
        assert!(session.load().is_empty());
        assert!(session.save(SessionField::Token, "abc").is_err());
    }
}
