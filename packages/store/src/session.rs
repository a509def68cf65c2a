//! # Session accessor
//!
//! [`SessionStore`] owns the two persisted session keys and is the only code
//! that touches them:
//!
//! | Key | Value |
//! |-----|-------|
//! | [`TOKEN_KEY`] (`"token"`) | opaque bearer token |
//! | [`USER_KEY`] (`"user"`) | JSON [`StoredUser`] |
//!
//! Every mutation publishes a [`SessionEvent`] on the attached [`SessionBus`],
//! so any component holding a subscription learns about logins, profile
//! refreshes and logouts without polling storage.

use crate::bus::{SessionBus, SessionEvent};
use crate::kv::{KeyValueStore, StoreError};
use crate::models::StoredUser;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Clone, Debug)]
pub struct SessionStore<S> {
    kv: S,
    bus: SessionBus,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(kv: S) -> Self {
        Self::with_bus(kv, SessionBus::default())
    }

    pub fn with_bus(kv: S, bus: SessionBus) -> Self {
        Self { kv, bus }
    }

    pub fn bus(&self) -> &SessionBus {
        &self.bus
    }

    /// The stored bearer token, if present and non-empty.
    pub fn token(&self) -> Option<String> {
        self.kv
            .get(TOKEN_KEY)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    /// Load the stored user object.
    ///
    /// `Ok(None)` when nothing is stored, `Err(StoreError::Corrupt)` when the
    /// stored value does not parse. Callers decide whether to discard it.
    pub fn load_user(&self) -> Result<Option<StoredUser>, StoreError> {
        match self.kv.get(USER_KEY) {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        }
    }

    /// Persist a fresh login. Publishes [`SessionEvent::LoggedIn`].
    pub fn login(&self, token: &str, user: Option<&StoredUser>) -> Result<(), StoreError> {
        self.kv.set(TOKEN_KEY, token)?;
        match user {
            Some(user) => self.write_user(user)?,
            None => self.kv.remove(USER_KEY),
        }
        tracing::debug!("session stored");
        self.bus.publish(SessionEvent::LoggedIn {
            token: token.to_string(),
            user: user.cloned(),
        });
        Ok(())
    }

    /// Replace the stored user object. Publishes [`SessionEvent::UserUpdated`].
    pub fn update_user(&self, user: &StoredUser) -> Result<(), StoreError> {
        self.write_user(user)?;
        self.bus.publish(SessionEvent::UserUpdated(user.clone()));
        Ok(())
    }

    /// Drop an unreadable user object without touching the token.
    pub fn discard_user(&self) {
        self.kv.remove(USER_KEY);
    }

    /// Remove token and user. Publishes [`SessionEvent::LoggedOut`].
    pub fn clear(&self) {
        self.kv.remove(TOKEN_KEY);
        self.kv.remove(USER_KEY);
        tracing::debug!("session cleared");
        self.bus.publish(SessionEvent::LoggedOut);
    }

    fn write_user(&self, user: &StoredUser) -> Result<(), StoreError> {
        let json = serde_json::to_string(user)?;
        self.kv.set(USER_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::models::{AccountStatus, Role};

    fn jane() -> StoredUser {
        StoredUser {
            full_name: Some("Jane Doe".to_string()),
            email: Some("jane@x.com".to_string()),
            role: Some(Role::Student),
            account_status: Some(AccountStatus::Active),
        }
    }

    #[test]
    fn test_login_persists_token_and_user() {
        let kv = MemoryStore::new();
        let session = SessionStore::new(kv.clone());
        let mut events = session.bus().subscribe();

        session.login("a.b.c", Some(&jane())).unwrap();

        assert_eq!(session.token().as_deref(), Some("a.b.c"));
        assert_eq!(session.load_user().unwrap(), Some(jane()));
        assert!(kv.get(USER_KEY).unwrap().contains("\"fullName\":\"Jane Doe\""));
        assert_eq!(
            events.try_recv(),
            Some(SessionEvent::LoggedIn {
                token: "a.b.c".into(),
                user: Some(jane()),
            })
        );
    }

    #[test]
    fn test_login_without_user_drops_stale_user() {
        let kv = MemoryStore::new();
        kv.set(USER_KEY, r#"{"fullName":"Old"}"#).unwrap();
        let session = SessionStore::new(kv);

        session.login("tok", None).unwrap();
        assert_eq!(session.load_user().unwrap(), None);
    }

    #[test]
    fn test_clear_removes_both_keys_and_notifies() {
        let kv = MemoryStore::new();
        let session = SessionStore::new(kv.clone());
        session.login("tok", Some(&jane())).unwrap();
        let mut events = session.bus().subscribe();

        session.clear();

        assert!(kv.get(TOKEN_KEY).is_none());
        assert!(kv.get(USER_KEY).is_none());
        assert!(!session.is_logged_in());
        assert_eq!(events.try_recv(), Some(SessionEvent::LoggedOut));
    }

    #[test]
    fn test_corrupt_user_is_reported_then_discarded() {
        let kv = MemoryStore::new();
        kv.set(TOKEN_KEY, "tok").unwrap();
        kv.set(USER_KEY, "{not json").unwrap();
        let session = SessionStore::new(kv.clone());

        assert!(matches!(session.load_user(), Err(StoreError::Corrupt(_))));
        session.discard_user();
        assert_eq!(session.load_user().unwrap(), None);
        assert_eq!(session.token().as_deref(), Some("tok"));
    }

    #[test]
    fn test_blank_token_counts_as_logged_out() {
        let kv = MemoryStore::new();
        kv.set(TOKEN_KEY, "   ").unwrap();
        let session = SessionStore::new(kv);
        assert!(session.token().is_none());
    }

    #[test]
    fn test_update_user_publishes() {
        let session = SessionStore::new(MemoryStore::new());
        let mut events = session.bus().subscribe();

        session.update_user(&jane()).unwrap();
        assert_eq!(events.try_recv(), Some(SessionEvent::UserUpdated(jane())));
    }
}
