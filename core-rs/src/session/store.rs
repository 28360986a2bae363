//! Session Store
//!
//! Holds the one active session (a [`RedactedUser`] or nothing), mirrors it
//! into durable storage under a fixed key, and publishes every mutation on a
//! `watch` channel so access checks can recompute.

use tokio::sync::watch;

use super::storage::SessionStorage;
use crate::directory::RedactedUser;
use crate::errors::Result;

/// Storage key of the persisted session
pub const SESSION_STORAGE_KEY: &str = "currentUser";

/// Current session, restored from storage on construction
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    key: String,
    current: watch::Sender<Option<RedactedUser>>,
}

impl SessionStore {
    /// Open the store on `storage` with the default key
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        Self::with_key(storage, SESSION_STORAGE_KEY)
    }

    /// Open the store on `storage` under a custom key
    ///
    /// A persisted session is restored. An unreadable or corrupt value is
    /// logged, removed, and the store starts signed out.
    pub fn with_key(mut storage: Box<dyn SessionStorage>, key: &str) -> Self {
        let restored = Self::restore(storage.as_mut(), key);
        let (current, _) = watch::channel(restored);

        SessionStore {
            storage,
            key: key.to_string(),
            current,
        }
    }

    fn restore(storage: &mut dyn SessionStorage, key: &str) -> Option<RedactedUser> {
        let raw = match storage.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "session storage unreadable, starting signed out");
                return None;
            }
        };

        match serde_json::from_str::<RedactedUser>(&raw) {
            Ok(user) => {
                tracing::debug!(email = user.email(), role = %user.role(), "session restored");
                Some(user)
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding corrupt persisted session");
                if let Err(e) = storage.remove(key) {
                    tracing::warn!(key, error = %e, "failed to remove corrupt session");
                }
                None
            }
        }
    }

    /// The signed-in user, if any
    ///
    /// Reads the in-memory value only; repeated calls return the same value
    /// until the next mutation.
    pub fn get_current_user(&self) -> Option<RedactedUser> {
        self.current.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Replace the session with `user`
    ///
    /// The value is persisted before it becomes visible; the last write wins.
    pub fn set_current_user(&mut self, user: RedactedUser) -> Result<()> {
        let json = serde_json::to_string(&user)?;
        self.storage.write(&self.key, &json)?;

        tracing::debug!(email = user.email(), role = %user.role(), "session stored");
        self.current.send_replace(Some(user));
        Ok(())
    }

    /// Sign out: remove the persisted session, then forget the in-memory one
    ///
    /// When removal fails the session stays signed in, matching what the
    /// next start would restore.
    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove(&self.key)?;

        let previous = self.current.send_replace(None);
        if let Some(user) = previous {
            tracing::debug!(email = user.email(), "session cleared");
        }
        Ok(())
    }

    /// Observe session changes
    ///
    /// The receiver starts with the current value marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<Option<RedactedUser>> {
        self.current.subscribe()
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }
}
