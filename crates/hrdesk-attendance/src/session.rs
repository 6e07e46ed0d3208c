use std::sync::Mutex;

use hrdesk_core::Session;

use crate::error::StoreError;

/// Persistent home of the signed-in [`Session`].
pub trait SessionStore {
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read.
    fn load(&self) -> Result<Option<Session>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be written.
    fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Forgets the session. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be removed.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Process-local store, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Session>>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Corrupt("session lock poisoned".into()))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        *self.lock()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.lock()? = None;
        Ok(())
    }
}
