use std::sync::RwLock;

use async_trait::async_trait;

use super::StorageError;
use super::StoredSession;
use super::TokenStorage;

/// In-memory storage backend.
///
/// Replacement and removal swap the whole session under one lock, so
/// readers never observe a half-written state.
pub struct InMemoryTokenStorage {
    session: RwLock<Option<StoredSession>>,
}

impl InMemoryTokenStorage {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self {
            session: RwLock::new(None),
        }
    }

    /// Create a backend pre-populated with a session.
    ///
    /// Lets tests and hosts inject an already-authenticated state
    /// without reaching into private fields.
    pub fn seeded(session: StoredSession) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

impl Default for InMemoryTokenStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStorage for InMemoryTokenStorage {
    async fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        let guard = self
            .session
            .read()
            .map_err(|_| StorageError::Backend("Storage lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    async fn store(&self, session: StoredSession) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .write()
            .map_err(|_| StorageError::Backend("Storage lock poisoned".to_string()))?;
        *guard = Some(session);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .write()
            .map_err(|_| StorageError::Backend("Storage lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}
