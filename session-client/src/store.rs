use async_trait::async_trait;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use thiserror::Error;

pub mod memory;

pub use memory::InMemoryTokenStorage;

/// The three persisted session fields.
///
/// They live and die together: a backend that can only produce part of
/// them must report nothing at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub email: String,
}

/// Error type for session persistence.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Token must not be empty")]
    InvalidToken,

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Contract for the durability engine behind the token store.
///
/// The engine itself (keychain, encrypted file, browser storage) is not
/// specified here; any implementation must replace or clear the whole
/// [`StoredSession`] atomically so readers never observe partial state.
#[async_trait]
pub trait TokenStorage: Send + Sync + 'static {
    /// Read the stored session, if any.
    async fn load(&self) -> Result<Option<StoredSession>, StorageError>;

    /// Replace the stored session as a whole.
    async fn store(&self, session: StoredSession) -> Result<(), StorageError>;

    /// Remove the stored session as a whole.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Expiry-aware facade over a [`TokenStorage`] backend.
///
/// All reads fail closed: missing or partial data counts as expired,
/// and an expired session is evicted on first read.
pub struct TokenStore<S>
where
    S: TokenStorage,
{
    storage: S,
    skew: Duration,
}

impl<S> TokenStore<S>
where
    S: TokenStorage,
{
    /// Wrap a storage backend.
    ///
    /// # Arguments
    /// * `storage` - Durability engine implementation
    /// * `skew` - Grace window subtracted from expiry to absorb clock drift
    pub fn new(storage: S, skew: Duration) -> Self {
        Self { storage, skew }
    }

    /// Persist a session; all three fields are written together.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is empty
    /// * `Backend` - Underlying write failed (the session must not be
    ///   reported as saved if it was not)
    pub async fn save(
        &self,
        token: &str,
        expires_at: DateTime<Utc>,
        email: &str,
    ) -> Result<(), StorageError> {
        if token.is_empty() {
            return Err(StorageError::InvalidToken);
        }

        self.storage
            .store(StoredSession {
                token: token.to_string(),
                expires_at,
                email: email.to_string(),
            })
            .await
    }

    /// The stored token, unless nothing is stored or the session has
    /// expired, in which case the stale session is evicted.
    pub async fn token(&self) -> Option<String> {
        let session = self.load_or_absent().await?;

        if self.session_expired(&session) {
            // Read-triggered eviction; the caller only sees "absent".
            self.clear().await;
            return None;
        }

        Some(session.token)
    }

    /// The stored expiry, if any.
    pub async fn expiry(&self) -> Option<DateTime<Utc>> {
        self.load_or_absent().await.map(|s| s.expires_at)
    }

    /// The stored account email, if any.
    pub async fn account_email(&self) -> Option<String> {
        self.load_or_absent().await.map(|s| s.email)
    }

    /// Whether the stored session is expired.
    ///
    /// No stored expiry means expired (fail closed); otherwise expiry is
    /// reached once `now + skew` passes it.
    pub async fn is_expired(&self) -> bool {
        match self.load_or_absent().await {
            Some(session) => self.session_expired(&session),
            None => true,
        }
    }

    /// Convenience: a non-expired token is currently stored.
    pub async fn has_valid_token(&self) -> bool {
        self.token().await.is_some()
    }

    /// Remove the stored session.
    ///
    /// Never fails from the caller's perspective: logout must always
    /// succeed locally even when the backing store is unhealthy.
    pub async fn clear(&self) {
        if let Err(e) = self.storage.clear().await {
            tracing::warn!(error = %e, "Failed to clear stored session");
        }
    }

    /// Parse the account identifier claim out of a token string without
    /// verifying its signature. Absent on any malformed input.
    pub fn decode_account_id(token: &str) -> Option<String> {
        auth::extract_account_id(token)
    }

    fn session_expired(&self, session: &StoredSession) -> bool {
        Utc::now() + self.skew >= session.expires_at
    }

    async fn load_or_absent(&self) -> Option<StoredSession> {
        match self.storage.load().await {
            Ok(session) => session,
            Err(e) => {
                // Unreadable storage reads as "no session" (fail closed).
                tracing::warn!(error = %e, "Failed to read stored session");
                None
            }
        }
    }
}
