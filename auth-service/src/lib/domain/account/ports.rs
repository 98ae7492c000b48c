use async_trait::async_trait;

use crate::account::errors::AuthError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::AuthenticatedSession;
use crate::account::models::Credential;
use crate::account::models::EmailAddress;
use crate::account::models::RegisterCommand;

/// Port for the authentication session service.
#[async_trait]
pub trait AuthSessionPort: Send + Sync + 'static {
    /// Verify a credential and mint a session token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `StoreError` - Identity store operation failed
    /// * `TokenIssuance` - Token could not be signed
    async fn login(&self, credential: Credential) -> Result<AuthenticatedSession, AuthError>;

    /// Create an account and mint its first session token.
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - Email is already taken
    /// * `StoreError` - Identity store operation failed
    /// * `TokenIssuance` - Token could not be signed
    async fn register(&self, command: RegisterCommand)
        -> Result<AuthenticatedSession, AuthError>;

    /// Exchange an authentic (possibly expired) token for a fresh one.
    ///
    /// Signature, issuer, and audience must hold; the expiry claim is
    /// deliberately ignored so a client can recover a just-lapsed session.
    ///
    /// # Errors
    /// * `InvalidToken` - Token fails relaxed validation
    /// * `AccountNotFound` - Subject no longer exists in the store
    async fn refresh(&self, token: &str) -> Result<AuthenticatedSession, AuthError>;

    /// Look up the account behind a validated token subject.
    ///
    /// # Errors
    /// * `AccountNotFound` - Subject no longer exists in the store
    /// * `StoreError` - Identity store operation failed
    async fn account(&self, id: &AccountId) -> Result<Account, AuthError>;
}

/// Port for the external identity store.
///
/// Persistent account records and password verification live behind this
/// boundary; the auth service never sees password material.
#[async_trait]
pub trait IdentityStore: Send + Sync + 'static {
    /// Verify a credential against the stored account.
    ///
    /// Unknown email and wrong password are indistinguishable to callers.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Email unknown or password mismatch
    /// * `StoreError` - Store operation failed
    async fn verify_credentials(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Account, AuthError>;

    /// Create a new account record.
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - Email is already taken
    /// * `StoreError` - Store operation failed
    async fn create_account(&self, command: RegisterCommand) -> Result<Account, AuthError>;

    /// Retrieve an account by identifier.
    ///
    /// # Errors
    /// * `StoreError` - Store operation failed
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AuthError>;
}
