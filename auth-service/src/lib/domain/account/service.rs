use std::sync::Arc;

use async_trait::async_trait;
use auth::TokenIssuer;
use auth::TokenValidator;

use crate::account::errors::AuthError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::AuthenticatedSession;
use crate::account::models::Credential;
use crate::account::models::RegisterCommand;
use crate::account::ports::AuthSessionPort;
use crate::account::ports::IdentityStore;

/// Domain service for session issuance.
///
/// Composes the external identity store with the token issuer/validator.
pub struct AuthSessionService<IS>
where
    IS: IdentityStore,
{
    identity_store: Arc<IS>,
    token_issuer: TokenIssuer,
    token_validator: TokenValidator,
}

impl<IS> AuthSessionService<IS>
where
    IS: IdentityStore,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `identity_store` - External account/credential verification
    /// * `token_issuer` - Mints signed session tokens
    /// * `token_validator` - Verifies presented tokens (refresh flow)
    pub fn new(
        identity_store: Arc<IS>,
        token_issuer: TokenIssuer,
        token_validator: TokenValidator,
    ) -> Self {
        Self {
            identity_store,
            token_issuer,
            token_validator,
        }
    }

    fn issue_for(&self, account: Account) -> Result<AuthenticatedSession, AuthError> {
        let issued = self
            .token_issuer
            .issue(&account.id.to_string(), account.email.as_str())
            .map_err(|e| AuthError::TokenIssuance(e.to_string()))?;

        Ok(AuthenticatedSession {
            account,
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }
}

#[async_trait]
impl<IS> AuthSessionPort for AuthSessionService<IS>
where
    IS: IdentityStore,
{
    async fn login(&self, credential: Credential) -> Result<AuthenticatedSession, AuthError> {
        let account = self
            .identity_store
            .verify_credentials(&credential.email, &credential.password)
            .await?;

        tracing::info!(account_id = %account.id, "Login verified");
        self.issue_for(account)
    }

    async fn register(
        &self,
        command: RegisterCommand,
    ) -> Result<AuthenticatedSession, AuthError> {
        let account = self.identity_store.create_account(command).await?;

        tracing::info!(account_id = %account.id, "Account registered");
        self.issue_for(account)
    }

    async fn refresh(&self, token: &str) -> Result<AuthenticatedSession, AuthError> {
        // Relaxed validation: an authentic token that merely lapsed is
        // still proof of a prior session.
        let claims = self
            .token_validator
            .validate_ignoring_expiry(token)
            .map_err(|e| {
                tracing::warn!(error = %e, "Refresh rejected");
                AuthError::InvalidToken
            })?;

        let account_id = AccountId::from_string(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        let account = self
            .identity_store
            .find_by_id(&account_id)
            .await?
            .ok_or_else(|| AuthError::AccountNotFound(claims.sub.clone()))?;

        self.issue_for(account)
    }

    async fn account(&self, id: &AccountId) -> Result<Account, AuthError> {
        self.identity_store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::AccountNotFound(id.to_string()))
    }
}
