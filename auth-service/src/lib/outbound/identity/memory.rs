use std::collections::HashMap;
use std::sync::RwLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;
use async_trait::async_trait;
use chrono::Utc;

use crate::account::errors::AuthError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::EmailAddress;
use crate::account::models::RegisterCommand;
use crate::account::ports::IdentityStore;

/// In-memory identity store adapter.
///
/// Stands in for the external identity system that owns durable account
/// records. Passwords are stored as Argon2id PHC strings; lookups are
/// keyed by normalized email.
pub struct InMemoryIdentityStore {
    accounts: RwLock<HashMap<String, StoredAccount>>,
}

struct StoredAccount {
    account: Account,
    password_hash: String,
}

impl InMemoryIdentityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::StoreError(format!("Password hashing failed: {}", e)))
    }

    fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::StoreError(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl Default for InMemoryIdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn verify_credentials(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Account, AuthError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| AuthError::StoreError("Store lock poisoned".to_string()))?;

        // Unknown email and wrong password answer identically.
        let stored = accounts
            .get(email.as_str())
            .ok_or(AuthError::InvalidCredentials)?;

        if !Self::verify_password(password, &stored.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(stored.account.clone())
    }

    async fn create_account(&self, command: RegisterCommand) -> Result<Account, AuthError> {
        let password_hash = Self::hash_password(&command.password)?;

        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| AuthError::StoreError("Store lock poisoned".to_string()))?;

        if accounts.contains_key(command.email.as_str()) {
            return Err(AuthError::EmailAlreadyRegistered(
                command.email.as_str().to_string(),
            ));
        }

        let account = Account {
            id: AccountId::new(),
            email: command.email,
            first_name: command.first_name,
            last_name: command.last_name,
            created_at: Utc::now(),
        };

        accounts.insert(
            account.email.as_str().to_string(),
            StoredAccount {
                account: account.clone(),
                password_hash,
            },
        );

        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AuthError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| AuthError::StoreError("Store lock poisoned".to_string()))?;

        Ok(accounts
            .values()
            .find(|stored| stored.account.id == *id)
            .map(|stored| stored.account.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_command(email: &str, password: &str) -> RegisterCommand {
        RegisterCommand::new(
            EmailAddress::new(email.to_string()).unwrap(),
            password.to_string(),
            "Test".to_string(),
            "User".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_then_verify() {
        let store = InMemoryIdentityStore::new();

        let created = store
            .create_account(register_command("test@example.com", "TestPassword123"))
            .await
            .expect("create failed");

        let verified = store
            .verify_credentials(
                &EmailAddress::new("test@example.com".to_string()).unwrap(),
                "TestPassword123",
            )
            .await
            .expect("verify failed");

        assert_eq!(verified.id, created.id);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let store = InMemoryIdentityStore::new();
        store
            .create_account(register_command("test@example.com", "TestPassword123"))
            .await
            .unwrap();

        let result = store
            .verify_credentials(
                &EmailAddress::new("test@example.com".to_string()).unwrap(),
                "WrongPassword1",
            )
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_email_indistinguishable_from_wrong_password() {
        let store = InMemoryIdentityStore::new();

        let result = store
            .verify_credentials(
                &EmailAddress::new("nobody@example.com".to_string()).unwrap(),
                "AnyPassword1",
            )
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryIdentityStore::new();
        store
            .create_account(register_command("test@example.com", "TestPassword123"))
            .await
            .unwrap();

        let result = store
            .create_account(register_command("Test@Example.com", "OtherPassword1"))
            .await;

        assert!(matches!(result, Err(AuthError::EmailAlreadyRegistered(_))));
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let store = InMemoryIdentityStore::new();
        let created = store
            .create_account(register_command("test@example.com", "TestPassword123"))
            .await
            .unwrap();

        let found = store.find_by_id(&created.id).await.unwrap();
        assert!(found.is_some());

        let missing = store.find_by_id(&AccountId::new()).await.unwrap();
        assert!(missing.is_none());
    }
}
