use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::AccountIdError;
use crate::account::errors::EmailError;
use crate::account::errors::PasswordPolicyError;

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Comparison
/// and storage are case-insensitive on the stored normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// The address is normalized to lowercase so that the identity store
    /// treats `Alice@Example.com` and `alice@example.com` as one account.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email.to_lowercase()))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account record as surfaced by the identity store.
///
/// Password material never leaves the store; this is the public shape.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// Login input: an email-shaped identifier plus a secret.
///
/// Used once per call and never persisted.
#[derive(Debug)]
pub struct Credential {
    pub email: EmailAddress,
    pub password: String,
}

impl Credential {
    /// Construct a credential from a validated email and raw password.
    pub fn new(email: EmailAddress, password: String) -> Self {
        Self { email, password }
    }
}

/// Command to register a new account with validated fields.
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterCommand {
    /// Construct a register command, enforcing the password policy.
    ///
    /// # Errors
    /// * `TooShort` - Password shorter than 8 characters
    /// * `MissingLetter` / `MissingDigit` - Composition requirements
    pub fn new(
        email: EmailAddress,
        password: String,
        first_name: String,
        last_name: String,
    ) -> Result<Self, PasswordPolicyError> {
        check_password_policy(&password)?;
        Ok(Self {
            email,
            password,
            first_name,
            last_name,
        })
    }
}

const MIN_PASSWORD_LENGTH: usize = 8;

fn check_password_policy(password: &str) -> Result<(), PasswordPolicyError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err(PasswordPolicyError::MissingLetter);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordPolicyError::MissingDigit);
    }
    Ok(())
}

/// Outcome of a successful login, registration, or refresh.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub account: Account,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
