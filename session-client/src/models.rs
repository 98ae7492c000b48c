use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Login input: an email-shaped identifier plus a secret.
///
/// Held for the duration of one call and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

impl Credential {
    pub fn new(email: impl ToString, password: impl ToString) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

/// Registration input for the `auth/register` endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Account fields the server shares with clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Result of a login/registration/refresh against the transport.
///
/// Always returned, never thrown: every failure below the transport
/// boundary is translated into `success == false` plus a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthOutcome {
    pub success: bool,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub account: Option<AccountSummary>,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthOutcome {
    /// Failed outcome carrying only a user-facing message.
    pub fn failure(message: impl ToString) -> Self {
        Self {
            success: false,
            token: None,
            account: None,
            message: message.to_string(),
            expires_at: None,
        }
    }

    /// The issued token, if the outcome is a success that carries one.
    pub fn issued_token(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.token.as_deref().filter(|token| !token.is_empty())
    }
}
