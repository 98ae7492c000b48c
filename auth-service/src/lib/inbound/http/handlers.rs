use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::account::errors::AuthError;
use crate::account::models::Account;
use crate::account::models::AuthenticatedSession;

pub mod current_account;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;

/// Wire body shared by every auth endpoint, success and failure alike.
///
/// Clients key off `success` rather than parsing two different shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseBody {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountData>,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthResponseBody {
    /// Success body carrying a freshly issued session.
    pub fn from_session(session: &AuthenticatedSession, message: impl ToString) -> Self {
        Self {
            success: true,
            token: Some(session.token.clone()),
            account: Some(AccountData::from(&session.account)),
            message: message.to_string(),
            expires_at: Some(session.expires_at),
        }
    }

    /// Success body without a token (logout acknowledgement, `/me`).
    pub fn plain(message: impl ToString) -> Self {
        Self {
            success: true,
            token: None,
            account: None,
            message: message.to_string(),
            expires_at: None,
        }
    }

    /// Failure body; only `message` is populated.
    pub fn failure(message: impl ToString) -> Self {
        Self {
            success: false,
            token: None,
            account: None,
            message: message.to_string(),
            expires_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountData {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.as_str().to_string(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiSuccess(StatusCode, Json<AuthResponseBody>);

impl ApiSuccess {
    pub fn new(status: StatusCode, body: AuthResponseBody) -> Self {
        ApiSuccess(status, Json(body))
    }
}

impl IntoResponse for ApiSuccess {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Conflict(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(AuthResponseBody::failure(message))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::InvalidToken | AuthError::AccountNotFound(_) => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            AuthError::EmailAlreadyRegistered(_) => ApiError::Conflict(err.to_string()),
            AuthError::InvalidEmail(_)
            | AuthError::WeakPassword(_)
            | AuthError::InvalidAccountId(_) => ApiError::BadRequest(err.to_string()),
            AuthError::StoreError(_) | AuthError::TokenIssuance(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}
