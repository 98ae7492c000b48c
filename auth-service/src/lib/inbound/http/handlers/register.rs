use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseBody;
use crate::account::errors::EmailError;
use crate::account::errors::PasswordPolicyError;
use crate::account::models::EmailAddress;
use crate::account::models::RegisterCommand;
use crate::account::ports::AuthSessionPort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess, ApiError> {
    let session = state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        AuthResponseBody::from_session(&session, "Registration successful"),
    ))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestBody {
    email: String,
    password: String,
    confirm_password: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),

    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl RegisterRequestBody {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        if self.password != self.confirm_password {
            return Err(ParseRegisterRequestError::PasswordMismatch);
        }
        let email = EmailAddress::new(self.email)?;
        let command =
            RegisterCommand::new(email, self.password, self.first_name, self.last_name)?;
        Ok(command)
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
