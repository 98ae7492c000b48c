use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseBody;
use crate::account::ports::AuthSessionPort;
use crate::inbound::http::middleware::AuthenticatedAccount;
use crate::inbound::http::router::AppState;

/// Return the account behind the presented bearer token.
pub async fn current_account(
    State(state): State<AppState>,
    Extension(authenticated): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess, ApiError> {
    let account = state
        .auth_service
        .account(&authenticated.account_id)
        .await
        .map_err(ApiError::from)?;

    let mut body = AuthResponseBody::plain("Authenticated");
    body.account = Some(AccountData::from(&account));

    Ok(ApiSuccess::new(StatusCode::OK, body))
}
