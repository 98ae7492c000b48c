use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;

use crate::account::models::AccountId;
use crate::inbound::http::handlers::AuthResponseBody;
use crate::inbound::http::router::AppState;

/// Extension type carrying the validated caller identity
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account_id: AccountId,
    pub email: String,
}

/// Middleware that fully validates bearer tokens on protected routes.
///
/// Validation covers signature, issuer, audience, and expiry; claims are
/// only trusted past this point.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims = state.token_validator.validate(token).map_err(|e| {
        tracing::warn!(error = %e, "Token validation failed");
        unauthorized("Invalid or expired token")
    })?;

    let account_id = AccountId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not an account id");
        unauthorized("Invalid token format")
    })?;

    req.extensions_mut().insert(AuthenticatedAccount {
        account_id,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(AuthResponseBody::failure(message)),
    )
        .into_response()
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization header format. Expected: Bearer <token>"))
}
