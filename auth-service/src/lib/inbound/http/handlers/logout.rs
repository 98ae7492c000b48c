use axum::http::StatusCode;

use super::ApiSuccess;
use super::AuthResponseBody;

/// Acknowledge a logout.
///
/// Session tokens are stateless, so there is nothing to revoke server
/// side; the endpoint exists so clients can report the logout and tear
/// down locally regardless of what the network does with this call.
pub async fn logout() -> ApiSuccess {
    ApiSuccess::new(StatusCode::OK, AuthResponseBody::plain("Logged out"))
}
