use std::sync::Arc;

use auth::TokenIssuer;
use chrono::Duration;
use session_client::session::SessionManager;
use session_client::settings::ClientSettings;
use session_client::store::memory::InMemoryTokenStorage;
use session_client::store::StoredSession;
use session_client::transport::AuthTransport;

pub const TEST_SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";
pub const TEST_ISSUER: &str = "auth-service-test";
pub const TEST_AUDIENCE: &str = "session-clients-test";

/// Settings pointed at a mock server, with timing dialed down so retry
/// tests finish quickly.
pub fn test_settings(base_url: &str) -> ClientSettings {
    ClientSettings {
        base_url: base_url.to_string(),
        request_timeout_secs: 1,
        max_attempts: 3,
        backoff_base_millis: 10,
        expiry_skew_minutes: 5,
        refresh_threshold_minutes: 10,
    }
}

pub fn transport(base_url: &str) -> AuthTransport {
    AuthTransport::new(&test_settings(base_url)).expect("Failed to build transport")
}

pub fn session_with_storage(
    base_url: &str,
    storage: InMemoryTokenStorage,
) -> SessionManager<InMemoryTokenStorage> {
    let settings = test_settings(base_url);
    let transport = Arc::new(AuthTransport::new(&settings).expect("Failed to build transport"));
    SessionManager::new(storage, transport, &settings)
}

pub fn session(base_url: &str) -> SessionManager<InMemoryTokenStorage> {
    session_with_storage(base_url, InMemoryTokenStorage::new())
}

/// A complete stored session for seeding client storage.
pub fn seeded_session(lifetime: Duration) -> StoredSession {
    let issued = TokenIssuer::new(TEST_SECRET, TEST_ISSUER, TEST_AUDIENCE, lifetime)
        .issue("account-1", "alice@example.com")
        .expect("Failed to issue test token");

    StoredSession {
        token: issued.token,
        expires_at: issued.expires_at,
        email: "alice@example.com".to_string(),
    }
}
