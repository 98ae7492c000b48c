mod common;

use chrono::Duration;
use chrono::Utc;
use common::seeded_session;
use common::session;
use common::session_with_storage;
use serde_json::json;
use session_client::models::Credential;
use session_client::store::memory::InMemoryTokenStorage;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

fn credential() -> Credential {
    Credential::new("test@example.com", "TestPassword123")
}

#[tokio::test]
async fn test_login_success_commits_session() {
    let server = MockServer::start().await;
    let expires_at = Utc::now() + Duration::hours(1);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "abc",
            "message": "Login successful",
            "expiresAt": expires_at
        })))
        .mount(&server)
        .await;

    let session = session(&server.uri());
    let outcome = session.login(&credential()).await;

    assert!(outcome.success);

    let state = session.state();
    assert!(state.is_authenticated);
    let account = state.current_account.expect("account must be set");
    assert_eq!(account.email, "test@example.com");

    // Write-through: the store now holds the issued token
    assert_eq!(session.bearer_token().await.as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_login_failure_leaves_state_untouched() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let session = session(&server.uri());
    let outcome = session.login(&credential()).await;

    assert!(!outcome.success);
    assert!(!session.state().is_authenticated);
    assert_eq!(session.bearer_token().await, None);
}

#[tokio::test]
async fn test_failed_relogin_does_not_log_out() {
    let server = MockServer::start().await;
    let expires_at = Utc::now() + Duration::hours(1);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "abc",
            "message": "Login successful",
            "expiresAt": expires_at
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session(&server.uri());
    assert!(session.login(&credential()).await.success);

    // The server now starts rejecting logins
    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let retry = session.login(&Credential::new("test@example.com", "wrong")).await;
    assert!(!retry.success);

    // Still authenticated as before
    assert!(session.state().is_authenticated);
    assert_eq!(session.bearer_token().await.as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_register_success_commits_session() {
    let server = MockServer::start().await;
    let expires_at = Utc::now() + Duration::hours(1);

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "token": "fresh",
            "account": {"id": "a-9", "email": "new@example.com"},
            "message": "Registration successful",
            "expiresAt": expires_at
        })))
        .mount(&server)
        .await;

    let session = session(&server.uri());
    let outcome = session
        .register(&session_client::models::RegisterRequest {
            email: "new@example.com".to_string(),
            password: "TestPassword123".to_string(),
            confirm_password: "TestPassword123".to_string(),
            first_name: "New".to_string(),
            last_name: "User".to_string(),
        })
        .await;

    assert!(outcome.success);

    let state = session.state();
    assert!(state.is_authenticated);
    assert_eq!(state.current_account.unwrap().id, "a-9");
}

#[tokio::test]
async fn test_logout_is_idempotent_and_always_true() {
    let server = MockServer::start().await;
    let expires_at = Utc::now() + Duration::hours(1);

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "abc",
            "message": "",
            "expiresAt": expires_at
        })))
        .mount(&server)
        .await;

    // Remote logout fails; local teardown must not care
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = session(&server.uri());
    session.login(&credential()).await;
    assert!(session.state().is_authenticated);

    assert!(session.logout().await);
    assert!(!session.state().is_authenticated);
    assert_eq!(session.bearer_token().await, None);

    // Second logout: same observable result, no panic
    assert!(session.logout().await);
    assert!(!session.state().is_authenticated);
}

#[tokio::test]
async fn test_restore_with_expired_stored_token() {
    let server = MockServer::start().await;

    // Stored session expired 10 minutes ago
    let storage = InMemoryTokenStorage::seeded(seeded_session(Duration::minutes(-10)));
    let session = session_with_storage(&server.uri(), storage);

    assert!(!session.restore().await);
    assert!(!session.state().is_authenticated);
    // Store was cleared by the failed restore
    assert_eq!(session.bearer_token().await, None);
}

#[tokio::test]
async fn test_try_refresh_commits_new_token() {
    let server = MockServer::start().await;
    let expires_at = Utc::now() + Duration::hours(1);

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "renewed",
            "message": "Token refreshed",
            "expiresAt": expires_at
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = InMemoryTokenStorage::seeded(seeded_session(Duration::hours(1)));
    let session = session_with_storage(&server.uri(), storage);
    session.initialize().await;

    assert!(session.try_refresh().await);
    assert_eq!(session.bearer_token().await.as_deref(), Some("renewed"));
    assert!(session.state().is_authenticated);
}

#[tokio::test]
async fn test_try_refresh_rejection_tears_down() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let storage = InMemoryTokenStorage::seeded(seeded_session(Duration::hours(1)));
    let session = session_with_storage(&server.uri(), storage);
    session.initialize().await;
    assert!(session.state().is_authenticated);

    assert!(!session.try_refresh().await);
    assert!(!session.state().is_authenticated);
    assert_eq!(session.bearer_token().await, None);
}

#[tokio::test]
async fn test_try_refresh_without_stored_token() {
    let server = MockServer::start().await;

    let session = session(&server.uri());
    assert!(!session.try_refresh().await);
}
