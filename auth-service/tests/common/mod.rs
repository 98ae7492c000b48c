use std::sync::Arc;

use auth::TokenIssuer;
use auth::TokenValidator;
use auth_service::domain::account::service::AuthSessionService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::identity::InMemoryIdentityStore;
use chrono::Duration;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_ISSUER: &str = "auth-service-test";
pub const TEST_AUDIENCE: &str = "session-clients-test";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let identity_store = Arc::new(InMemoryIdentityStore::new());
        let auth_service = Arc::new(AuthSessionService::new(
            identity_store,
            Self::issuer(Duration::hours(24)),
            Self::validator(),
        ));

        let router = create_router(auth_service, Arc::new(Self::validator()));

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Server task failed");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
        }
    }

    /// Token issuer sharing the test server's trust parameters.
    pub fn issuer(lifetime: Duration) -> TokenIssuer {
        TokenIssuer::new(TEST_SECRET, TEST_ISSUER, TEST_AUDIENCE, lifetime)
    }

    fn validator() -> TokenValidator {
        TokenValidator::new(TEST_SECRET, TEST_ISSUER, TEST_AUDIENCE)
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Register an account and return the issued token.
    pub async fn register_account(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/register")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "confirmPassword": password,
                "firstName": "Test",
                "lastName": "User"
            }))
            .send()
            .await
            .expect("Failed to execute register request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["token"].as_str().expect("token missing").to_string()
    }
}
