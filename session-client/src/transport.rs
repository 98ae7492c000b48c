use std::sync::RwLock;
use std::time::Duration as StdDuration;

use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::models::AuthOutcome;
use crate::models::Credential;
use crate::models::RegisterRequest;
use crate::settings::ClientSettings;

const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";
const LOGOUT_PATH: &str = "/api/auth/logout";
const REFRESH_PATH: &str = "/api/auth/refresh";

/// Error type for transport construction.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// HTTP client for the server's auth endpoints.
///
/// Owns no durable state; the only thing it holds between calls is the
/// bearer value used to decorate outgoing requests. Every operation
/// returns an [`AuthOutcome`]: transport failures, bad statuses, and
/// unparseable bodies are all translated, never propagated.
pub struct AuthTransport {
    http: reqwest::Client,
    base_url: String,
    bearer: RwLock<Option<String>>,
    max_attempts: u32,
    backoff_base: StdDuration,
}

impl AuthTransport {
    /// Build a transport from client settings.
    ///
    /// The request timeout applies per attempt, independent of the
    /// retry/backoff policy.
    ///
    /// # Errors
    /// * `ClientBuild` - Underlying HTTP client could not be constructed
    pub fn new(settings: &ClientSettings) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            bearer: RwLock::new(None),
            max_attempts: settings.max_attempts.max(1),
            backoff_base: settings.backoff_base(),
        })
    }

    /// Authenticate a credential against `auth/login`.
    ///
    /// Transport-level failures are retried with exponential backoff up
    /// to the configured attempt cap.
    pub async fn login(&self, credential: &Credential) -> AuthOutcome {
        self.post_with_retry(LOGIN_PATH, credential).await
    }

    /// Create an account via `auth/register`.
    ///
    /// Retried like login: a duplicate submit surfaces as a failure
    /// outcome, the server being the source of truth for uniqueness.
    pub async fn register(&self, request: &RegisterRequest) -> AuthOutcome {
        self.post_with_retry(REGISTER_PATH, request).await
    }

    /// Exchange a held token for a fresh one via `auth/refresh`.
    ///
    /// Single-shot: this runs inside the reactive recovery path, which
    /// is itself bounded to one attempt.
    pub async fn refresh(&self, token: &str) -> AuthOutcome {
        match self.post_once(REFRESH_PATH, &json!({ "token": token })).await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(error = %error, "Refresh request failed");
                AuthOutcome::failure(Self::describe_transport_failure(&error))
            }
        }
    }

    /// Report a logout to the server.
    ///
    /// Always returns true: local teardown must never be blocked by a
    /// failed remote call, so network faults and error statuses are
    /// logged and discarded.
    pub async fn logout(&self) -> bool {
        let result = self
            .decorated(self.http.post(self.url(LOGOUT_PATH)))
            .send()
            .await;

        match result {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(status = response.status().as_u16(), "Logout call rejected");
            }
            Err(error) => {
                tracing::warn!(error = %error, "Logout call failed");
            }
            Ok(_) => {}
        }

        true
    }

    /// Set or clear the bearer value attached to subsequent requests.
    ///
    /// An empty token clears the header, same as `None`.
    pub fn set_credential_header(&self, token: Option<&str>) {
        let value = token.filter(|t| !t.is_empty()).map(str::to_string);
        if let Ok(mut bearer) = self.bearer.write() {
            *bearer = value;
        }
    }

    /// The currently held bearer value, if any.
    pub fn credential_header(&self) -> Option<String> {
        self.bearer.read().ok().and_then(|bearer| bearer.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn decorated(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.credential_header() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn post_with_retry<B>(&self, path: &str, body: &B) -> AuthOutcome
    where
        B: Serialize + ?Sized,
    {
        let mut attempt = 0u32;
        loop {
            match self.post_once(path, body).await {
                Ok(outcome) => return outcome,
                Err(error) => {
                    attempt += 1;
                    if attempt >= self.max_attempts {
                        tracing::error!(
                            error = %error,
                            attempts = attempt,
                            path,
                            "Request failed after exhausting retries"
                        );
                        return AuthOutcome::failure(Self::describe_transport_failure(&error));
                    }

                    let delay = self.backoff_base * 2u32.pow(attempt - 1);
                    tracing::warn!(
                        error = %error,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        path,
                        "Transport failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// One request/response cycle. `Err` means the transport itself
    /// failed (connect error, timeout) and the attempt may be retried;
    /// any HTTP response, whatever its status, is a final outcome.
    async fn post_once<B>(&self, path: &str, body: &B) -> Result<AuthOutcome, reqwest::Error>
    where
        B: Serialize + ?Sized,
    {
        let request = self.decorated(self.http.post(self.url(path)).json(body));
        let response = request.send().await?;
        Ok(Self::classify(response).await)
    }

    async fn classify(response: reqwest::Response) -> AuthOutcome {
        let status = response.status();

        if status.is_success() {
            return match response.json::<AuthOutcome>().await {
                Ok(outcome) => outcome,
                Err(error) => {
                    tracing::warn!(error = %error, "Response body did not match the auth contract");
                    AuthOutcome::failure("Invalid response format")
                }
            };
        }

        match status.as_u16() {
            401 => AuthOutcome::failure("Invalid email or password"),
            409 => AuthOutcome::failure("Email address is already registered"),
            400 => AuthOutcome::failure("Invalid request data"),
            503 => AuthOutcome::failure("Service temporarily unavailable. Please try again later."),
            500..=599 => AuthOutcome::failure("Server error. Please try again later."),
            other => AuthOutcome::failure(format!("Unexpected response (status {})", other)),
        }
    }

    fn describe_transport_failure(error: &reqwest::Error) -> String {
        if error.is_timeout() {
            "Request timed out. Please try again.".to_string()
        } else {
            "Network error. Please check your connection.".to_string()
        }
    }
}
