use std::sync::Arc;

use reqwest::Method;
use reqwest::StatusCode;
use thiserror::Error;

use crate::session::SessionManager;
use crate::settings::ClientSettings;
use crate::store::TokenStorage;
use crate::transport::TransportError;

/// Error type for authorized domain requests.
#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Network error: {0}")]
    Network(String),
}

/// Issues authenticated domain requests on top of a session.
///
/// Decorates each request with the stored bearer token. On an
/// authorization failure it asks the session for one refresh and
/// retries the original request exactly once; any further 401 tears the
/// session down and surfaces [`ApiClientError::AuthenticationRequired`].
/// It never loops.
pub struct AuthorizedClient<S>
where
    S: TokenStorage,
{
    session: Arc<SessionManager<S>>,
    http: reqwest::Client,
}

impl<S> AuthorizedClient<S>
where
    S: TokenStorage,
{
    /// Create a client bound to a session manager.
    ///
    /// # Errors
    /// * `ClientBuild` - Underlying HTTP client could not be constructed
    pub fn new(
        session: Arc<SessionManager<S>>,
        settings: &ClientSettings,
    ) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        Ok(Self { session, http })
    }

    /// GET an authenticated resource.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, ApiClientError> {
        self.execute(Method::GET, url).await
    }

    /// POST to an authenticated resource with a JSON body.
    pub async fn post_json<B>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response, ApiClientError>
    where
        B: serde::Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiClientError::Network(format!("Failed to encode body: {}", e)))?;
        self.execute_with_body(Method::POST, url, Some(body)).await
    }

    /// Issue a bodyless authenticated request.
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
    ) -> Result<reqwest::Response, ApiClientError> {
        self.execute_with_body(method, url, None).await
    }

    async fn execute_with_body(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, ApiClientError> {
        let Some(token) = self.session.bearer_token().await else {
            return Err(ApiClientError::AuthenticationRequired);
        };

        let response = self.send(method.clone(), url, &body, &token).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::info!(url, "Authorization failure, attempting session refresh");
        if !self.session.try_refresh().await {
            // try_refresh already tore the session down
            return Err(ApiClientError::AuthenticationRequired);
        }

        let Some(token) = self.session.bearer_token().await else {
            return Err(ApiClientError::AuthenticationRequired);
        };

        let retry = self.send(method, url, &body, &token).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            // A fresh token the server still rejects is beyond recovery here
            tracing::warn!(url, "Request rejected again after refresh");
            self.session.invalidate().await;
            return Err(ApiClientError::AuthenticationRequired);
        }

        Ok(retry)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: &Option<serde_json::Value>,
        token: &str,
    ) -> Result<reqwest::Response, ApiClientError> {
        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| ApiClientError::Network(e.to_string()))
    }
}
