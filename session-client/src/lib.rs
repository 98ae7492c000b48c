//! Client-side session management library
//!
//! Keeps a client application's authentication state consistent with a
//! server-issued, time-limited session token:
//! - Token persistence with expiry-aware reads ([`store::TokenStore`])
//! - Retrying transport for the auth endpoints ([`transport::AuthTransport`])
//! - A session orchestrator owning the observable authentication state
//!   ([`session::SessionManager`])
//! - A request wrapper that recovers from authorization failures exactly
//!   once ([`authorized::AuthorizedClient`])
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use session_client::models::Credential;
//! use session_client::session::SessionManager;
//! use session_client::settings::ClientSettings;
//! use session_client::store::memory::InMemoryTokenStorage;
//! use session_client::transport::AuthTransport;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ClientSettings {
//!     base_url: "https://api.example.com".to_string(),
//!     ..ClientSettings::default()
//! };
//!
//! let transport = Arc::new(AuthTransport::new(&settings)?);
//! let session = SessionManager::new(InMemoryTokenStorage::new(), transport, &settings);
//!
//! session.initialize().await;
//!
//! let outcome = session
//!     .login(&Credential::new("alice@example.com", "secret-password1"))
//!     .await;
//! assert_eq!(outcome.success, session.state().is_authenticated);
//! # Ok(())
//! # }
//! ```

pub mod authorized;
pub mod models;
pub mod session;
pub mod settings;
pub mod store;
pub mod transport;

pub use models::AccountSummary;
pub use models::AuthOutcome;
pub use models::Credential;
pub use models::RegisterRequest;
pub use session::SessionManager;
pub use session::SessionState;
pub use settings::ClientSettings;
pub use store::TokenStore;
pub use transport::AuthTransport;
