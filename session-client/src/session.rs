use std::sync::Arc;

use chrono::Duration;
use chrono::Utc;
use tokio::sync::watch;
use tokio::sync::Mutex;

use crate::models::AccountSummary;
use crate::models::AuthOutcome;
use crate::models::Credential;
use crate::models::RegisterRequest;
use crate::settings::ClientSettings;
use crate::store::TokenStorage;
use crate::store::TokenStore;
use crate::transport::AuthTransport;

/// Observable authentication state.
///
/// `is_authenticated == true` implies `current_account` is present;
/// `is_initialized` flips to true after the first restore attempt and
/// never reverts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub is_authenticated: bool,
    pub current_account: Option<AccountSummary>,
    pub is_initialized: bool,
}

/// Orchestrates the client's authentication session.
///
/// Composes the token store and the auth transport, and is the only
/// writer of both the observable [`SessionState`] and the transport's
/// credential header. A single critical section serializes every
/// commit/teardown, so concurrent calls resolve last-completed-wins.
pub struct SessionManager<S>
where
    S: TokenStorage,
{
    store: TokenStore<S>,
    transport: Arc<AuthTransport>,
    state_tx: watch::Sender<SessionState>,
    mutation_lock: Mutex<()>,
    refresh_threshold: Duration,
}

impl<S> SessionManager<S>
where
    S: TokenStorage,
{
    /// Create a session manager over a storage backend and transport.
    pub fn new(storage: S, transport: Arc<AuthTransport>, settings: &ClientSettings) -> Self {
        let (state_tx, _state_rx) = watch::channel(SessionState::default());

        Self {
            store: TokenStore::new(storage, settings.expiry_skew()),
            transport,
            state_tx,
            mutation_lock: Mutex::new(()),
            refresh_threshold: settings.refresh_threshold(),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to state changes.
    ///
    /// Notifications are published synchronously as each mutation
    /// commits, so subscribers observe them in commit order.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Run the initial restore attempt and mark the session initialized.
    ///
    /// Whether restore succeeds, finds nothing, or hits a broken storage
    /// backend, `is_initialized` flips to true exactly once and the
    /// failure stays internal.
    pub async fn initialize(&self) {
        let _guard = self.mutation_lock.lock().await;
        let restored = self.restore_locked().await;

        self.state_tx.send_if_modified(|state| {
            if state.is_initialized {
                return false;
            }
            state.is_initialized = true;
            true
        });

        tracing::info!(restored, "Session initialized");
    }

    /// Rebuild the session from persisted state.
    ///
    /// Requires a stored, unexpired token with a decodable account
    /// identifier; anything less clears local state and returns false.
    pub async fn restore(&self) -> bool {
        let _guard = self.mutation_lock.lock().await;
        self.restore_locked().await
    }

    /// Authenticate and, on success, commit the session.
    ///
    /// A failed attempt leaves existing state untouched: failing to log
    /// in while already authenticated must not log the user out.
    pub async fn login(&self, credential: &Credential) -> AuthOutcome {
        let outcome = self.transport.login(credential).await;
        if outcome.issued_token().is_none() {
            return outcome;
        }

        let _guard = self.mutation_lock.lock().await;
        self.commit_locked(outcome, &credential.email).await
    }

    /// Register and, on success, commit the session.
    pub async fn register(&self, request: &RegisterRequest) -> AuthOutcome {
        let outcome = self.transport.register(request).await;
        if outcome.issued_token().is_none() {
            return outcome;
        }

        let _guard = self.mutation_lock.lock().await;
        self.commit_locked(outcome, &request.email).await
    }

    /// End the session.
    ///
    /// The remote call is courtesy only; local teardown always runs and
    /// the method always returns true. Calling it twice is harmless.
    pub async fn logout(&self) -> bool {
        let _guard = self.mutation_lock.lock().await;

        self.transport.logout().await;
        self.teardown_locked().await;

        true
    }

    /// Whether the current session is still usable.
    ///
    /// Discovering an expired token tears the session down as a side
    /// effect, so every caller observes the same terminal answer.
    pub async fn is_session_valid(&self) -> bool {
        let _guard = self.mutation_lock.lock().await;

        if !self.state_tx.borrow().is_authenticated {
            return false;
        }

        if self.store.is_expired().await {
            tracing::info!("Stored session expired, tearing down");
            self.teardown_locked().await;
            return false;
        }

        true
    }

    /// Proactive freshness check.
    ///
    /// Returns true when the token has comfortably more than the
    /// refresh threshold left. A token inside the threshold is treated
    /// as already expired and the session is cleared; recovery happens
    /// through the reactive path, not here. No known expiry means there
    /// is nothing to reason about: false.
    pub async fn refresh_if_needed(&self) -> bool {
        let _guard = self.mutation_lock.lock().await;

        let Some(expires_at) = self.store.expiry().await else {
            return false;
        };

        if expires_at - Utc::now() > self.refresh_threshold {
            return true;
        }

        tracing::info!("Token expiring soon, treating as expired");
        self.teardown_locked().await;
        false
    }

    /// Reactive recovery: exchange the stored token for a fresh one.
    ///
    /// On success the new session is committed and true is returned; on
    /// any failure local state is torn down and false is returned.
    pub async fn try_refresh(&self) -> bool {
        let _guard = self.mutation_lock.lock().await;

        let Some(token) = self.store.token().await else {
            self.teardown_locked().await;
            return false;
        };
        let stored_email = self.store.account_email().await.unwrap_or_default();

        let outcome = self.transport.refresh(&token).await;
        if outcome.issued_token().is_none() {
            tracing::warn!(message = %outcome.message, "Session refresh rejected");
            self.teardown_locked().await;
            return false;
        }

        self.commit_locked(outcome, &stored_email).await.success
    }

    /// Local teardown without the remote logout call.
    pub async fn invalidate(&self) {
        let _guard = self.mutation_lock.lock().await;
        self.teardown_locked().await;
    }

    /// The stored bearer token, if a valid one is held.
    pub async fn bearer_token(&self) -> Option<String> {
        self.store.token().await
    }

    async fn restore_locked(&self) -> bool {
        let Some(token) = self.store.token().await else {
            self.teardown_locked().await;
            return false;
        };

        let Some(account_id) = TokenStore::<S>::decode_account_id(&token) else {
            tracing::warn!("Stored token has no decodable account identifier");
            self.teardown_locked().await;
            return false;
        };

        let Some(email) = self.store.account_email().await else {
            self.teardown_locked().await;
            return false;
        };

        self.transport.set_credential_header(Some(&token));
        self.publish_authenticated(AccountSummary {
            id: account_id,
            email,
            first_name: None,
            last_name: None,
        });

        tracing::info!("Session restored from storage");
        true
    }

    /// Write-through commit of a successful outcome. Caller must hold
    /// the mutation lock and have checked `issued_token()`.
    ///
    /// `account_identifier` is the email the caller authenticated with;
    /// it backfills whatever the response body and token leave out, so a
    /// server issuing opaque tokens still commits cleanly.
    async fn commit_locked(&self, outcome: AuthOutcome, account_identifier: &str) -> AuthOutcome {
        let token = match outcome.issued_token() {
            Some(token) => token.to_string(),
            None => return outcome,
        };

        // Servers include expiresAt; fall back to the token's own claim.
        let expires_at = outcome
            .expires_at
            .or_else(|| auth::decode_unverified(&token).ok().and_then(|c| c.expires_at()));
        let Some(expires_at) = expires_at else {
            tracing::warn!("Authenticated response carried no usable expiry");
            return AuthOutcome::failure("Invalid response format");
        };

        let account = outcome.account.clone().unwrap_or_else(|| AccountSummary {
            id: TokenStore::<S>::decode_account_id(&token)
                .unwrap_or_else(|| account_identifier.to_string()),
            email: auth::extract_email(&token)
                .unwrap_or_else(|| account_identifier.to_string()),
            first_name: None,
            last_name: None,
        });

        // A session that cannot be persisted must not claim success.
        if let Err(e) = self.store.save(&token, expires_at, &account.email).await {
            tracing::error!(error = %e, "Failed to persist session");
            return AuthOutcome::failure("Failed to persist session");
        }

        self.transport.set_credential_header(Some(&token));
        self.publish_authenticated(account);

        outcome
    }

    async fn teardown_locked(&self) {
        self.store.clear().await;
        self.transport.set_credential_header(None);

        self.state_tx.send_if_modified(|state| {
            if !state.is_authenticated && state.current_account.is_none() {
                return false;
            }
            state.is_authenticated = false;
            state.current_account = None;
            true
        });
    }

    fn publish_authenticated(&self, account: AccountSummary) {
        self.state_tx.send_modify(|state| {
            state.is_authenticated = true;
            state.current_account = Some(account);
        });
    }
}
