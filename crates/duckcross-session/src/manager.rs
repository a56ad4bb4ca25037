//! The session manager: owns the credential and drives its lifecycle.
//!
//! This is the central piece of the auth layer. It's responsible for:
//! - Exchanging email/password for an access token (login)
//! - Persisting the credential so a restart doesn't log the user out
//! - Validating a restored credential against the backend (refresh)
//! - Clearing everything on logout or rejection
//! - Deriving the [`AuthHeader`] every authorized request carries
//!
//! # Concurrency note
//!
//! `SessionManager` is a single-owner store: every mutator takes
//! `&mut self`, so one logical task drives it and overlapping calls to
//! the same operation cannot interleave. Embedders that share it across
//! tasks put it behind a mutex at a higher level. That single-writer
//! discipline is also what makes the persisted credential safe without
//! locking — each writer computes the full record from the state it just
//! established and overwrites in one call (see the store module).

use duckcross_api::{LoginResponse, RefreshResponse, UserId};
use duckcross_http::{ApiRequest, Backend};

use crate::{
    AuthError, AuthHeader, CredentialStore, SessionState, StoredCredential,
};

/// Manages the user's session.
///
/// ## Lifecycle
///
/// ```text
/// login() ────────────→ [Authenticated] ──(logout)──→ [Anonymous]
///                            ↑      │
/// restore_from_storage() ────┘      │ (refresh rejected)
///   (optimistic, then refresh)      ↓
///                               [Expired] ──(login)──→ [Authenticated]
/// ```
///
/// Generic over the HTTP seam (`B`) and the persistence seam (`S`), so
/// tests drive it with a scripted backend and an in-memory store while
/// production wires reqwest and the credential file.
pub struct SessionManager<B: Backend, S: CredentialStore> {
    backend: B,
    store: S,
    state: SessionState,
    user_id: Option<UserId>,
    access_token: Option<String>,
    /// Most recent absorbed refresh failure, for observers. Cleared by
    /// a successful refresh and by logout.
    last_refresh_error: Option<AuthError>,
}

impl<B: Backend, S: CredentialStore> SessionManager<B, S> {
    /// Creates a manager with no session loaded.
    pub fn new(backend: B, store: S) -> Self {
        Self {
            backend,
            store,
            state: SessionState::Anonymous,
            user_id: None,
            access_token: None,
            last_refresh_error: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// `true` iff the credential is present and was accepted by the
    /// last validation attempt.
    pub fn authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// The logged-in user's id, if known.
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Most recent absorbed refresh failure, if any.
    pub fn last_refresh_error(&self) -> Option<&AuthError> {
        self.last_refresh_error.as_ref()
    }

    /// Derives the authorization header from the current credential.
    ///
    /// Pure read of in-memory state — no storage, no network, no
    /// blocking. Anonymous (and freshly expired) sessions yield the
    /// empty header set; a credential awaiting validation still yields
    /// a bearer header, because requests racing a restore should carry
    /// the token we're about to validate rather than silently downgrade
    /// to anonymous.
    pub fn authorization_header(&self) -> AuthHeader {
        match &self.access_token {
            Some(token) => AuthHeader::bearer(token),
            None => AuthHeader::anonymous(),
        }
    }

    /// Exchanges email/password for a session.
    ///
    /// On success the credential is persisted durably and the session is
    /// `Authenticated`. On a rejected login the session returns to the
    /// exact state it was in before the call (`Anonymous` or `Expired`).
    ///
    /// # Errors
    /// - [`AuthError::InvalidCredentials`] — the backend said no
    /// - [`AuthError::Transport`] — no usable response
    /// - [`AuthError::Storage`] — the session is live in memory but
    ///   could not be persisted; a restart will require a fresh login
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let prior = self.state;
        self.state = SessionState::Authenticating;

        let request = ApiRequest::post("/auth/login").json(serde_json::json!({
            "email": email,
            "password": password,
        }));

        let response = match self.backend.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                self.state = prior;
                return Err(e.into());
            }
        };

        if !response.is_success() {
            tracing::debug!(status = response.status, "login rejected");
            self.state = prior;
            return Err(AuthError::InvalidCredentials);
        }

        let body: LoginResponse = match response.json() {
            Ok(body) => body,
            Err(e) => {
                self.state = prior;
                return Err(e.into());
            }
        };

        self.access_token = Some(body.access_token.clone());
        self.user_id = Some(body.id);
        self.state = SessionState::Authenticated;
        self.last_refresh_error = None;
        tracing::info!(user_id = %body.id, "logged in");

        self.store.save(&StoredCredential {
            access_token: body.access_token,
            user_id: self.user_id,
        })?;
        Ok(())
    }

    /// Ends the session.
    ///
    /// The remote invalidation is best-effort: a network failure or a
    /// non-2xx response is logged and swallowed, because the user is
    /// logging out either way. The local credential is always cleared.
    ///
    /// # Errors
    /// [`AuthError::Storage`] if the persisted credential could not be
    /// removed — the in-memory session is still `Anonymous` then.
    pub async fn logout(&mut self) -> Result<(), AuthError> {
        let request = ApiRequest::post("/auth/logout")
            .authorization(self.authorization_header().into_value());

        match self.backend.execute(request).await {
            Ok(response) if !response.is_success() => {
                tracing::debug!(
                    status = response.status,
                    "logout rejected by backend; clearing locally anyway"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    "logout request failed; clearing locally anyway"
                );
            }
        }

        self.access_token = None;
        self.user_id = None;
        self.last_refresh_error = None;
        self.state = SessionState::Anonymous;
        self.store.clear()?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Asks the backend for a fresh access token.
    ///
    /// The refresh endpoint authenticates via the HTTP-only session
    /// cookie (carried by the backend implementation), not via the
    /// bearer token. Returns `true` when the session ends up
    /// `Authenticated`, `false` otherwise.
    ///
    /// With no credential loaded this is an immediate `false` — no
    /// network round-trip, no state change. A rejected refresh clears
    /// the credential (memory and disk) and moves to `Expired`; the
    /// failure is recorded on [`last_refresh_error`](Self::last_refresh_error)
    /// rather than returned, since refresh runs on background paths.
    pub async fn refresh(&mut self) -> bool {
        if self.access_token.is_none() {
            tracing::debug!("refresh skipped: no credential loaded");
            return false;
        }

        self.state = SessionState::Refreshing;

        let outcome = match self
            .backend
            .execute(ApiRequest::post("/auth/refresh"))
            .await
        {
            Ok(response) if response.is_success() => response
                .json::<RefreshResponse>()
                .map_err(|e| e.to_string()),
            Ok(response) => Err(format!("status {}", response.status)),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(body) => {
                self.access_token = Some(body.access_token.clone());
                if let Err(e) = self.store.save(&StoredCredential {
                    access_token: body.access_token,
                    user_id: self.user_id,
                }) {
                    tracing::warn!(
                        error = %e,
                        "failed to persist refreshed credential"
                    );
                }
                self.state = SessionState::Authenticated;
                self.last_refresh_error = None;
                tracing::debug!("session refreshed");
                true
            }
            Err(reason) => {
                self.access_token = None;
                self.user_id = None;
                self.state = SessionState::Expired;
                if let Err(e) = self.store.clear() {
                    tracing::warn!(
                        error = %e,
                        "failed to clear rejected credential"
                    );
                }
                tracing::info!(
                    %reason,
                    "refresh rejected; credential cleared"
                );
                self.last_refresh_error =
                    Some(AuthError::RefreshFailed(reason));
                false
            }
        }
    }

    /// Restores a persisted session from storage, if one exists.
    ///
    /// A stored credential is loaded optimistically (`Authenticated`,
    /// header available) and then immediately validated with a
    /// [`refresh`](Self::refresh) round-trip — a structurally valid but
    /// stale token must never be trusted as-is. Returns the final
    /// authenticated outcome.
    ///
    /// A missing credential file leaves the session `Anonymous`; an
    /// unreadable one is treated the same and logged.
    pub async fn restore_from_storage(&mut self) -> bool {
        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "could not read persisted credential"
                );
                None
            }
        };

        let Some(credential) = stored else {
            tracing::debug!("no persisted credential");
            return false;
        };

        self.access_token = Some(credential.access_token);
        self.user_id = credential.user_id;
        self.state = SessionState::Authenticated;
        tracing::debug!(
            user_id = ?self.user_id,
            "restored persisted credential; validating"
        );

        self.refresh().await
    }
}

// =========================================================================
// Tests
// =========================================================================
