//! Error types for the session layer.

use duckcross_http::HttpError;

use crate::StoreError;

/// Errors that can occur during session management.
///
/// Only the foreground paths (login, logout's storage step) return
/// these. Background outcomes — a refresh the backend rejected — are
/// absorbed into session state instead, and the failure stays
/// inspectable through the manager's `last_refresh_error` accessor.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The backend rejected the email/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The backend rejected a refresh attempt, or the refresh response
    /// was unusable. Recorded on the manager, never returned.
    #[error("session refresh failed: {0}")]
    RefreshFailed(String),

    /// The login or logout request could not complete at the HTTP level.
    #[error("auth request failed: {0}")]
    Transport(#[from] HttpError),

    /// Reading or writing the persisted credential failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}
