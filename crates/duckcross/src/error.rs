//! Unified error type for the Duckcross client.

use duckcross_cache::DataError;
use duckcross_gate::GateError;
use duckcross_http::HttpError;
use duckcross_profile::ProfileError;
use duckcross_session::AuthError;

/// Top-level error that wraps all layer-specific errors.
///
/// When using the `duckcross` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate. The
/// `#[from]` attribute on each variant auto-generates `From` impls, so
/// the `?` operator converts layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum DuckcrossError {
    /// A session-layer error (login, logout, credential storage).
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A profile-layer error (load, save).
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// A station-data error (rate limit, fetch).
    #[error(transparent)]
    Data(#[from] DataError),

    /// A gate-layer error (validation transport).
    #[error(transparent)]
    Gate(#[from] GateError),

    /// An HTTP-layer error surfaced directly (backend construction).
    #[error(transparent)]
    Http(#[from] HttpError),
}
