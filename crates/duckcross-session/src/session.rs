//! Session types: lifecycle states and the derived authorization header.

use std::fmt;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The current state of the user's session.
///
/// This is a state machine with five states:
///
/// ```text
///                    ┌──(login ok)──────────────→ Authenticated
///   Anonymous ──→ Authenticating                       │    ↑
///       ↑            └──(login fails: back to prior)   │    │ (refresh ok)
///       │                                       (refresh)   │
///       │                                              ↓    │
///       └──────────(logout)──────── Expired ←── Refreshing ─┘
///                                      ↑        (refresh fails:
///                                      └────────  credential cleared)
/// ```
///
/// - **Anonymous**: no credential. Initial state, and the state after
///   logout.
/// - **Authenticating**: a login request is in flight.
/// - **Authenticated**: the credential was accepted by the last
///   validation attempt (login or refresh).
/// - **Refreshing**: a refresh request is in flight. Entered from any
///   state that has a credential loaded.
/// - **Expired**: the backend rejected the credential. The persisted
///   copy has been cleared; only a fresh login leaves this state.
///
/// The transient states exist so that observers (a spinner, a log line)
/// can tell "waiting on the network" apart from a settled outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated,
    Refreshing,
    Expired,
}

impl SessionState {
    /// Returns `true` only for the settled, validated state.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }

    /// Returns `true` while a network round-trip is pending.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Authenticating | Self::Refreshing)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Authenticating => f.write_str("Authenticating"),
            Self::Authenticated => f.write_str("Authenticated"),
            Self::Refreshing => f.write_str("Refreshing"),
            Self::Expired => f.write_str("Expired"),
        }
    }
}

// ---------------------------------------------------------------------------
// AuthHeader
// ---------------------------------------------------------------------------

/// The authorization credential in the only form other layers may see.
///
/// The session manager owns the raw access token; consumers (profile
/// store, embedders) receive this derived value instead. Deriving it is
/// a pure read of in-memory state — never storage, never the network —
/// so it is safe to call on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthHeader(Option<String>);

impl AuthHeader {
    /// The empty header set: no Authorization header is sent.
    pub fn anonymous() -> Self {
        Self(None)
    }

    /// A bearer-style header for the given access token.
    pub fn bearer(token: &str) -> Self {
        Self(Some(format!("Bearer {token}")))
    }

    /// The full header value (`"Bearer <token>"`), if any.
    pub fn value(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Consumes the header into the form [`duckcross_http::ApiRequest`]
    /// carries.
    pub fn into_value(self) -> Option<String> {
        self.0
    }

    /// `true` when no credential is available.
    pub fn is_anonymous(&self) -> bool {
        self.0.is_none()
    }
}
