//! Error types for the access gate.

/// Errors that can occur while validating a session at the edge.
///
/// Never returned from [`AccessGate::check`](crate::AccessGate::check)
/// — the gate's contract is redirect-on-any-failure, so this is carried
/// on the decision as the cause, for logging.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The session-validation endpoint could not be reached. Treated
    /// exactly like a rejected session: the request is redirected.
    #[error("session validation unreachable: {0}")]
    ValidationUnreachable(String),
}
