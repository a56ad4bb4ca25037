//! Access gate for protected Duckcross dashboard routes.
//!
//! The gate is a per-request admission check meant to run at the edge,
//! in front of the dashboard shell: given an incoming request and the
//! session cookie it carried, either let it through or redirect it to
//! the anonymous landing route.
//!
//! It is deliberately dumb and side-effect free:
//!
//! - It does **not** mint, store, or rotate any credential — it only
//!   forwards the request's own `Cookie` header to the backend's
//!   refresh endpoint and looks at the status code.
//! - It holds no mutable state; [`AccessGate::check`] is a pure
//!   function of the request plus one network round-trip.
//! - Any outcome that isn't a confirmed-valid session — a rejection,
//!   a timeout, an unreachable validator — is a redirect. Fail closed.
//!
//! # Local development
//!
//! Browsers won't attach the production-domain cookie to requests
//! hitting `localhost`, which would make every protected route redirect
//! during development. The documented escape hatch: requests whose
//! **host** is on the bypass list skip validation entirely. The check
//! is on the request host at runtime, never a compile-time flag, so the
//! same binary serves development and production; a deployed host never
//! matches `localhost`/`127.0.0.1`.

mod error;

pub use error::GateError;

use duckcross_http::{ApiRequest, Backend};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Routing configuration for the gate.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Path prefixes that require a valid session. A prefix matches
    /// itself and everything nested under it (`/dash`, `/dash/lines`),
    /// but not mere string extensions (`/dashboard`).
    pub protected_prefixes: Vec<String>,
    /// Where unauthenticated requests are redirected.
    pub landing: String,
    /// Hosts that bypass validation entirely (local development only).
    pub bypass_hosts: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: vec!["/dash".to_string()],
            landing: "/".to_string(),
            bypass_hosts: vec![
                "localhost".to_string(),
                "127.0.0.1".to_string(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Request / decision
// ---------------------------------------------------------------------------

/// The slice of an incoming request the gate looks at.
#[derive(Debug, Clone)]
pub struct GateRequest {
    /// Request host, with or without a port (`app.duckcross.com`,
    /// `localhost:3000`).
    pub host: String,
    /// Request path (`/dash/stations`).
    pub path: String,
    /// The raw `Cookie` header, if the request carried one.
    pub cookie: Option<String>,
}

impl GateRequest {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            cookie: None,
        }
    }

    /// Attaches the request's `Cookie` header.
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }
}

/// The gate's verdict for one request.
#[derive(Debug)]
pub enum GateDecision {
    /// Let the request through.
    Allow,
    /// Send the client to `location` instead. `cause` is set when the
    /// redirect came from a validation transport failure rather than a
    /// plain rejection.
    Redirect {
        location: String,
        cause: Option<GateError>,
    },
}

impl GateDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

// ---------------------------------------------------------------------------
// AccessGate
// ---------------------------------------------------------------------------

/// The admission check. One instance serves all requests.
pub struct AccessGate<B: Backend> {
    backend: B,
    config: GateConfig,
}

impl<B: Backend> AccessGate<B> {
    /// A gate with the default routing table.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, GateConfig::default())
    }

    /// A gate with explicit routing.
    pub fn with_config(backend: B, config: GateConfig) -> Self {
        Self { backend, config }
    }

    /// Decides whether `request` may proceed.
    ///
    /// Total: every failure mode folds into
    /// [`GateDecision::Redirect`]. For protected paths the session
    /// cookie is validated remotely with a bodyless POST; everything
    /// else passes through untouched.
    pub async fn check(&self, request: &GateRequest) -> GateDecision {
        if !self.is_protected(&request.path) {
            return GateDecision::Allow;
        }

        if self.is_bypass_host(&request.host) {
            tracing::debug!(
                host = %request.host,
                "development host bypasses session validation"
            );
            return GateDecision::Allow;
        }

        match self.validate(request.cookie.as_deref()).await {
            Ok(true) => GateDecision::Allow,
            Ok(false) => {
                tracing::debug!(
                    path = %request.path,
                    "session rejected; redirecting"
                );
                self.redirect(None)
            }
            Err(e) => {
                tracing::warn!(
                    path = %request.path,
                    error = %e,
                    "session validation unreachable; redirecting"
                );
                self.redirect(Some(e))
            }
        }
    }

    fn redirect(&self, cause: Option<GateError>) -> GateDecision {
        GateDecision::Redirect {
            location: self.config.landing.clone(),
            cause,
        }
    }

    /// Forwards the cookie to the refresh endpoint. `Ok(true)` means
    /// the backend accepted the session.
    async fn validate(
        &self,
        cookie: Option<&str>,
    ) -> Result<bool, GateError> {
        let mut request = ApiRequest::post("/auth/refresh");
        if let Some(cookie) = cookie {
            request = request.cookie(cookie);
        }

        let response = self
            .backend
            .execute(request)
            .await
            .map_err(|e| GateError::ValidationUnreachable(e.to_string()))?;
        Ok(response.is_success())
    }

    fn is_protected(&self, path: &str) -> bool {
        self.config.protected_prefixes.iter().any(|prefix| {
            path == prefix
                || path.starts_with(&format!("{prefix}/"))
        })
    }

    fn is_bypass_host(&self, host: &str) -> bool {
        // The bypass list holds hostnames; compare without the port so
        // `localhost:3000` matches `localhost`.
        let hostname = host.split(':').next().unwrap_or(host);
        self.config
            .bypass_hosts
            .iter()
            .any(|bypass| bypass.eq_ignore_ascii_case(hostname))
    }
}

// =========================================================================
// Tests
// =========================================================================
