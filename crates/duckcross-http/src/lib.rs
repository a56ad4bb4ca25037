//! HTTP backend abstraction for the Duckcross client.
//!
//! Provides the [`Backend`] trait that the session, profile, cache, and
//! gate layers all talk through, plus two implementations:
//!
//! - [`ReqwestBackend`] (feature `reqwest`, default) — the production
//!   backend, with a cookie store so the HTTP-only session cookie set by
//!   `/auth/login` is replayed on `/auth/refresh`.
//! - [`MockBackend`] (feature `mock`) — a scripted backend for tests:
//!   queue responses, simulate network failure, inspect every request.
//!
//! # Why a trait here?
//!
//! The stateful layers above are where the interesting invariants live
//! (rollback exactness, cooldown atomicity, credential lifecycle), and
//! none of those are testable against a live server. The trait is the
//! seam that lets every store run against scripted responses while the
//! production wiring stays a one-liner.

mod error;
#[cfg(feature = "reqwest")]
mod client;
#[cfg(feature = "mock")]
mod mock;

pub use error::HttpError;
#[cfg(feature = "reqwest")]
pub use client::ReqwestBackend;
#[cfg(feature = "mock")]
pub use mock::MockBackend;

use std::fmt;

use serde::de::DeserializeOwned;

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// HTTP method of an [`ApiRequest`]. The `/v1` contract only uses these
/// three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
            Self::Put => f.write_str("PUT"),
        }
    }
}

/// A request to the backend, one step above raw HTTP.
///
/// `path` is relative to the versioned prefix (`"/auth/login"`, not
/// `"https://…/v1/auth/login"`); the backend implementation owns base
/// URL and prefix. Headers are limited to the two the contract needs:
/// a bearer-style Authorization value and a forwarded Cookie header
/// (used by the access gate, which validates someone else's cookie,
/// not its own).
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// Full Authorization header value (`"Bearer <token>"`), if any.
    pub authorization: Option<String>,
    /// Raw Cookie header to forward verbatim, if any.
    pub cookie: Option<String>,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            authorization: None,
            cookie: None,
            body: None,
        }
    }

    /// A bodyless GET.
    pub fn get(path: &str) -> Self {
        Self::new(Method::Get, path)
    }

    /// A POST; attach a body with [`json`](Self::json) if needed.
    pub fn post(path: &str) -> Self {
        Self::new(Method::Post, path)
    }

    /// A PUT; attach a body with [`json`](Self::json).
    pub fn put(path: &str) -> Self {
        Self::new(Method::Put, path)
    }

    /// Sets the Authorization header value. `None` leaves the request
    /// anonymous, so callers can pass a derived header through unchanged.
    pub fn authorization(mut self, value: Option<String>) -> Self {
        self.authorization = value;
        self
    }

    /// Forwards a raw Cookie header with the request.
    pub fn cookie(mut self, value: impl Into<String>) -> Self {
        self.cookie = Some(value.into());
        self
    }

    /// Attaches a JSON body.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A response from the backend: status plus raw body bytes.
///
/// Decoding is deferred to the caller ([`json`](Self::json)) because the
/// expected shape depends on the status — error bodies are free-form.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body).map_err(HttpError::Decode)
    }

    /// The body as (lossy) text, for error messages and logs.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// Executes requests against the Duckcross backend.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` → a backend is shared across async tasks
///   (the cache's refresh loop runs in its own task).
/// - The returned future is explicitly `+ Send` so generic callers can
///   be spawned onto the runtime; an `async fn` in the trait would hide
///   that bound.
///
/// Implementations return `Err` only when no usable response was
/// obtained; a non-2xx response is an `Ok(ApiResponse)` and its meaning
/// is the caller's business.
pub trait Backend: Send + Sync + 'static {
    /// Executes a single request.
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl std::future::Future<Output = Result<ApiResponse, HttpError>> + Send;
}
