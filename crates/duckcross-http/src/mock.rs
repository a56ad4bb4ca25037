//! Scripted backend for tests.
//!
//! Every stateful layer in this workspace has invariants about what
//! happens when the network misbehaves — rollback exactness, stale-data
//! retention, credential clearing. Those are exercised here by scripting
//! responses in advance and inspecting the requests afterwards, instead
//! of standing up a real server.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::{ApiRequest, ApiResponse, Backend, HttpError};

/// One scripted outcome: a canned response or a simulated network failure.
#[derive(Debug, Clone)]
enum Scripted {
    Respond { status: u16, body: Vec<u8> },
    Fail(String),
}

#[derive(Debug, Default)]
struct MockInner {
    /// One-shot outcomes, consumed front to back.
    script: Mutex<VecDeque<Scripted>>,
    /// Outcome replayed once the script is exhausted (for loops that
    /// fetch an unbounded number of times).
    fallback: Mutex<Option<Scripted>>,
    /// Every request the backend has seen, in order.
    requests: Mutex<Vec<ApiRequest>>,
}

/// A scripted [`Backend`].
///
/// Clones share the script and the request log, same as
/// [`ReqwestBackend`](crate::ReqwestBackend) clones share a connection
/// pool — a test hands one clone to the store under test and keeps
/// another for assertions.
///
/// An unscripted request (script empty, no fallback) fails with
/// [`HttpError::Unreachable`] rather than panicking, so it surfaces
/// through the store's own error path and the test can assert on it.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    inner: Arc<MockInner>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a JSON response.
    pub fn respond(&self, status: u16, body: serde_json::Value) -> &Self {
        self.push(Scripted::Respond {
            status,
            body: serde_json::to_vec(&body).expect("mock body serializes"),
        })
    }

    /// Queues a response with a raw (possibly non-JSON) body.
    pub fn respond_raw(&self, status: u16, body: &[u8]) -> &Self {
        self.push(Scripted::Respond {
            status,
            body: body.to_vec(),
        })
    }

    /// Queues a simulated network failure.
    pub fn fail(&self, message: &str) -> &Self {
        self.push(Scripted::Fail(message.to_string()))
    }

    /// Sets the outcome replayed after the script runs out.
    pub fn always(&self, status: u16, body: serde_json::Value) -> &Self {
        *self.inner.fallback.lock().unwrap() = Some(Scripted::Respond {
            status,
            body: serde_json::to_vec(&body).expect("mock body serializes"),
        });
        self
    }

    /// All requests seen so far, in arrival order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    /// Number of requests seen so far.
    pub fn request_count(&self) -> usize {
        self.inner.requests.lock().unwrap().len()
    }

    fn push(&self, outcome: Scripted) -> &Self {
        self.inner.script.lock().unwrap().push_back(outcome);
        self
    }

    fn next_outcome(&self) -> Scripted {
        if let Some(outcome) = self.inner.script.lock().unwrap().pop_front() {
            return outcome;
        }
        if let Some(outcome) = self.inner.fallback.lock().unwrap().clone() {
            return outcome;
        }
        Scripted::Fail("no scripted response".to_string())
    }
}

impl Backend for MockBackend {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl std::future::Future<Output = Result<ApiResponse, HttpError>> + Send
    {
        self.inner.requests.lock().unwrap().push(request);
        let outcome = self.next_outcome();

        async move {
            match outcome {
                Scripted::Respond { status, body } => {
                    Ok(ApiResponse { status, body })
                }
                Scripted::Fail(message) => {
                    Err(HttpError::Unreachable(message))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Method;

    #[tokio::test]
    async fn test_scripted_responses_consumed_in_order() {
        let mock = MockBackend::new();
        mock.respond(200, serde_json::json!({ "n": 1 }));
        mock.respond(404, serde_json::json!({ "n": 2 }));

        let first = mock.execute(ApiRequest::get("/data")).await.unwrap();
        let second = mock.execute(ApiRequest::get("/data")).await.unwrap();

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 404);
    }

    #[tokio::test]
    async fn test_fallback_replays_after_script_exhausted() {
        let mock = MockBackend::new();
        mock.always(200, serde_json::json!([]));

        for _ in 0..3 {
            let resp = mock.execute(ApiRequest::get("/data")).await.unwrap();
            assert_eq!(resp.status, 200);
        }
        assert_eq!(mock.request_count(), 3);
    }

    #[tokio::test]
    async fn test_unscripted_request_is_unreachable() {
        let mock = MockBackend::new();
        let result = mock.execute(ApiRequest::get("/data")).await;
        assert!(matches!(result, Err(HttpError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_fail_simulates_network_failure() {
        let mock = MockBackend::new();
        mock.fail("connection reset");

        let result = mock.execute(ApiRequest::post("/auth/refresh")).await;
        match result {
            Err(HttpError::Unreachable(msg)) => {
                assert_eq!(msg, "connection reset");
            }
            other => panic!("expected Unreachable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_requests_are_recorded_with_headers() {
        let mock = MockBackend::new();
        mock.respond(200, serde_json::json!({}));

        mock.execute(
            ApiRequest::get("/profile")
                .authorization(Some("Bearer tok1".into())),
        )
        .await
        .unwrap();

        let seen = mock.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, Method::Get);
        assert_eq!(seen[0].path, "/profile");
        assert_eq!(seen[0].authorization.as_deref(), Some("Bearer tok1"));
    }

    #[tokio::test]
    async fn test_clones_share_script_and_log() {
        let mock = MockBackend::new();
        let handle = mock.clone();
        mock.respond(200, serde_json::json!({}));

        handle.execute(ApiRequest::get("/data")).await.unwrap();

        assert_eq!(mock.request_count(), 1);
    }
}
