//! Production backend implementation using `reqwest`.

use duckcross_api::API_PREFIX;
use reqwest::header::{AUTHORIZATION, COOKIE};

use crate::{ApiRequest, ApiResponse, Backend, HttpError, Method};

/// A [`Backend`] that speaks real HTTP via a shared `reqwest::Client`.
///
/// Cheap to clone — `reqwest::Client` is an `Arc` around a connection
/// pool, and clones share the pool *and the cookie store*. That sharing
/// is load-bearing: `/auth/login` sets an HTTP-only session cookie that
/// `/auth/refresh` later relies on, so the session layer's clone and
/// everyone else's clone must see the same jar.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestBackend {
    /// Creates a backend rooted at `base_url` (scheme + host, no `/v1`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, HttpError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }
}

impl Backend for ReqwestBackend {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl std::future::Future<Output = Result<ApiResponse, HttpError>> + Send
    {
        let url = self.url(&request.path);
        let http = self.http.clone();

        async move {
            let mut builder = match request.method {
                Method::Get => http.get(&url),
                Method::Post => http.post(&url),
                Method::Put => http.put(&url),
            };

            if let Some(authorization) = &request.authorization {
                builder = builder.header(AUTHORIZATION, authorization);
            }
            if let Some(cookie) = &request.cookie {
                builder = builder.header(COOKIE, cookie);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?.to_vec();

            tracing::trace!(
                method = %request.method,
                path = %request.path,
                status,
                bytes = body.len(),
                "request completed"
            );

            Ok(ApiResponse { status, body })
        }
    }
}
