/// Errors that can occur in the HTTP layer.
///
/// Note the split: a non-2xx *response* is not an `HttpError`. Status
/// handling belongs to the callers, because they disagree about what a
/// given status means (`404` on `/profile` is "no profile yet", `404`
/// anywhere else is a failure). This enum only covers not getting a
/// usable response at all.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The request could not be sent or the response could not be read.
    #[cfg(feature = "reqwest")]
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend could not be reached. Produced by the mock backend
    /// when simulating network failure, and by embedders wrapping other
    /// transports.
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// The response body was not the JSON shape the caller expected.
    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),
}
