use thiserror::Error;

/// Failure modes of the version resolution layer
///
/// The three kinds carry enough context to render a diagnostic response and
/// stay distinguishable all the way to the routing layer, which maps them to
/// distinct HTTP status codes. One kind is never downgraded to another.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Upstream fetch returned a non-success status, or the transport itself
    /// failed (reported with a synthetic status, see [`ResolveError::from_transport`])
    #[error("upstream returned {code} {status}")]
    Upstream {
        code: u16,
        status: String,
        /// Raw response body, kept for diagnostics only and never parsed
        body: String,
    },

    /// Upstream response was retrievable but failed structural validation
    /// against the expected schema
    #[error("invalid upstream response: {0}")]
    Validation(String),

    /// A well-formed manifest contained no entry for the requested version id
    #[error("version not found: {0}")]
    NotFound(String),
}

impl ResolveError {
    /// Maps a transport-level failure (connect error, timeout) to an upstream
    /// error with a synthetic status: 504 for timeouts, 502 for the rest.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        let (code, status) = if err.is_timeout() {
            (504, "Gateway Timeout")
        } else {
            (502, "Bad Gateway")
        };

        ResolveError::Upstream {
            code,
            status: status.to_string(),
            body: err.to_string(),
        }
    }
}
