//! Error taxonomy for furl operations.

use http::StatusCode;
use miette::Diagnostic;

/// Main error type for furl operations.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum Error {
    /// Credentials or refresh token rejected by the identity endpoint.
    /// Fatal for the current operation; the next caller re-attempts login.
    #[error("authentication rejected: {message}")]
    #[diagnostic(code(furl::auth))]
    Auth { message: String },

    /// Handle or post does not resolve upstream.
    #[error("{what} not found")]
    #[diagnostic(code(furl::not_found))]
    NotFound { what: String },

    /// Non-success status other than unauthorized/not-found, or a
    /// transport failure (including timeouts).
    #[error("upstream request failed: {message}")]
    #[diagnostic(code(furl::upstream))]
    Upstream {
        status: Option<StatusCode>,
        message: String,
    },

    /// Response body does not match the expected shape.
    #[error("malformed response from {context}")]
    #[diagnostic(code(furl::malformed_response))]
    MalformedResponse {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Input URL lacks the expected `profile/<handle>/post/<id>` structure.
    #[error("invalid post url {url:?}: {reason}")]
    #[diagnostic(code(furl::invalid_url))]
    InvalidUrl { url: String, reason: &'static str },

    /// An embed shape that could not be rendered even degraded.
    #[error("render failed: {0}")]
    #[diagnostic(code(furl::render))]
    Render(String),

    /// Chat API rejection; logged by the pipeline, never retried.
    #[error("slack api call failed: {0}")]
    #[diagnostic(code(furl::slack))]
    Slack(String),
}

impl Error {
    pub fn transport(err: reqwest::Error) -> Self {
        Error::Upstream {
            status: err.status(),
            message: err.to_string(),
        }
    }

    pub fn upstream_status(status: StatusCode, context: &str) -> Self {
        Error::Upstream {
            status: Some(status),
            message: format!("{context} returned {status}"),
        }
    }
}
