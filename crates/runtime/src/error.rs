//! Error types returned by the API client

use thiserror::Error;

/// Errors produced while talking to the provider API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...)
    #[error("request to {path} failed: {source}")]
    Transport {
        /// Request path
        path: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("{reason} ({code}, HTTP {status})")]
    Status {
        /// HTTP status code
        status: u16,
        /// Machine readable error code from the response body
        code: String,
        /// Human readable reason from the response body
        reason: String,
    },

    /// The server answered 404
    #[error("not found: {0}")]
    NotFound(String),

    /// A search by ID or name matched nothing
    #[error("unable to find {kind} `{search}`: zero matches")]
    ZeroMatches {
        /// Resource kind, e.g. "object store"
        kind: &'static str,
        /// Search term
        search: String,
    },

    /// A search by ID or name was ambiguous
    #[error("unable to find {kind} `{search}`: {count} matches, please be more specific")]
    MultipleMatches {
        /// Resource kind, e.g. "object store"
        kind: &'static str,
        /// Search term
        search: String,
        /// Number of candidates found
        count: usize,
    },

    /// The response body did not match the expected shape
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        /// Request path
        path: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}
