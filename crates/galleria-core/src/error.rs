//! Error types for the pagination core.

use thiserror::Error;

/// Errors surfaced at the fetch boundary.
///
/// Every variant is recoverable: the controller returns to idle, the
/// previously displayed page stays visible, and a subsequent page change or
/// retry may succeed. Retrying is never automatic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network or HTTP failure while talking to the upstream server.
    #[error("transport failure: {message}")]
    Transport { message: String },

    /// The upstream server rejected the request with HTTP 429.
    #[error("rate limited by the upstream server")]
    RateLimited,

    /// The response body could not be normalized into a page.
    #[error("malformed response: {message}")]
    Parse { message: String },

    /// The request parameters violate the page invariants.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}
