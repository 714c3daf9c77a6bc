//! Fetch error types.

/// Errors from fetching a JSON document.
///
/// `NotFound` is the only variant callers are expected to branch on: it
/// drives the `zarr.json` -> `.zattrs` fallback. Every other variant is
/// surfaced as-is and never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The origin answered 404.
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Transport failure (DNS, connect, TLS, timeout, CORS-equivalent).
    #[error("network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    /// The origin answered with a non-2xx status other than 404.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body was not valid JSON.
    #[error("invalid JSON from {url}: {reason}")]
    InvalidJson { url: String, reason: String },

    /// The HTTP client could not be constructed, or the request could
    /// not be formed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl FetchError {
    /// True for [`FetchError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The URL the failure relates to, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::NotFound { url }
            | Self::Network { url, .. }
            | Self::Status { url, .. }
            | Self::InvalidJson { url, .. } => Some(url),
            Self::Client(_) => None,
        }
    }
}
