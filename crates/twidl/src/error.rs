//! Error types for link resolution and tweet extraction.

use serde::Serialize;
use thiserror::Error;

/// Result of one extraction request.
pub type Outcome = Result<crate::payload::MediaPayload, ExtractError>;

/// User-facing failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Empty or malformed input; the user should send a proper link.
    InvalidUrl,
    /// Upstream confirmed the post does not exist (or is private).
    NotFound,
    /// Anything else upstream; retryable by the user.
    UpstreamError,
}

impl FailureKind {
    /// Get the wire name for this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_url",
            Self::NotFound => "not_found",
            Self::UpstreamError => "upstream_error",
        }
    }
}

/// Errors that can occur while resolving a link or extracting a tweet.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Input string was empty
    #[error("the url cannot be empty")]
    EmptyInput,

    /// Input did not contain a post path
    #[error("the url is not a valid post url")]
    InvalidUrl,

    /// Syndication endpoint answered 404
    #[error("post is not found. It may have been deleted or made private.")]
    NotFound,

    /// Syndication endpoint answered with any other non-200 status
    #[error("{reason}")]
    Upstream { status: u16, reason: String },

    /// Request failed before a response arrived (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Response decoded but a required field was missing or mistyped
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl ExtractError {
    /// Category this error is reported under.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::EmptyInput | Self::InvalidUrl => FailureKind::InvalidUrl,
            Self::NotFound => FailureKind::NotFound,
            Self::Upstream { .. }
            | Self::Network(_)
            | Self::UnexpectedShape(_)
            | Self::Client(_) => FailureKind::UpstreamError,
        }
    }

    /// HTTP status associated with the failure, when one exists.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound => Some(404),
            Self::Upstream { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub(crate) fn missing(path: &str) -> Self {
        Self::UnexpectedShape(format!("missing `{path}`"))
    }
}

/// Errors raised by a delivery channel while sending a rendered payload.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport refused the message
    #[error("transport rejected message: {0}")]
    Rejected(String),

    /// Rate limited by the transport
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Other error
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(ExtractError::EmptyInput.kind(), FailureKind::InvalidUrl);
        assert_eq!(ExtractError::InvalidUrl.kind(), FailureKind::InvalidUrl);
        assert_eq!(ExtractError::NotFound.kind(), FailureKind::NotFound);
        assert_eq!(
            ExtractError::missing("video.variants").kind(),
            FailureKind::UpstreamError
        );
    }

    #[test]
    fn test_status_codes() {
        let err = ExtractError::Upstream {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.to_string(), "Service Unavailable");
        assert_eq!(ExtractError::NotFound.status_code(), Some(404));
        assert_eq!(ExtractError::InvalidUrl.status_code(), None);
    }

    #[tokio::test]
    async fn test_status_code_from_network_error() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let http_err = reqwest::get(server.uri())
            .await
            .unwrap()
            .error_for_status()
            .unwrap_err();
        let err = ExtractError::from(http_err);

        assert!(matches!(err, ExtractError::Network(_)));
        assert_eq!(err.status_code(), Some(502));
        assert_eq!(err.kind(), FailureKind::UpstreamError);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(FailureKind::InvalidUrl.as_str(), "invalid_url");
        assert_eq!(FailureKind::NotFound.as_str(), "not_found");
        assert_eq!(FailureKind::UpstreamError.as_str(), "upstream_error");
    }
}
