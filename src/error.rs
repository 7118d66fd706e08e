//! Failure taxonomy for a single live source.
//!
//! Every variant is caught at the source boundary by the fallback
//! orchestrator and moves it on to the next source. None of them ever
//! reaches the consumer.

use reqwest::StatusCode;
use thiserror::Error;

/// Why one source could not produce a normalized value.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SourceError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// HTTP 401 from the provider.
    #[error("unauthorized (401) for {url}")]
    Unauthorized { url: String },

    /// HTTP 429 from the provider.
    #[error("rate limited (429) for {url}")]
    RateLimited { url: String },

    /// HTTP 404 from the provider.
    #[error("not found (404) for {url}")]
    NotFound { url: String },

    /// Any other non-2xx status.
    #[error("unexpected status {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    /// The body was not the JSON shape the normalizer expects.
    #[error("malformed payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field the normalizer needs was missing or unusable.
    #[error("missing field: {0}")]
    Shape(String),

    /// The payload parsed but yielded nothing usable.
    #[error("no usable records: {0}")]
    Empty(&'static str),
}

impl SourceError {
    /// Classifies a non-success status code.
    pub fn from_status(status: StatusCode, url: &str) -> Self {
        let url = url.to_string();
        match status {
            StatusCode::UNAUTHORIZED => SourceError::Unauthorized { url },
            StatusCode::TOO_MANY_REQUESTS => SourceError::RateLimited { url },
            StatusCode::NOT_FOUND => SourceError::NotFound { url },
            status => SourceError::Status { status, url },
        }
    }

    /// Short category used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Transport(_) | SourceError::Status { .. } | SourceError::NotFound { .. } => {
                "transport"
            }
            SourceError::Unauthorized { .. } => "auth",
            SourceError::RateLimited { .. } => "rate_limit",
            SourceError::InvalidUrl(_) | SourceError::Parse(_) | SourceError::Shape(_) => "parse",
            SourceError::Empty(_) => "empty",
        }
    }

    /// Human-readable message for operators.
    ///
    /// Auth and rate-limit failures get their own wording so that a missing
    /// key is not mistaken for a provider outage. Control flow does not
    /// depend on this.
    pub fn operator_message(&self) -> String {
        match self {
            SourceError::Unauthorized { .. } => {
                "Invalid API key, check the provider credentials in the configuration".to_string()
            }
            SourceError::RateLimited { .. } => {
                "API rate limit exceeded, try again later".to_string()
            }
            SourceError::NotFound { .. } => "No data found for this location".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let url = "https://example.test/weather";
        assert!(matches!(
            SourceError::from_status(StatusCode::UNAUTHORIZED, url),
            SourceError::Unauthorized { .. }
        ));
        assert!(matches!(
            SourceError::from_status(StatusCode::TOO_MANY_REQUESTS, url),
            SourceError::RateLimited { .. }
        ));
        assert!(matches!(
            SourceError::from_status(StatusCode::NOT_FOUND, url),
            SourceError::NotFound { .. }
        ));
        assert!(matches!(
            SourceError::from_status(StatusCode::BAD_GATEWAY, url),
            SourceError::Status { .. }
        ));
    }

    #[test]
    fn test_auth_and_rate_limit_have_distinct_messages() {
        let auth = SourceError::Unauthorized { url: "u".into() };
        let limited = SourceError::RateLimited { url: "u".into() };

        assert_eq!(auth.kind(), "auth");
        assert_eq!(limited.kind(), "rate_limit");
        assert_ne!(auth.operator_message(), limited.operator_message());
        assert!(auth.operator_message().contains("API key"));
    }

    #[test]
    fn test_empty_kind() {
        assert_eq!(SourceError::Empty("flights").kind(), "empty");
        assert_eq!(SourceError::Shape("weather[0]".into()).kind(), "parse");
    }
}
