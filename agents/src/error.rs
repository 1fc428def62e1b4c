//! Error types for agent operations.

use std::fmt;

use platform_auth::signal::ApiErrorBody;
use platform_auth::ProviderKind;

/// Universal error type that abstracts platform-specific failures into
/// common variants.
///
/// Gateway implementations map their raw responses into these variants so
/// the feature views and the retry machinery never inspect raw HTTP
/// results. The `Api` variant carries the structured body that
/// `platform_auth::signal::classify` consumes for token-failure detection.
#[derive(Debug)]
pub enum Error {
    /// The backend answered with a non-success status. The body keeps the
    /// platform's own error fields for classification and display.
    Api { status: u16, body: ApiErrorBody },

    /// Connectivity trouble: DNS, connect, timeout. Typically transient.
    Network(String),

    /// A required input was missing or malformed. Raised before any
    /// network call is made.
    Validation(String),

    /// The platform is not connected (no access token stored). The user
    /// must run the consent flow before this operation can work.
    NotConnected(ProviderKind),

    /// The response arrived but did not match the expected shape.
    Deserialization(String),
}

impl Error {
    /// Message suitable for user-facing display.
    pub fn display_message(&self) -> String {
        match self {
            Error::Api { status, body } => body
                .display_message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("request failed with status {}", status)),
            Error::Network(msg) => format!("network error: {}", msg),
            Error::Validation(msg) => msg.clone(),
            Error::NotConnected(provider) => {
                format!("{} is not connected; run the consent flow first", provider)
            }
            Error::Deserialization(msg) => format!("unexpected response: {}", msg),
        }
    }

    /// The structured API error body, when the failure carries one.
    pub fn api_body(&self) -> Option<&ApiErrorBody> {
        match self {
            Error::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Api { status, body } => {
                write!(f, "API error (status {}): {:?}", status, body)
            }
            Error::Network(msg) => write!(f, "Network error: {}", msg),
            Error::Validation(msg) => write!(f, "Validation error: {}", msg),
            Error::NotConnected(provider) => write!(f, "{} not connected", provider),
            Error::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_display_message_prefers_body() {
        let err = Error::Api {
            status: 401,
            body: ApiErrorBody {
                message: Some("Access token is expired.".to_string()),
                ..ApiErrorBody::default()
            },
        };
        assert_eq!(err.display_message(), "Access token is expired.");
    }

    #[test]
    fn test_api_display_message_falls_back_to_status() {
        let err = Error::Api {
            status: 502,
            body: ApiErrorBody::default(),
        };
        assert_eq!(err.display_message(), "request failed with status 502");
    }

    #[test]
    fn test_api_body_accessor() {
        let err = Error::Network("connection refused".to_string());
        assert!(err.api_body().is_none());
    }
}
