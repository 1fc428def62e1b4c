//! Error types for the `domain` layer.
use platform_auth::error::{Error as PlatformAuthError, ErrorKind as PlatformAuthErrorKind};
use platform_auth::signal::ApiErrorBody;
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the domain layer are modeled as a tree with
/// `domain::error::Error` as the root holding `error_kind` enums for the
/// kinds of errors that can occur here or in lower layers. The `source`
/// field keeps the original error for chaining. Lower-layer errors
/// (`platform-auth`, `agents`) are translated at this boundary so the view
/// layer only ever matches on domain kinds.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Errors originating inside the client process.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    /// A required input was missing or malformed; nothing was sent.
    Validation(String),
    Config,
    Storage,
    Other(String),
}

/// Errors originating from the backend or the network.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    /// Structured error answer from the backend.
    Api(ApiErrorBody),
    /// The session bearer token was missing or rejected.
    Unauthenticated,
    /// The account exists but has no active subscription for this feature.
    SubscriptionRequired,
    /// The platform connection is absent or beyond recovery.
    NotConnected,
    Other(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Validation(message.into())),
        }
    }

    pub fn unauthenticated() -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Unauthenticated),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself.
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        }
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(err: reqwest_middleware::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
        }
    }
}

// This is where we translate errors from the `agents` layer to the `domain` layer.
impl From<agents::Error> for Error {
    fn from(err: agents::Error) -> Self {
        let error_kind = match &err {
            agents::Error::Api { body, .. } => {
                DomainErrorKind::External(ExternalErrorKind::Api(body.clone()))
            }
            agents::Error::Network(_) => DomainErrorKind::External(ExternalErrorKind::Network),
            agents::Error::Validation(msg) => {
                DomainErrorKind::Internal(InternalErrorKind::Validation(msg.clone()))
            }
            agents::Error::NotConnected(_) => {
                DomainErrorKind::External(ExternalErrorKind::NotConnected)
            }
            agents::Error::Deserialization(msg) => {
                DomainErrorKind::External(ExternalErrorKind::Other(msg.clone()))
            }
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<PlatformAuthError> for Error {
    fn from(err: PlatformAuthError) -> Self {
        let error_kind = match &err.error_kind {
            PlatformAuthErrorKind::Http(_) => DomainErrorKind::External(ExternalErrorKind::Network),
            PlatformAuthErrorKind::Storage(_) => {
                DomainErrorKind::Internal(InternalErrorKind::Storage)
            }
            PlatformAuthErrorKind::Token(_) => {
                DomainErrorKind::External(ExternalErrorKind::NotConnected)
            }
            PlatformAuthErrorKind::Callback(_) => DomainErrorKind::Internal(
                InternalErrorKind::Validation("unrecognized OAuth return".to_string()),
            ),
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}
