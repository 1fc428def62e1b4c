//! Classification of platform API error responses.
//!
//! Both platforms signal an expired or invalid access token through the
//! response body rather than the HTTP status alone, and each uses different
//! fields. Classification is a pure function over the parsed body so the
//! retry wrapper never inspects raw responses itself.

use serde::Deserialize;

use crate::provider::ProviderKind;

/// Zoom's numeric code for an expired access token.
const ZOOM_TOKEN_EXPIRED_CODE: i64 = 124;
/// Zoom's human-readable expiry message.
const ZOOM_TOKEN_EXPIRED_MESSAGE: &str = "Access token is expired.";
/// Teams / Microsoft identity error identifiers that invalidate the token.
const TEAMS_INVALID_ERRORS: [&str; 2] = ["invalid_grant", "InvalidAuthenticationToken"];

/// Error body shape returned by the backend for failed platform calls.
///
/// A superset of what Zoom and Teams proxies emit; absent fields deserialize
/// to `None` so one type covers both.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub details: Option<String>,
}

impl ApiErrorBody {
    /// Best human-readable description of the failure, for display.
    pub fn display_message(&self) -> Option<&str> {
        self.details
            .as_deref()
            .or(self.message.as_deref())
            .or(self.error_description.as_deref())
            .or(self.error.as_deref())
    }
}

/// Closed set of token-failure classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFailure {
    /// The access token has expired; a refresh should recover.
    Expired,
    /// The token (or grant) was rejected outright; a refresh may still recover.
    Invalid,
    /// Not a token failure.
    Other,
}

impl TokenFailure {
    /// Whether this failure starts a refresh-and-retry cycle.
    pub fn triggers_refresh(&self) -> bool {
        matches!(self, TokenFailure::Expired | TokenFailure::Invalid)
    }
}

/// Classify an error body using the given platform's signals.
pub fn classify(provider: ProviderKind, body: &ApiErrorBody) -> TokenFailure {
    match provider {
        ProviderKind::Zoom => classify_zoom(body),
        ProviderKind::Teams => classify_teams(body),
    }
}

fn classify_zoom(body: &ApiErrorBody) -> TokenFailure {
    if body.code == Some(ZOOM_TOKEN_EXPIRED_CODE) {
        return TokenFailure::Expired;
    }
    if body.message.as_deref() == Some(ZOOM_TOKEN_EXPIRED_MESSAGE) {
        return TokenFailure::Expired;
    }
    TokenFailure::Other
}

fn classify_teams(body: &ApiErrorBody) -> TokenFailure {
    if let Some(error) = body.error.as_deref() {
        if TEAMS_INVALID_ERRORS.contains(&error) {
            return TokenFailure::Invalid;
        }
    }
    let mentions_expiry = |field: &Option<String>| {
        field
            .as_deref()
            .is_some_and(|text| text.contains("expired"))
    };
    if mentions_expiry(&body.error_description) || mentions_expiry(&body.message) {
        return TokenFailure::Expired;
    }
    TokenFailure::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> ApiErrorBody {
        ApiErrorBody::default()
    }

    #[test]
    fn test_zoom_expired_code() {
        let classified = classify(
            ProviderKind::Zoom,
            &ApiErrorBody {
                code: Some(124),
                ..body()
            },
        );
        assert_eq!(classified, TokenFailure::Expired);
        assert!(classified.triggers_refresh());
    }

    #[test]
    fn test_zoom_expired_message() {
        let classified = classify(
            ProviderKind::Zoom,
            &ApiErrorBody {
                message: Some("Access token is expired.".to_string()),
                ..body()
            },
        );
        assert_eq!(classified, TokenFailure::Expired);
    }

    #[test]
    fn test_zoom_other_code_is_not_a_token_failure() {
        let classified = classify(
            ProviderKind::Zoom,
            &ApiErrorBody {
                code: Some(300),
                message: Some("Meeting not found".to_string()),
                ..body()
            },
        );
        assert_eq!(classified, TokenFailure::Other);
        assert!(!classified.triggers_refresh());
    }

    #[test]
    fn test_teams_invalid_grant() {
        let classified = classify(
            ProviderKind::Teams,
            &ApiErrorBody {
                error: Some("invalid_grant".to_string()),
                ..body()
            },
        );
        assert_eq!(classified, TokenFailure::Invalid);
        assert!(classified.triggers_refresh());
    }

    #[test]
    fn test_teams_invalid_authentication_token() {
        let classified = classify(
            ProviderKind::Teams,
            &ApiErrorBody {
                error: Some("InvalidAuthenticationToken".to_string()),
                ..body()
            },
        );
        assert_eq!(classified, TokenFailure::Invalid);
    }

    #[test]
    fn test_teams_expired_in_description() {
        let classified = classify(
            ProviderKind::Teams,
            &ApiErrorBody {
                error: Some("token_error".to_string()),
                error_description: Some("Lifetime validation failed, the token is expired.".to_string()),
                ..body()
            },
        );
        assert_eq!(classified, TokenFailure::Expired);
    }

    #[test]
    fn test_teams_expired_in_message() {
        let classified = classify(
            ProviderKind::Teams,
            &ApiErrorBody {
                message: Some("Access token has expired or is not yet valid.".to_string()),
                ..body()
            },
        );
        assert_eq!(classified, TokenFailure::Expired);
    }

    #[test]
    fn test_teams_unrelated_error() {
        let classified = classify(
            ProviderKind::Teams,
            &ApiErrorBody {
                error: Some("ErrorItemNotFound".to_string()),
                message: Some("The specified object was not found.".to_string()),
                ..body()
            },
        );
        assert_eq!(classified, TokenFailure::Other);
    }

    #[test]
    fn test_zoom_signals_do_not_apply_to_teams() {
        // A Zoom-style numeric code means nothing under the Teams rules.
        let classified = classify(
            ProviderKind::Teams,
            &ApiErrorBody {
                code: Some(124),
                ..body()
            },
        );
        assert_eq!(classified, TokenFailure::Other);
    }

    #[test]
    fn test_display_message_preference_order() {
        let full = ApiErrorBody {
            code: Some(1),
            message: Some("message".to_string()),
            error: Some("error".to_string()),
            error_description: Some("description".to_string()),
            details: Some("details".to_string()),
        };
        assert_eq!(full.display_message(), Some("details"));
        assert_eq!(body().display_message(), None);
    }
}
