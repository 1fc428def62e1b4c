//! OAuth return handling.
//!
//! After the external consent screen, the backend redirects the browser to
//! the client with tokens or an error in the query string. One entry point
//! dispatches to the right platform's handler based on which
//! platform-specific parameter names are present; Teams parameters take
//! precedence when both sets appear.

use std::collections::HashMap;

use tracing::{info, warn};
use url::Url;

use crate::error::{callback_error, CallbackErrorKind, Error};
use crate::provider::ProviderKind;
use crate::store::{TokenKind, TokenStore};

/// Result of handling an OAuth return, directing the caller to the feature view.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    /// Tokens were stored; the platform connection is live.
    Connected { provider: ProviderKind },
    /// The consent flow ended in an error; the store was left untouched.
    Denied {
        provider: ProviderKind,
        error: String,
    },
}

/// Parse an OAuth redirect URL (or bare query string) and populate the store.
pub fn handle_oauth_return(
    redirect: &str,
    store: &dyn TokenStore,
) -> Result<CallbackOutcome, Error> {
    let params = parse_params(redirect)?;

    if let Some(access) = params.get("teams_access_token") {
        info!("Handling Teams OAuth return");
        store.set(TokenKind::TeamsAccess, Some(access.clone()));
        if let Some(refresh) = params.get("teams_refresh_token") {
            store.set(TokenKind::TeamsRefresh, Some(refresh.clone()));
        }
        return Ok(CallbackOutcome::Connected {
            provider: ProviderKind::Teams,
        });
    }

    if let Some(access) = params.get("access_token") {
        info!("Handling Zoom OAuth return");
        store.set(TokenKind::ZoomAccess, Some(access.clone()));
        if let Some(refresh) = params.get("refresh_token") {
            store.set(TokenKind::ZoomRefresh, Some(refresh.clone()));
        }
        return Ok(CallbackOutcome::Connected {
            provider: ProviderKind::Zoom,
        });
    }

    if let Some(error) = params.get("error") {
        // Only Zoom returns rely on the shared `error` name alone; a Teams
        // failure still carries its platform-specific parameter names.
        warn!("OAuth consent denied: {}", error);
        return Ok(CallbackOutcome::Denied {
            provider: ProviderKind::Zoom,
            error: error.clone(),
        });
    }

    Err(callback_error(
        CallbackErrorKind::UnrecognizedParams,
        "redirect carries neither tokens nor an error",
    ))
}

fn parse_params(redirect: &str) -> Result<HashMap<String, String>, Error> {
    let query = match Url::parse(redirect) {
        Ok(url) => url.query().unwrap_or_default().to_string(),
        // Not an absolute URL; treat the input as the query string itself.
        Err(_) if redirect.contains('=') => redirect.trim_start_matches('?').to_string(),
        Err(e) => {
            return Err(Error {
                source: Some(Box::new(e)),
                error_kind: crate::error::ErrorKind::Callback(CallbackErrorKind::MalformedUrl),
            })
        }
    };

    Ok(url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect())
}
