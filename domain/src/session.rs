//! Process-wide authentication state.

use std::sync::Arc;

use log::*;

use platform_auth::store::{TokenKind, TokenStore};

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use crate::gateway::auth_api::AuthApiClient;
use crate::user::{RegisterParams, User};

/// Lifecycle of the client session.
///
/// `Uninitialized → Validating → { Authenticated, Anonymous }`. There is no
/// terminal state; only a process restart re-initializes the context.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Uninitialized,
    Validating,
    Authenticated(User),
    Anonymous,
}

/// Holds the current user identity and mediates every session transition.
///
/// The token store is injected so feature code and tests share one
/// credential source instead of reaching for ambient globals.
pub struct SessionContext {
    store: Arc<dyn TokenStore>,
    auth_api: AuthApiClient,
    state: SessionState,
}

impl SessionContext {
    pub fn new(store: Arc<dyn TokenStore>, auth_api: AuthApiClient) -> Self {
        Self {
            store,
            auth_api,
            state: SessionState::Uninitialized,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    /// The meeting assistant is subscriber-only; check before any call.
    pub fn require_subscriber(&self) -> Result<&User, Error> {
        let user = self.user().ok_or_else(Error::unauthenticated)?;
        if !user.is_subscriber {
            return Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::SubscriptionRequired),
            });
        }
        Ok(user)
    }

    /// Validate any persisted session token against the backend.
    ///
    /// No stored token means straight to `Anonymous` without a network
    /// call. A stored token that fails validation, for whatever reason,
    /// clears every token family: a dead session must not leave platform
    /// tokens behind for the next account.
    pub async fn bootstrap(&mut self) -> &SessionState {
        let Some(token) = self.store.get(TokenKind::SessionBearer) else {
            self.state = SessionState::Anonymous;
            return &self.state;
        };

        self.state = SessionState::Validating;
        match self.auth_api.me(&token).await {
            Ok(user) => {
                info!("Session restored for {}", user.email);
                self.state = SessionState::Authenticated(user);
            }
            Err(e) => {
                warn!("Session validation failed, signing out: {}", e);
                self.store.clear_all();
                self.state = SessionState::Anonymous;
            }
        }
        &self.state
    }

    /// Authenticate with credentials, bypassing `Validating`.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, Error> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::validation("email and password are required"));
        }

        let success = self.auth_api.login(email, password).await?;
        self.store
            .set(TokenKind::SessionBearer, Some(success.token));
        self.state = SessionState::Authenticated(success.user.clone());
        Ok(success.user)
    }

    /// Create an account and enter it directly.
    pub async fn register(&mut self, params: RegisterParams) -> Result<User, Error> {
        if params.first_name.trim().is_empty()
            || params.last_name.trim().is_empty()
            || params.email.trim().is_empty()
            || params.password.is_empty()
        {
            return Err(Error::validation("all registration fields are required"));
        }

        let success = self.auth_api.register(&params).await?;
        self.store
            .set(TokenKind::SessionBearer, Some(success.token));
        self.state = SessionState::Authenticated(success.user.clone());
        Ok(success.user)
    }

    /// End the session.
    ///
    /// The backend disconnect is best-effort only; a downstream failure
    /// must never block logout.
    pub async fn logout(&mut self) {
        if let Some(token) = self.store.get(TokenKind::SessionBearer) {
            if let Err(e) = self.auth_api.disconnect(&token).await {
                debug!("Ignoring disconnect failure during logout: {}", e);
            }
        }
        self.store.clear_all();
        self.state = SessionState::Anonymous;
    }
}
