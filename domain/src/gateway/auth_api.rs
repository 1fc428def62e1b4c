//! Gateway for the backend's own authentication endpoints.

use log::*;
use serde::Deserialize;

use platform_auth::http::ApiClient;
use platform_auth::signal::ApiErrorBody;

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use crate::user::{RegisterParams, User};

/// Token and user returned by a successful login or registration.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
struct AuthEnvelope {
    data: AuthData,
}

#[derive(Debug, Deserialize)]
struct AuthData {
    token: String,
    user: User,
}

#[derive(Debug, Deserialize)]
struct MeEnvelope {
    data: MeData,
}

#[derive(Debug, Deserialize)]
struct MeData {
    user: User,
}

/// Client for `/api/auth/*` and the account-level disconnect endpoint.
pub struct AuthApiClient {
    client: ApiClient,
    base_url: String,
}

impl AuthApiClient {
    pub fn new(client: ApiClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Authenticate with credentials, yielding the session bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSuccess, Error> {
        debug!("Logging in {}", email);

        let response = self
            .client
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| {
                warn!("Login request failed: {:?}", e);
                Error::from(e)
            })?;

        let envelope: AuthEnvelope = Self::read_envelope(response).await?;
        info!("Logged in as {}", envelope.data.user.email);
        Ok(LoginSuccess {
            token: envelope.data.token,
            user: envelope.data.user,
        })
    }

    /// Create an account; the backend logs the new user straight in.
    pub async fn register(&self, params: &RegisterParams) -> Result<LoginSuccess, Error> {
        debug!("Registering {}", params.email);

        let response = self
            .client
            .post(format!("{}/api/auth/register", self.base_url))
            .json(params)
            .send()
            .await
            .map_err(|e| {
                warn!("Registration request failed: {:?}", e);
                Error::from(e)
            })?;

        let envelope: AuthEnvelope = Self::read_envelope(response).await?;
        info!("Registered {}", envelope.data.user.email);
        Ok(LoginSuccess {
            token: envelope.data.token,
            user: envelope.data.user,
        })
    }

    /// Validate a stored session token against the backend.
    ///
    /// Any non-success answer means the session is no longer valid; the
    /// caller decides what to clear.
    pub async fn me(&self, bearer: &str) -> Result<User, Error> {
        let response = self
            .client
            .get(format!("{}/api/auth/me", self.base_url))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| {
                warn!("Session validation request failed: {:?}", e);
                Error::from(e)
            })?;

        if !response.status().is_success() {
            debug!("Stored session token rejected: {}", response.status());
            return Err(Error::unauthenticated());
        }

        let envelope: MeEnvelope = response.json().await.map_err(|e| {
            warn!("Failed to parse auth/me response: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                    "Invalid response from backend".to_string(),
                )),
            }
        })?;

        Ok(envelope.data.user)
    }

    /// Revoke the account's platform connection server-side.
    ///
    /// Called best-effort during logout; callers ignore the result.
    pub async fn disconnect(&self, bearer: &str) -> Result<(), Error> {
        let response = self
            .client
            .post(format!("{}/api/zoom/disconnect", self.base_url))
            .bearer_auth(bearer)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn read_envelope(response: reqwest::Response) -> Result<AuthEnvelope, Error> {
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        response.json().await.map_err(|e| {
            warn!("Failed to parse auth response: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                    "Invalid response from backend".to_string(),
                )),
            }
        })
    }

    async fn api_error(response: reqwest::Response) -> Error {
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ApiErrorBody>(&text).unwrap_or_else(|_| ApiErrorBody {
            message: (!text.is_empty()).then(|| text.clone()),
            ..ApiErrorBody::default()
        });
        warn!("Backend auth error: {:?}", body);
        Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Api(body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_auth::http::ApiClientBuilder;

    fn client() -> ApiClient {
        ApiClientBuilder::new().with_max_retries(0).build().unwrap()
    }

    fn user_json() -> serde_json::Value {
        serde_json::json!({
            "_id": "665f1a",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "plan": "pro",
            "isYearly": false,
            "isSubscriber": true
        })
    }

    #[tokio::test]
    async fn test_login_returns_token_and_user() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/auth/login")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "email": "ada@example.com",
                "password": "secret"
            })))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "success": true,
                    "data": { "token": "S1", "user": user_json() }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let api = AuthApiClient::new(client(), server.url());
        let success = api.login("ada@example.com", "secret").await.unwrap();
        assert_eq!(success.token, "S1");
        assert_eq!(success.user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_login_failure_carries_backend_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/auth/login")
            .with_status(401)
            .with_body(r#"{"message": "Invalid credentials"}"#)
            .create_async()
            .await;

        let api = AuthApiClient::new(client(), server.url());
        let err = api.login("ada@example.com", "wrong").await.unwrap_err();
        match err.error_kind {
            DomainErrorKind::External(ExternalErrorKind::Api(body)) => {
                assert_eq!(body.message.as_deref(), Some("Invalid credentials"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_me_with_valid_token() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/auth/me")
            .match_header("authorization", "Bearer S1")
            .with_status(200)
            .with_body(serde_json::json!({ "data": { "user": user_json() } }).to_string())
            .create_async()
            .await;

        let api = AuthApiClient::new(client(), server.url());
        let user = api.me("S1").await.unwrap();
        assert_eq!(user.id, "665f1a");
        assert!(user.is_subscriber);
    }

    #[tokio::test]
    async fn test_me_rejection_is_unauthenticated() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/auth/me")
            .with_status(401)
            .with_body(r#"{"message": "jwt expired"}"#)
            .create_async()
            .await;

        let api = AuthApiClient::new(client(), server.url());
        let err = api.me("stale").await.unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Unauthenticated)
        );
    }
}
