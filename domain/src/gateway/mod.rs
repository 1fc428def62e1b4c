//! HTTP gateways to the WorkAI backend.
//!
//! One client per route family. Gateways perform exactly one request per
//! call; retry-after-refresh is composed above them in
//! [`crate::connection`].

pub mod auth_api;
pub mod predis;
pub mod teams;
pub mod zoom;

pub use auth_api::AuthApiClient;
pub use predis::PredisGateway;
pub use teams::TeamsGateway;
pub use zoom::ZoomGateway;

use std::time::Duration;

use agents::Error as AgentError;
use platform_auth::http::{ApiClient, ApiClientBuilder};
use platform_auth::signal::ApiErrorBody;
use serde::de::DeserializeOwned;
use service::config::Config;

/// Build the shared backend client from the runtime configuration.
pub fn build_api_client(config: &Config) -> Result<ApiClient, crate::Error> {
    ApiClientBuilder::new()
        .with_timeout(Duration::from_secs(config.http_timeout_secs))
        .with_max_retries(config.http_max_retries)
        .build()
        .map_err(crate::Error::from)
}

/// Parse a success body, or turn a failure response into the structured
/// error the token-failure classifier understands.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AgentError> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| AgentError::Deserialization(e.to_string()))
    } else {
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ApiErrorBody>(&text).unwrap_or_else(|_| ApiErrorBody {
            message: (!text.is_empty()).then(|| text.clone()),
            ..ApiErrorBody::default()
        });
        Err(AgentError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

/// Map a transport-level failure into the agent error space.
pub(crate) fn network_error(err: reqwest_middleware::Error) -> AgentError {
    AgentError::Network(err.to_string())
}
