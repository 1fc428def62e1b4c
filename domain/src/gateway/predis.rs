//! Gateway for the backend's content-generation route family.
//!
//! These endpoints sit behind the backend's own session, not a platform
//! OAuth token, so no bearer header is attached.

use log::*;
use serde::Deserialize;

use agents::types::content::{
    CreditBalance, GenerationOptions, GenerationOutcome, GenerationRequest,
};
use agents::Error as AgentError;
use platform_auth::http::ApiClient;

use super::{network_error, read_json};

#[derive(Debug, Deserialize)]
struct CreditsEnvelope {
    credits: CreditBalance,
}

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    url: String,
}

/// Client for `/api/predis/*`.
pub struct PredisGateway {
    client: ApiClient,
    base_url: String,
}

impl PredisGateway {
    pub fn new(client: ApiClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Current generation credit balance.
    pub async fn credits(&self) -> Result<CreditBalance, AgentError> {
        let response = self
            .client
            .get(format!("{}/api/predis/credits", self.base_url))
            .send()
            .await
            .map_err(network_error)?;

        let envelope: CreditsEnvelope = read_json(response).await?;
        Ok(envelope.credits)
    }

    /// Options the generation backend currently accepts.
    pub async fn options(&self) -> Result<GenerationOptions, AgentError> {
        let response = self
            .client
            .get(format!("{}/api/predis/config", self.base_url))
            .send()
            .await
            .map_err(network_error)?;

        read_json(response).await
    }

    /// Generate a social post.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome, AgentError> {
        info!("Requesting content generation for topic: {}", request.topic);

        let response = self
            .client
            .post(format!("{}/api/predis/generate", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(network_error)?;

        read_json(response).await
    }

    /// Upload a reference image, returning the URL the generate call uses.
    pub async fn upload_image(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<String, AgentError> {
        debug!("Uploading reference image {} ({} bytes)", file_name, bytes.len());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/api/predis/upload-image", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(network_error)?;

        let envelope: UploadEnvelope = read_json(response).await?;
        Ok(envelope.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agents::types::content::MediaType;
    use platform_auth::http::ApiClientBuilder;

    fn gateway(base_url: String) -> PredisGateway {
        let client = ApiClientBuilder::new().with_max_retries(0).build().unwrap();
        PredisGateway::new(client, base_url)
    }

    #[tokio::test]
    async fn test_credits_unwraps_envelope() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/predis/credits")
            .with_status(200)
            .with_body(r#"{"credits": {"utilisés": 2, "limite": 10, "restants": 8}}"#)
            .create_async()
            .await;

        let credits = gateway(server.url()).credits().await.unwrap();
        assert_eq!(credits.remaining, 8);
    }

    #[tokio::test]
    async fn test_generate_posts_request_and_parses_outcome() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/predis/generate")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "topic": "spring sale",
                "media_type": "single_image"
            })))
            .with_status(200)
            .with_body(
                r#"{
                    "content": "Spring has sprung!",
                    "imageUrl": "https://cdn.example.com/s.png",
                    "suggestions": [],
                    "credits": {"utilisés": 3, "limite": 10, "restants": 7}
                }"#,
            )
            .create_async()
            .await;

        let request = GenerationRequest::new("spring sale".to_string(), MediaType::SingleImage);
        let outcome = gateway(server.url()).generate(&request).await.unwrap();
        assert_eq!(outcome.post.content, "Spring has sprung!");
        assert_eq!(outcome.credits.unwrap().remaining, 7);
    }

    #[tokio::test]
    async fn test_generation_failure_carries_details() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/predis/generate")
            .with_status(429)
            .with_body(r#"{"details": "Generation limit reached"}"#)
            .create_async()
            .await;

        let request = GenerationRequest::new("topic".to_string(), MediaType::SingleImage);
        let err = gateway(server.url()).generate(&request).await.unwrap_err();
        assert_eq!(err.display_message(), "Generation limit reached");
    }
}
