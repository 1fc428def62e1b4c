//! Gateway for the backend's Zoom route family.

use async_trait::async_trait;
use log::*;
use serde::Deserialize;

use agents::types::meeting::{
    Meeting, MeetingWindow, RecordingFile, TranscriptionOutcome, TranscriptionRequest,
};
use agents::{Error as AgentError, MeetingPlatform};
use platform_auth::http::ApiClient;
use platform_auth::refresh::TokenPair;
use platform_auth::ProviderKind;

use super::{network_error, read_json};

#[derive(Debug, Deserialize)]
struct MeetingsEnvelope {
    #[serde(default)]
    meetings: Vec<Meeting>,
}

#[derive(Debug, Deserialize)]
struct RecordingsEnvelope {
    #[serde(default)]
    recording_files: Vec<RecordingFile>,
}

/// Client for `/api/zoom/*`.
pub struct ZoomGateway {
    client: ApiClient,
    base_url: String,
}

impl ZoomGateway {
    pub fn new(client: ApiClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MeetingPlatform for ZoomGateway {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Zoom
    }

    async fn list_meetings(
        &self,
        access_token: &str,
        window: MeetingWindow,
    ) -> Result<Vec<Meeting>, AgentError> {
        debug!("Fetching {} Zoom meetings", window.as_str());

        let response = self
            .client
            .get(format!("{}/api/zoom/meetings", self.base_url))
            .query(&[("type", window.as_str())])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(network_error)?;

        let envelope: MeetingsEnvelope = read_json(response).await?;
        Ok(envelope.meetings)
    }

    async fn recordings(
        &self,
        access_token: &str,
        meeting_id: &str,
    ) -> Result<Vec<RecordingFile>, AgentError> {
        let response = self
            .client
            .get(format!(
                "{}/api/zoom/meetings/{}/recordings",
                self.base_url, meeting_id
            ))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(network_error)?;

        let envelope: RecordingsEnvelope = read_json(response).await?;
        Ok(envelope.recording_files)
    }

    async fn transcribe(
        &self,
        access_token: &str,
        request: &TranscriptionRequest,
    ) -> Result<TranscriptionOutcome, AgentError> {
        info!("Requesting Zoom transcription");

        let response = self
            .client
            .post(format!("{}/api/zoom/transcribe-audio", self.base_url))
            .bearer_auth(access_token)
            .json(&serde_json::json!({
                "downloadUrl": request.download_url,
                "summaryInstruction": request.summary_instruction,
            }))
            .send()
            .await
            .map_err(network_error)?;

        read_json(response).await
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AgentError> {
        debug!("Exchanging Zoom refresh token");

        let response = self
            .client
            .post(format!("{}/api/zoom/refresh-token", self.base_url))
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(network_error)?;

        read_json(response).await
    }
}
