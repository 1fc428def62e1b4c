//! Gateway for the backend's Teams route family.

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
struct EventsEnvelope {
    #[serde(default)]
    meetings: Vec<Meeting>,
}

#[derive(Debug, Deserialize)]
struct RecordingsEnvelope {
    #[serde(default)]
    recordings: Vec<RecordingFile>,
}

/// Client for `/api/teams/*`.
///
/// Teams exposes one calendar-events feed rather than split upcoming/past
/// listings, so both windows return the same events, newest first.
pub struct TeamsGateway {
    client: ApiClient,
    base_url: String,
}

impl TeamsGateway {
    pub fn new(client: ApiClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MeetingPlatform for TeamsGateway {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Teams
    }

    async fn list_meetings(
        &self,
        access_token: &str,
        _window: MeetingWindow,
    ) -> Result<Vec<Meeting>, AgentError> {
        debug!("Fetching Teams calendar events");

        let response = self
            .client
            .get(format!("{}/api/teams/events", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(network_error)?;

        let envelope: EventsEnvelope = read_json(response).await?;
        let mut meetings = envelope.meetings;
        meetings.sort_by(|a, b| b.parsed_start_time().cmp(&a.parsed_start_time()));
        Ok(meetings)
    }

    async fn recordings(
        &self,
        access_token: &str,
        meeting_id: &str,
    ) -> Result<Vec<RecordingFile>, AgentError> {
        let response = self
            .client
            .get(format!(
                "{}/api/teams/meetings/{}/recordings",
                self.base_url, meeting_id
            ))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(network_error)?;

        let envelope: RecordingsEnvelope = read_json(response).await?;
        Ok(envelope.recordings)
    }

    async fn transcribe(
        &self,
        access_token: &str,
        request: &TranscriptionRequest,
    ) -> Result<TranscriptionOutcome, AgentError> {
        let meeting_id = request.meeting_id.as_deref().ok_or_else(|| {
            AgentError::Validation("a meeting id is required for Teams transcription".to_string())
        })?;

        info!("Requesting Teams transcription for meeting {}", meeting_id);

        let response = self
            .client
            .post(format!("{}/api/teams/transcribe-audio", self.base_url))
            .bearer_auth(access_token)
            .json(&serde_json::json!({
                "downloadUrl": request.download_url,
                "summaryInstruction": request.summary_instruction,
                "meetingId": meeting_id,
            }))
            .send()
            .await
            .map_err(network_error)?;

        read_json(response).await
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AgentError> {
        debug!("Exchanging Teams refresh token");

        let response = self
            .client
            .post(format!("{}/api/teams/refresh-token", self.base_url))
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(network_error)?;

        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_auth::http::ApiClientBuilder;

    fn gateway(base_url: String) -> TeamsGateway {
        let client = ApiClientBuilder::new().with_max_retries(0).build().unwrap();
        TeamsGateway::new(client, base_url)
    }

    #[tokio::test]
    async fn test_events_are_sorted_newest_first() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/teams/events")
            .match_header("authorization", "Bearer TT")
            .with_status(200)
            .with_body(
                r#"{"meetings": [
                    {"id": "old", "start_time": "2025-03-01T09:00:00Z"},
                    {"id": "new", "start_time": "2025-04-01T09:00:00Z"}
                ]}"#,
            )
            .create_async()
            .await;

        let meetings = gateway(server.url())
            .list_meetings("TT", MeetingWindow::Past)
            .await
            .unwrap();
        assert_eq!(meetings[0].id, "new");
        assert_eq!(meetings[1].id, "old");
    }

    #[tokio::test]
    async fn test_invalid_token_surfaces_teams_signal() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/teams/events")
            .with_status(401)
            .with_body(r#"{"error": "InvalidAuthenticationToken"}"#)
            .create_async()
            .await;

        let err = gateway(server.url())
            .list_meetings("stale", MeetingWindow::Past)
            .await
            .unwrap_err();
        let body = err.api_body().expect("structured body");
        assert_eq!(body.error.as_deref(), Some("InvalidAuthenticationToken"));
    }

    #[tokio::test]
    async fn test_transcribe_requires_meeting_id() {
        let mut server = mockito::Server::new_async().await;
        let err = gateway(server.url())
            .transcribe(
                "TT",
                &TranscriptionRequest {
                    download_url: "https://graph.example.com/rec.mp4".to_string(),
                    summary_instruction: String::new(),
                    meeting_id: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Validation(_)));
    }

    #[tokio::test]
    async fn test_recordings_envelope_field() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/teams/meetings/ev1/recordings")
            .with_status(200)
            .with_body(r#"{"recordings": [{"download_url": "https://graph.example.com/r.mp4"}]}"#)
            .create_async()
            .await;

        let recordings = gateway(server.url()).recordings("TT", "ev1").await.unwrap();
        assert_eq!(recordings.len(), 1);
        assert_eq!(
            recordings[0].download_url,
            "https://graph.example.com/r.mp4"
        );
    }
}
