//! Platform connections: gateways composed with the refresh-and-retry cycle.

use std::sync::Arc;

use log::*;

use agents::types::meeting::{
    Meeting, MeetingWindow, RecordingFile, TranscriptionOutcome, TranscriptionRequest,
};
use agents::{Error as AgentError, MeetingPlatform};
use platform_auth::callback::{handle_oauth_return, CallbackOutcome};
use platform_auth::refresh::Refresher;
use platform_auth::retry::with_token_refresh;
use platform_auth::signal::classify;
use platform_auth::store::TokenStore;
use platform_auth::ProviderKind;

use crate::error::Error;

/// True when the failure carries the platform's expired/invalid token signal.
pub fn is_token_failure(provider: ProviderKind, err: &AgentError) -> bool {
    err.api_body()
        .map(|body| classify(provider, body).triggers_refresh())
        .unwrap_or(false)
}

/// Handle an OAuth redirect URL, populating the token store.
pub fn complete_oauth_return(
    redirect: &str,
    store: &dyn TokenStore,
) -> Result<CallbackOutcome, Error> {
    Ok(handle_oauth_return(redirect, store)?)
}

/// One meeting platform wired to the shared token store and refresher.
///
/// Every operation reads the current access token, issues the gateway call,
/// and on the platform's token-failure signal runs exactly one single-flight
/// refresh followed by one retry.
pub struct PlatformConnection {
    gateway: Arc<dyn MeetingPlatform>,
    store: Arc<dyn TokenStore>,
    refresher: Arc<Refresher>,
}

impl PlatformConnection {
    pub fn new(
        gateway: Arc<dyn MeetingPlatform>,
        store: Arc<dyn TokenStore>,
        refresher: Arc<Refresher>,
    ) -> Self {
        Self {
            gateway,
            store,
            refresher,
        }
    }

    pub fn provider(&self) -> ProviderKind {
        self.gateway.provider()
    }

    /// Whether an access token is stored for this platform.
    pub fn is_connected(&self) -> bool {
        self.store.access_token(self.provider()).is_some()
    }

    /// List meetings, refreshing the token once if needed.
    pub async fn list_meetings(&self, window: MeetingWindow) -> Result<Vec<Meeting>, Error> {
        let provider = self.provider();
        let token = self.current_token()?;
        let gateway = Arc::clone(&self.gateway);

        let meetings = with_token_refresh(
            token.clone(),
            move |access| {
                let gateway = Arc::clone(&gateway);
                async move { gateway.list_meetings(&access, window).await }
            },
            |e| is_token_failure(provider, e),
            || self.refresh_once(token.clone()),
        )
        .await?;
        Ok(meetings)
    }

    /// List meetings and attach each one's recording files.
    ///
    /// A per-meeting recordings failure degrades to an empty list rather
    /// than failing the whole listing.
    pub async fn list_meetings_with_recordings(
        &self,
        window: MeetingWindow,
    ) -> Result<Vec<Meeting>, Error> {
        let mut meetings = self.list_meetings(window).await?;
        for meeting in &mut meetings {
            match self.recordings(&meeting.id).await {
                Ok(files) => meeting.recording_files = files,
                Err(e) => {
                    debug!("No recordings for meeting {}: {}", meeting.id, e);
                    meeting.recording_files = Vec::new();
                }
            }
        }
        Ok(meetings)
    }

    /// Fetch the recording files of one meeting.
    pub async fn recordings(&self, meeting_id: &str) -> Result<Vec<RecordingFile>, Error> {
        let provider = self.provider();
        let token = self.current_token()?;
        let gateway = Arc::clone(&self.gateway);
        let meeting_id = meeting_id.to_string();

        let files = with_token_refresh(
            token.clone(),
            move |access| {
                let gateway = Arc::clone(&gateway);
                let meeting_id = meeting_id.clone();
                async move { gateway.recordings(&access, &meeting_id).await }
            },
            |e| is_token_failure(provider, e),
            || self.refresh_once(token.clone()),
        )
        .await?;
        Ok(files)
    }

    /// Request transcription and summarization of a recording.
    pub async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionOutcome, Error> {
        if request.download_url.trim().is_empty() {
            return Err(Error::validation("a recording download URL is required"));
        }

        let provider = self.provider();
        let token = self.current_token()?;
        let gateway = Arc::clone(&self.gateway);

        let outcome = with_token_refresh(
            token.clone(),
            move |access| {
                let gateway = Arc::clone(&gateway);
                let request = request.clone();
                async move { gateway.transcribe(&access, &request).await }
            },
            |e| is_token_failure(provider, e),
            || self.refresh_once(token.clone()),
        )
        .await?;
        Ok(outcome)
    }

    fn current_token(&self) -> Result<String, AgentError> {
        let provider = self.provider();
        self.store
            .access_token(provider)
            .ok_or(AgentError::NotConnected(provider))
    }

    fn refresh_once(&self, stale: String) -> impl std::future::Future<Output = Option<String>> {
        let provider = self.provider();
        let gateway = Arc::clone(&self.gateway);
        let store = Arc::clone(&self.store);
        let refresher = Arc::clone(&self.refresher);
        async move {
            refresher
                .refresh(
                    provider,
                    store.as_ref(),
                    Some(&stale),
                    move |refresh_token| async move {
                        gateway.exchange_refresh_token(&refresh_token).await
                    },
                )
                .await
        }
    }
}
