//! Meeting platform trait.

use async_trait::async_trait;

use platform_auth::refresh::TokenPair;
use platform_auth::ProviderKind;

use crate::types::meeting::{
    Meeting, MeetingWindow, RecordingFile, TranscriptionOutcome, TranscriptionRequest,
};
use crate::Error;

/// Abstraction over the backend's per-platform meeting endpoints.
///
/// Implementations wrap one platform's route family (Zoom or Teams) and take
/// the bearer access token per call, since tokens rotate between calls on
/// the same client. Methods perform exactly one request; the
/// refresh-and-retry cycle is composed around them by the caller.
#[async_trait]
pub trait MeetingPlatform: Send + Sync {
    /// Which platform this gateway talks to.
    fn provider(&self) -> ProviderKind;

    /// List meetings visible to the connected account.
    async fn list_meetings(
        &self,
        access_token: &str,
        window: MeetingWindow,
    ) -> Result<Vec<Meeting>, Error>;

    /// Fetch the recording files of one meeting.
    async fn recordings(
        &self,
        access_token: &str,
        meeting_id: &str,
    ) -> Result<Vec<RecordingFile>, Error>;

    /// Request transcription and summarization of a recording.
    async fn transcribe(
        &self,
        access_token: &str,
        request: &TranscriptionRequest,
    ) -> Result<TranscriptionOutcome, Error>;

    /// Exchange a refresh token for a new access/refresh pair.
    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<TokenPair, Error>;
}
