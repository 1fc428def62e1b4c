//! Types for the meeting assistant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which slice of the meeting list to fetch.
///
/// Teams exposes a single calendar-events feed, so its gateway returns the
/// same listing for both windows; Zoom distinguishes them server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingWindow {
    Upcoming,
    Past,
}

impl MeetingWindow {
    /// Query value understood by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingWindow::Upcoming => "upcoming",
            MeetingWindow::Past => "past",
        }
    }
}

/// A meeting as listed by either platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub join_url: Option<String>,
    #[serde(default)]
    pub recording_files: Vec<RecordingFile>,
}

impl Meeting {
    /// Start time parsed for ordering; listings sort newest first.
    pub fn parsed_start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// A recorded artifact attached to a past meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingFile {
    #[serde(default)]
    pub id: Option<String>,
    pub download_url: String,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub recording_type: Option<String>,
}

/// Request to transcribe and summarize a recording.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// Where the platform serves the audio/video file.
    pub download_url: String,
    /// Free-form instruction steering the summary.
    pub summary_instruction: String,
    /// Required by the Teams endpoint; ignored by Zoom.
    pub meeting_id: Option<String>,
}

/// Transcription and summary returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionOutcome {
    #[serde(default)]
    pub transcription: String,
    #[serde(default)]
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_query_values() {
        assert_eq!(MeetingWindow::Upcoming.as_str(), "upcoming");
        assert_eq!(MeetingWindow::Past.as_str(), "past");
    }

    #[test]
    fn test_parsed_start_time() {
        let meeting = Meeting {
            id: "m1".to_string(),
            topic: None,
            start_time: Some("2025-04-01T10:00:00Z".to_string()),
            join_url: None,
            recording_files: vec![],
        };
        assert!(meeting.parsed_start_time().is_some());

        let unparseable = Meeting {
            start_time: Some("yesterday".to_string()),
            ..meeting
        };
        assert_eq!(unparseable.parsed_start_time(), None);
    }

    #[test]
    fn test_meeting_deserializes_with_missing_fields() {
        let meeting: Meeting = serde_json::from_str(r#"{"id": "42"}"#).unwrap();
        assert_eq!(meeting.id, "42");
        assert_eq!(meeting.topic, None);
        assert!(meeting.recording_files.is_empty());
    }
}
