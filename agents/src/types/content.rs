//! Types for the content agent.

use serde::{Deserialize, Serialize};

/// Generation credit balance for the current account.
///
/// The backend emits French field names; keep them at the wire boundary
/// only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CreditBalance {
    #[serde(rename = "utilisés")]
    pub used: u32,
    #[serde(rename = "limite")]
    pub limit: u32,
    #[serde(rename = "restants")]
    pub remaining: u32,
}

/// Options the generation backend accepts, fetched at startup of the
/// content view.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationOptions {
    #[serde(default)]
    pub post_types: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub media_types: Vec<String>,
    #[serde(default)]
    pub video_durations: Vec<String>,
    #[serde(default)]
    pub color_palette_types: Vec<String>,
}

/// Kind of media to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    SingleImage,
    Carousel,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::SingleImage => "single_image",
            MediaType::Carousel => "carousel",
            MediaType::Video => "video",
        }
    }
}

/// Request body for post generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub topic: String,
    pub media_type: MediaType,
    pub input_language: String,
    pub output_language: String,
    pub color_palette_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_duration: Option<String>,
    #[serde(rename = "uploadedImageUrl", skip_serializing_if = "Option::is_none")]
    pub uploaded_image_url: Option<String>,
}

impl GenerationRequest {
    /// Request with the defaults the original creator screen uses.
    pub fn new(topic: String, media_type: MediaType) -> Self {
        Self {
            topic,
            media_type,
            input_language: "french".to_string(),
            output_language: "french".to_string(),
            color_palette_type: "ai_suggested".to_string(),
            video_duration: matches!(media_type, MediaType::Video)
                .then(|| "short".to_string()),
            uploaded_image_url: None,
        }
    }
}

/// A generated social post.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedPost {
    #[serde(default)]
    pub content: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Generation result plus the post-call credit balance when the backend
/// includes it.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationOutcome {
    #[serde(flatten)]
    pub post: GeneratedPost,
    #[serde(default)]
    pub credits: Option<CreditBalance>,
}
