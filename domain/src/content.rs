//! Content agent operations.

use std::path::Path;

use log::*;

use agents::types::content::{GenerationOutcome, GenerationRequest, MediaType};

use crate::error::Error;
use crate::gateway::PredisGateway;

/// Largest accepted reference image.
const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Extensions accepted as image uploads.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Generate a social post, optionally steered by a reference image.
///
/// Inputs are validated before anything is sent: the topic must be
/// non-empty, and a reference image must be an image file of at most 5 MB.
/// When an image is given it is uploaded first and its URL passed to the
/// generation call.
pub async fn generate_post(
    gateway: &PredisGateway,
    topic: &str,
    media_type: MediaType,
    reference_image: Option<&Path>,
) -> Result<GenerationOutcome, Error> {
    if topic.trim().is_empty() {
        return Err(Error::validation("a topic is required"));
    }

    let mut request = GenerationRequest::new(topic.trim().to_string(), media_type);

    if let Some(path) = reference_image {
        validate_reference_image(path)?;
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            Error::validation(format!("cannot read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let url = gateway.upload_image(file_name, bytes).await?;
        info!("Reference image uploaded: {}", url);
        request.uploaded_image_url = Some(url);
    }

    Ok(gateway.generate(&request).await?)
}

/// Client-side upload constraints, checked before any network call.
fn validate_reference_image(path: &Path) -> Result<(), Error> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    match extension.as_deref() {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => {}
        _ => {
            return Err(Error::validation(
                "the reference file must be an image (png, jpg, jpeg, gif, webp or bmp)",
            ))
        }
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| Error::validation(format!("cannot read {}: {}", path.display(), e)))?;
    if metadata.len() > MAX_IMAGE_BYTES {
        return Err(Error::validation("the reference image must not exceed 5MB"));
    }

    Ok(())
}
