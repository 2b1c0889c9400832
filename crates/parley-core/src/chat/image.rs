//! Image payload parsing and validation.
//!
//! Images arrive as base64 data URLs (`data:image/png;base64,...`), are
//! validated for type and size, and are carried transiently on the
//! completion request. They are never persisted; an image-only turn stores
//! a synthesized placeholder string instead.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use parley_types::error::ChatError;
use parley_types::llm::ImagePayload;

/// Accepted image MIME types.
pub const SUPPORTED_IMAGE_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Maximum decoded image size: 4 MiB.
pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// Parse and validate one base64 data URL into an [`ImagePayload`].
pub fn parse_data_url(data_url: &str) -> Result<ImagePayload, ChatError> {
    let rest = data_url.strip_prefix("data:").ok_or_else(|| {
        ChatError::Validation("image must be a base64 data URL".to_string())
    })?;

    let (mime_type, payload) = rest.split_once(";base64,").ok_or_else(|| {
        ChatError::Validation("image must be a base64 data URL".to_string())
    })?;

    if !SUPPORTED_IMAGE_TYPES.contains(&mime_type) {
        return Err(ChatError::Validation(format!(
            "unsupported image format '{mime_type}'; supported formats: {}",
            SUPPORTED_IMAGE_TYPES.join(", ")
        )));
    }

    let decoded = STANDARD
        .decode(payload)
        .map_err(|_| ChatError::Validation("image payload is not valid base64".to_string()))?;

    if decoded.is_empty() {
        return Err(ChatError::Validation("image payload is empty".to_string()));
    }
    if decoded.len() > MAX_IMAGE_BYTES {
        return Err(ChatError::Validation(format!(
            "image exceeds the maximum size of {} MiB",
            MAX_IMAGE_BYTES / (1024 * 1024)
        )));
    }

    Ok(ImagePayload {
        mime_type: mime_type.to_string(),
        data: payload.to_string(),
    })
}

/// Parse and validate a batch of data URLs.
pub fn parse_data_urls(data_urls: &[String]) -> Result<Vec<ImagePayload>, ChatError> {
    data_urls.iter().map(|url| parse_data_url(url)).collect()
}

/// Placeholder content stored for an image-only turn.
pub fn image_placeholder(count: usize) -> String {
    if count == 1 {
        "[Sent 1 image]".to_string()
    } else {
        format!("[Sent {count} images]")
    }
}
