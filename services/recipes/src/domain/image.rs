//! Data-URI image payloads.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::RecipesServiceError;

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpeg", "jpg", "gif", "webp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Decode `data:image/<ext>;base64,<payload>`.
pub fn decode_data_uri(payload: &str) -> Result<DecodedImage, RecipesServiceError> {
    let rest = payload
        .trim()
        .strip_prefix("data:image/")
        .ok_or(RecipesServiceError::InvalidImage)?;
    let (extension, data) = rest
        .split_once(";base64,")
        .ok_or(RecipesServiceError::InvalidImage)?;
    let extension = extension.to_ascii_lowercase();
    if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(RecipesServiceError::InvalidImage);
    }
    let bytes = STANDARD
        .decode(data)
        .map_err(|_| RecipesServiceError::InvalidImage)?;
    if bytes.is_empty() {
        return Err(RecipesServiceError::InvalidImage);
    }
    Ok(DecodedImage { extension, bytes })
}

/// Public URL of a file stored under the media root.
pub fn media_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
