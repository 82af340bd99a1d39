//! Image intake
//!
//! Pure half of the image path: declared type and size checks, MIME
//! inference from file names, and preview data URIs. Reading the file and
//! calling the OCR engine happen in the shell.

use std::fmt;
use std::path::Path;

use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted image, in bytes (10 MiB).
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// MIME type assumed for files whose extension is not a known image type.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid file type '{0}'. Please upload a valid image (JPEG, PNG, GIF, WebP)")]
    UnsupportedType(String),

    #[error("Image must be less than 10MB (got {size} bytes)")]
    TooLarge { size: u64 },
}

/// Accepted image types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMime {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageMime {
    pub fn as_mime(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
            ImageMime::Gif => "image/gif",
            ImageMime::Webp => "image/webp",
        }
    }

    /// Exact match against the whitelist.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(ImageMime::Jpeg),
            "image/png" => Some(ImageMime::Png),
            "image/gif" => Some(ImageMime::Gif),
            "image/webp" => Some(ImageMime::Webp),
            _ => None,
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_mime())
    }
}

/// The metadata validation looks at: declared type and size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMeta {
    pub name: String,
    pub declared_type: String,
    pub size: u64,
}

impl ImageMeta {
    /// Metadata for a file on disk, with the type inferred from its name.
    pub fn from_path(path: &Path, size: u64) -> Self {
        ImageMeta {
            name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            declared_type: mime_from_path(path).to_string(),
            size,
        }
    }
}

/// Check the declared type, then the size.
///
/// Runs before any preview or upload work; exactly [`MAX_IMAGE_BYTES`] is
/// accepted.
pub fn validate(meta: &ImageMeta) -> Result<ImageMime, ValidationError> {
    let mime = ImageMime::from_mime(&meta.declared_type)
        .ok_or_else(|| ValidationError::UnsupportedType(meta.declared_type.clone()))?;

    if meta.size > MAX_IMAGE_BYTES {
        return Err(ValidationError::TooLarge { size: meta.size });
    }

    Ok(mime)
}

/// Infer the MIME type from a file extension, the way a browser declares it.
pub fn mime_from_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => UNKNOWN_MIME,
    }
}

/// Encode image bytes as a `data:` URI for previews.
pub fn preview_data_uri(mime: ImageMime, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime.as_mime(),
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}
