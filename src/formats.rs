//! Image format vocabulary shared by the resolver, the key deriver and the engine.

use crate::error::{ImgoodError, Result};
use image::ImageFormat;
use std::fmt;
use std::str::FromStr;

/// Output format requested for a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    WebP,
    Jpeg,
    Png,
    /// Re-encode in whatever format the source was probed as.
    Original,
}

impl TargetFormat {
    /// File extension for this format, `None` for [`TargetFormat::Original`].
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            TargetFormat::WebP => Some("webp"),
            TargetFormat::Jpeg => Some("jpeg"),
            TargetFormat::Png => Some("png"),
            TargetFormat::Original => None,
        }
    }

    /// Concrete codec format, resolving `Original` against the probed source format.
    pub fn to_image_format(&self, source: ImageFormat) -> ImageFormat {
        match self {
            TargetFormat::WebP => ImageFormat::WebP,
            TargetFormat::Jpeg => ImageFormat::Jpeg,
            TargetFormat::Png => ImageFormat::Png,
            TargetFormat::Original => source,
        }
    }

    /// Format names accepted on the command line
    pub fn token_names() -> &'static [&'static str] {
        &["webp", "jpeg", "jpg", "png"]
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetFormat::WebP => "WEBP",
            TargetFormat::Jpeg => "JPEG",
            TargetFormat::Png => "PNG",
            TargetFormat::Original => "ORIGINAL",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TargetFormat {
    type Err = ImgoodError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "webp" => Ok(TargetFormat::WebP),
            "jpeg" | "jpg" => Ok(TargetFormat::Jpeg),
            "png" => Ok(TargetFormat::Png),
            _ => Err(ImgoodError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Lower-case display name of a codec format, as reported by probing.
pub fn format_name(format: ImageFormat) -> String {
    format
        .extensions_str()
        .first()
        .map(|ext| match *ext {
            "jpg" => "jpeg".to_string(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| format!("{:?}", format).to_lowercase())
}

/// MIME type to store alongside an object, guessed from its key.
pub fn content_type_for_key(key: &str) -> Option<&'static str> {
    let (_, ext) = key.rsplit_once('.')?;
    ImageFormat::from_extension(ext).map(|format| format.to_mime_type())
}
