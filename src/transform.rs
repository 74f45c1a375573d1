//! Translates user-facing flags into the parameter set handed to the image engine.
//!
//! An unknown format token falls back to the probed format with a warning. A
//! malformed resize component leaves that dimension unconstrained.

use crate::formats::TargetFormat;
use crate::info::ImageInfo;
use std::str::FromStr;
use tracing::{debug, warn};

/// Concrete parameters for one call into the image engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformRequest {
    pub quality: u16,
    pub format: TargetFormat,
    /// 0 derives the width from the height and the source aspect ratio.
    pub width: u32,
    /// 0 derives the height from the width and the source aspect ratio.
    pub height: u32,
    pub keep_metadata: bool,
    pub no_rotate: bool,
}

/// Raw command-line flags that feed a [`TransformRequest`].
#[derive(Debug, Clone, Default)]
pub struct TransformFlags {
    pub quality: u16,
    pub format: Option<String>,
    pub resize: Option<String>,
    pub keep_metadata: bool,
    pub no_rotate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub request: TransformRequest,
    pub warnings: Vec<String>,
}

/// Parses a `"<width>,<height>"` resize spec.
///
/// Each component is parsed on its own; anything non-numeric or not positive
/// yields 0 for that side. Specs without exactly two components yield `(0, 0)`.
pub fn parse_resize_spec(spec: &str) -> (u32, u32) {
    let parts: Vec<&str> = spec.split(',').collect();
    if parts.len() != 2 {
        debug!(spec, "ignoring resize spec without exactly two components");
        return (0, 0);
    }

    let side = |raw: &str| -> u32 {
        raw.trim()
            .parse::<i64>()
            .ok()
            .filter(|&v| v > 0)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0)
    };

    (side(parts[0]), side(parts[1]))
}

/// Resolves a format token, falling back to the probed format for unknown tokens.
fn resolve_format(token: Option<&str>, probed: &ImageInfo, warnings: &mut Vec<String>) -> TargetFormat {
    let token = match token.map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => return TargetFormat::Original,
    };

    match TargetFormat::from_str(token) {
        Ok(format) => format,
        Err(_) => {
            let message = format!(
                "Unsupported format: {}. Using original format ({}).",
                token, probed.format
            );
            warn!(token, original = %probed.format, "falling back to original format");
            warnings.push(message);
            TargetFormat::Original
        }
    }
}

/// Builds the engine request from `flags` and the probed source.
pub fn resolve_options(flags: &TransformFlags, probed: &ImageInfo) -> Resolution {
    let mut warnings = Vec::new();
    let format = resolve_format(flags.format.as_deref(), probed, &mut warnings);
    let (width, height) = flags
        .resize
        .as_deref()
        .map(parse_resize_spec)
        .unwrap_or((0, 0));

    let request = TransformRequest {
        quality: flags.quality,
        format,
        width,
        height,
        keep_metadata: flags.keep_metadata,
        no_rotate: flags.no_rotate,
    };
    debug!(?request, "resolved transform options");

    Resolution { request, warnings }
}

/// Uploads are re-encoded when compressing, or when EXIF orientation or
/// metadata stripping has to be applied.
pub fn upload_needs_processing(compress: bool, keep_metadata: bool, no_rotate: bool) -> bool {
    compress || !keep_metadata || !no_rotate
}

/// Copies are re-encoded only when a format or a resize was asked for.
pub fn copy_needs_processing(format: Option<&str>, resize: Option<&str>) -> bool {
    let given = |v: Option<&str>| v.is_some_and(|s| !s.trim().is_empty());
    given(format) || given(resize)
}
