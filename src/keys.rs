use crate::constants::{COPY_SUFFIX, TIMESTAMP_FORMAT};
use chrono::{DateTime, Local};

/// How a default key is derived from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// Source is a local path; only its file name is kept.
    Upload,
    /// Source is an existing object key; its prefix is kept and `-copy` marks the duplicate.
    Copy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOptions {
    pub mode: KeyMode,
    pub timestamp: bool,
}

impl KeyOptions {
    pub fn upload(timestamp: bool) -> Self {
        Self {
            mode: KeyMode::Upload,
            timestamp,
        }
    }

    pub fn copy() -> Self {
        Self {
            mode: KeyMode::Copy,
            timestamp: false,
        }
    }
}

/// Derives a destination key using the current wall-clock time.
pub fn derive_target_key(source: &str, format: Option<&str>, options: KeyOptions) -> String {
    derive_target_key_at(source, format, options, Local::now())
}

/// Derives a destination key for `source`.
///
/// A non-empty `format` replaces the extension. Without one, copies get a `-copy`
/// suffix and uploads keep their name. In timestamp mode the name is replaced by
/// `now` rendered as `YYYYMMDDHHMMSSmmm`.
pub fn derive_target_key_at(
    source: &str,
    format: Option<&str>,
    options: KeyOptions,
    now: DateTime<Local>,
) -> String {
    let format = format.map(str::trim).filter(|f| !f.is_empty());

    let base = match options.mode {
        KeyMode::Upload => file_name(source),
        KeyMode::Copy => source,
    };
    let (stem, original_ext) = split_extension(base);

    let extension = match format {
        Some(fmt) => format!(".{}", fmt.to_lowercase()),
        None => original_ext.to_string(),
    };

    if options.timestamp {
        return format!("{}{}", now.format(TIMESTAMP_FORMAT), extension);
    }

    match (format, options.mode) {
        (Some(_), _) => format!("{}{}", stem, extension),
        (None, KeyMode::Copy) => format!("{}{}{}", stem, COPY_SUFFIX, extension),
        (None, KeyMode::Upload) => base.to_string(),
    }
}

/// Final `/`-separated segment of a path or key.
fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed)
}

/// Splits `name` into stem and extension (with the dot). Only the last path
/// segment is searched for a dot.
pub fn split_extension(name: &str) -> (&str, &str) {
    let segment_start = name.rfind(['/', '\\']).map_or(0, |i| i + 1);
    match name[segment_start..].rfind('.') {
        Some(dot) => name.split_at(segment_start + dot),
        None => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_clock() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 7, 9, 5, 2)
            .single()
            .unwrap()
            + chrono::Duration::milliseconds(45)
    }

    #[test]
    fn test_copy_with_format_replaces_extension() {
        let key = derive_target_key("photo.JPG", Some("webp"), KeyOptions::copy());
        assert_eq!(key, "photo.webp");
    }

    #[test]
    fn test_copy_without_format_appends_suffix() {
        let key = derive_target_key("photo.JPG", None, KeyOptions::copy());
        assert_eq!(key, "photo-copy.JPG");

        let key = derive_target_key("photo.JPG", Some(""), KeyOptions::copy());
        assert_eq!(key, "photo-copy.JPG");
    }

    #[test]
    fn test_copy_keeps_key_prefix() {
        let key = derive_target_key("albums/2024/cat.png", Some("WEBP"), KeyOptions::copy());
        assert_eq!(key, "albums/2024/cat.webp");

        let key = derive_target_key("albums/2024/cat.png", None, KeyOptions::copy());
        assert_eq!(key, "albums/2024/cat-copy.png");
    }

    #[test]
    fn test_upload_keeps_file_name_only() {
        let key = derive_target_key("/home/me/pics/cat.png", None, KeyOptions::upload(false));
        assert_eq!(key, "cat.png");

        let key = derive_target_key("pics/cat.png", Some("webp"), KeyOptions::upload(false));
        assert_eq!(key, "cat.webp");
    }

    #[test]
    fn test_timestamp_ignores_source_name() {
        let key = derive_target_key_at(
            "pics/cat.png",
            Some("webp"),
            KeyOptions::upload(true),
            fixed_clock(),
        );
        assert_eq!(key, "20240307090502045.webp");

        let key = derive_target_key_at("pics/cat.png", None, KeyOptions::upload(true), fixed_clock());
        assert_eq!(key, "20240307090502045.png");
    }

    #[test]
    fn test_no_extension() {
        assert_eq!(derive_target_key("README", None, KeyOptions::copy()), "README-copy");
        assert_eq!(derive_target_key("README", Some("png"), KeyOptions::copy()), "README.png");
    }

    #[test]
    fn test_split_extension_ignores_dots_in_directories() {
        assert_eq!(split_extension("v1.2/photo"), ("v1.2/photo", ""));
        assert_eq!(split_extension("v1.2/photo.jpg"), ("v1.2/photo", ".jpg"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
    }
}
