use crate::constants::{INFO_PREFIX, LINK_PREFIX, SIZE_PREFIX, SUCCESS_PREFIX, UPLOAD_PREFIX, WARNING_PREFIX};
use crate::error::{ImgoodError, Result};
use crate::formats::TargetFormat;
use crate::keys::{derive_target_key, KeyOptions};
use crate::processing::ImageEngine;
use crate::storage::ObjectStore;
use crate::transform::{resolve_options, upload_needs_processing, TransformFlags};
use crate::utils::{create_progress_spinner, percent_of_original};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Format used by `--compress` when no explicit format is given.
const COMPRESS_FORMAT: &str = "webp";

#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub input: PathBuf,
    pub key: Option<String>,
    pub compress: bool,
    pub format: Option<String>,
    pub quality: u16,
    pub resize: Option<String>,
    pub timestamp: bool,
    pub keep_metadata: bool,
    pub no_rotate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadReport {
    pub key: String,
    pub url: String,
    pub original_size: u64,
    pub uploaded_size: u64,
    pub processed: bool,
    pub warnings: Vec<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Uploads a local image, re-encoding it first when compression, a format
/// change, EXIF rotation or metadata stripping is requested.
///
/// # Arguments
/// * `store` - Destination object store
/// * `engine` - Image codec used to probe and transform the file
/// * `options` - Command-line options of the `up` command
///
/// # Returns
/// * `Ok(UploadReport)` with the key and public URL of the new object
/// * `Err(ImgoodError)` on a missing input, a codec failure or a storage failure
pub fn upload_image(
    store: &dyn ObjectStore,
    engine: &dyn ImageEngine,
    options: &UploadOptions,
) -> Result<UploadReport> {
    if options.input.as_os_str().is_empty() {
        return Err(ImgoodError::MissingArgument("Input path"));
    }
    if !options.input.exists() {
        return Err(ImgoodError::InputNotFound(options.input.clone()));
    }

    println!("{} Uploading: {:?}", UPLOAD_PREFIX, options.input);
    let original = fs::read(&options.input)?;
    let original_size = original.len() as u64;
    let info = engine.probe(&original)?;
    println!("{} Original image: {}", INFO_PREFIX, info);

    let requested_format = non_empty(options.format.as_deref())
        .or(options.compress.then_some(COMPRESS_FORMAT));
    let mut warnings = Vec::new();
    let mut key_format = None;

    let processed = upload_needs_processing(
        requested_format.is_some(),
        options.keep_metadata,
        options.no_rotate,
    );
    let data = if processed {
        let flags = TransformFlags {
            quality: options.quality,
            format: requested_format.map(str::to_string),
            resize: options.resize.clone(),
            keep_metadata: options.keep_metadata,
            no_rotate: options.no_rotate,
        };
        let resolution = resolve_options(&flags, &info);
        for warning in &resolution.warnings {
            println!("{}  {}", WARNING_PREFIX, warning);
        }
        warnings = resolution.warnings;
        if resolution.request.format != TargetFormat::Original {
            key_format = requested_format;
        }

        let pb = create_progress_spinner("Processing image...");
        let result = engine.transform(&original, &resolution.request);
        pb.finish_and_clear();
        let transformed = result?;

        println!(
            "{} Compressed image: {} bytes ({:.2}% of original)",
            SIZE_PREFIX,
            transformed.len(),
            percent_of_original(original_size, transformed.len() as u64)
        );
        transformed
    } else {
        debug!("uploading original bytes unchanged");
        original
    };

    let key = match options.key.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(key) => key.to_string(),
        None => derive_target_key(
            &options.input.to_string_lossy(),
            key_format,
            KeyOptions::upload(options.timestamp),
        ),
    };

    store.ensure_ready()?;

    let uploaded_size = data.len() as u64;
    let pb = create_progress_spinner(&format!("Uploading to {}...", key));
    let result = store.put(&key, data);
    pb.finish_and_clear();
    result?;

    let url = store.url(&key);
    println!("{} Successfully uploaded", SUCCESS_PREFIX);
    println!("{} URL: {}", LINK_PREFIX, url);

    Ok(UploadReport {
        key,
        url,
        original_size,
        uploaded_size,
        processed,
        warnings,
    })
}
