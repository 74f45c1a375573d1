use crate::constants::{DOWNLOAD_PREFIX, INFO_PREFIX, LINK_PREFIX, SIZE_PREFIX, SUCCESS_PREFIX, UPLOAD_PREFIX, WARNING_PREFIX};
use crate::error::{ImgoodError, Result};
use crate::formats::TargetFormat;
use crate::keys::{derive_target_key, KeyOptions};
use crate::processing::ImageEngine;
use crate::storage::ObjectStore;
use crate::transform::{copy_needs_processing, resolve_options, TransformFlags};
use crate::utils::{create_progress_spinner, percent_of_original};
use std::str::FromStr;

#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    pub source: String,
    pub target: Option<String>,
    pub format: Option<String>,
    pub quality: u16,
    pub resize: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CopyReport {
    pub target: String,
    pub url: String,
    pub original_size: u64,
    pub copied_size: u64,
    pub converted: bool,
    pub warnings: Vec<String>,
}

/// Keys are passed through verbatim; only an all-whitespace key counts as missing.
fn is_blank(key: &str) -> bool {
    key.trim().is_empty()
}

/// Copies `source` to a new key inside the same bucket, converting or resizing
/// on the way when asked to.
///
/// The source/target collision check runs before any storage call. The target
/// existence check and the final put are not atomic: a concurrent writer can
/// create the target in between and will be overwritten.
pub fn copy_object(
    store: &dyn ObjectStore,
    engine: &dyn ImageEngine,
    options: &CopyOptions,
) -> Result<CopyReport> {
    let source = options.source.as_str();
    if is_blank(source) {
        return Err(ImgoodError::MissingArgument("Source key"));
    }

    let format = options
        .format
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty());
    let target = match options.target.as_deref().filter(|t| !is_blank(t)) {
        Some(target) => target.to_string(),
        None => {
            let key_format = format.filter(|f| TargetFormat::from_str(f).is_ok());
            derive_target_key(source, key_format, KeyOptions::copy())
        }
    };

    if source == target {
        return Err(ImgoodError::SameSourceAndTarget(target));
    }

    if !store.exists(source)? {
        return Err(ImgoodError::SourceNotFound(source.to_string()));
    }
    if store.exists(&target)? {
        return Err(ImgoodError::TargetExists(target));
    }

    println!("{} Downloading object: {}", DOWNLOAD_PREFIX, source);
    let pb = create_progress_spinner("Downloading...");
    let result = store.get(source);
    pb.finish_and_clear();
    let original = result?;
    let original_size = original.len() as u64;

    let info = engine.probe(&original)?;
    println!("{} Original image: {}", INFO_PREFIX, info);

    let converted = copy_needs_processing(format, options.resize.as_deref());
    let mut warnings = Vec::new();
    let data = if converted {
        let flags = TransformFlags {
            quality: options.quality,
            format: format.map(str::to_string),
            resize: options.resize.clone(),
            keep_metadata: false,
            no_rotate: false,
        };
        let resolution = resolve_options(&flags, &info);
        for warning in &resolution.warnings {
            println!("{}  {}", WARNING_PREFIX, warning);
        }
        warnings = resolution.warnings;

        let pb = create_progress_spinner("Converting image...");
        let result = engine.transform(&original, &resolution.request);
        pb.finish_and_clear();
        let output = result?;

        let format_name = match resolution.request.format.extension() {
            Some(ext) => ext.to_string(),
            None => info.format.clone(),
        };
        println!(
            "{} Converted image: {} bytes, format: {} ({:.2}% of original)",
            SIZE_PREFIX,
            output.len(),
            format_name,
            percent_of_original(original_size, output.len() as u64)
        );
        output
    } else {
        println!("{} No conversion requested, copying original image", INFO_PREFIX);
        original
    };

    println!("{} Uploading to: {}", UPLOAD_PREFIX, target);
    let copied_size = data.len() as u64;
    let pb = create_progress_spinner("Uploading...");
    let result = store.put(&target, data);
    pb.finish_and_clear();
    result?;

    let url = store.url(&target);
    println!("{} Successfully copied", SUCCESS_PREFIX);
    println!("{} URL: {}", LINK_PREFIX, url);

    Ok(CopyReport {
        target,
        url,
        original_size,
        copied_size,
        converted,
        warnings,
    })
}
