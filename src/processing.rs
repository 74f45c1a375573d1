use crate::constants::{
    HIGH_COMPRESSION_MIN_QUALITY, LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL, MAX_QUALITY,
    MIN_QUALITY, ZOPFLI_ITERATIONS, ZOPFLI_MIN_QUALITY,
};
use crate::error::{ImgoodError, Result};
use crate::info::{detect_format, probe_image, ImageInfo};
use crate::transform::TransformRequest;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageDecoder, ImageEncoder, ImageFormat, ImageReader};
use oxipng::{Deflaters, Options};
use std::io::Cursor;
use std::num::NonZeroU8;
use tracing::debug;

/// Image codec capability used by the command orchestrators.
pub trait ImageEngine {
    /// Inspects `bytes` without decoding pixel data.
    fn probe(&self, bytes: &[u8]) -> Result<ImageInfo>;

    /// Decodes `bytes`, applies `request` and re-encodes the result.
    fn transform(&self, bytes: &[u8], request: &TransformRequest) -> Result<Vec<u8>>;
}

/// [`ImageEngine`] backed by the `image` codecs, with `oxipng` for PNG output.
#[derive(Debug, Default, Clone, Copy)]
pub struct CodecEngine;

impl CodecEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ImageEngine for CodecEngine {
    fn probe(&self, bytes: &[u8]) -> Result<ImageInfo> {
        probe_image(bytes)
    }

    fn transform(&self, bytes: &[u8], request: &TransformRequest) -> Result<Vec<u8>> {
        let quality = match u8::try_from(request.quality) {
            Ok(q) if (MIN_QUALITY..=MAX_QUALITY).contains(&request.quality) => q,
            _ => return Err(ImgoodError::InvalidQuality(request.quality)),
        };

        let source_format = detect_format(bytes)?;
        let mut decoder = ImageReader::with_format(Cursor::new(bytes), source_format).into_decoder()?;

        let icc_profile = if request.keep_metadata {
            decoder.icc_profile().unwrap_or_else(|e| {
                debug!("could not read ICC profile: {}", e);
                None
            })
        } else {
            None
        };
        let orientation = if request.no_rotate {
            None
        } else {
            decoder.orientation().ok()
        };

        let mut img = DynamicImage::from_decoder(decoder)?;
        if let Some(orientation) = orientation {
            img.apply_orientation(orientation);
        }

        resize_image(&mut img, request.width, request.height);

        let output_format = request.format.to_image_format(source_format);
        debug!(?source_format, ?output_format, quality, "encoding image");
        encode_image(&img, output_format, quality, icc_profile)
    }
}

/// Output size for a resize request. A zero side follows the source aspect
/// ratio; both zero keeps the source size.
pub fn target_dimensions(source: (u32, u32), width: u32, height: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let scaled = |other: u32, target: u32, base: u32| -> u32 {
        if base == 0 {
            return other.max(1);
        }
        ((other as f64 * target as f64 / base as f64).round() as u32).max(1)
    };

    match (width, height) {
        (0, 0) => source,
        (w, 0) => (w, scaled(src_h, w, src_w)),
        (0, h) => (scaled(src_w, h, src_h), h),
        (w, h) => (w, h),
    }
}

pub fn resize_image(img: &mut DynamicImage, width: u32, height: u32) {
    let (new_w, new_h) = target_dimensions((img.width(), img.height()), width, height);
    if (new_w, new_h) == (img.width(), img.height()) {
        return;
    }

    debug!(
        from = ?(img.width(), img.height()),
        to = ?(new_w, new_h),
        "resizing image"
    );
    *img = img.resize_exact(new_w, new_h, image::imageops::FilterType::Lanczos3);
}

fn apply_icc_profile<E: ImageEncoder>(encoder: &mut E, icc_profile: Option<Vec<u8>>) {
    if let Some(profile) = icc_profile {
        if let Err(e) = encoder.set_icc_profile(profile) {
            debug!("ICC profile not kept: {}", e);
        }
    }
}

/// PNG optimisation preset for a quality setting.
pub fn png_options(quality: u8) -> Options {
    let mut options = Options::from_preset(4);
    options.force = true;

    options.deflate = if quality >= ZOPFLI_MIN_QUALITY {
        Deflaters::Zopfli {
            iterations: NonZeroU8::new(ZOPFLI_ITERATIONS).unwrap_or(NonZeroU8::MIN),
        }
    } else if quality >= HIGH_COMPRESSION_MIN_QUALITY {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_HIGH_LEVEL,
        }
    } else {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_LOW_LEVEL,
        }
    };
    options
}

pub fn encode_image(
    img: &DynamicImage,
    format: ImageFormat,
    quality: u8,
    icc_profile: Option<Vec<u8>>,
) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());

    match format {
        ImageFormat::Jpeg => {
            let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            apply_icc_profile(&mut encoder, icc_profile);
            DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
        }
        ImageFormat::Png => {
            let mut encoder = PngEncoder::new(&mut buf);
            apply_icc_profile(&mut encoder, icc_profile);
            img.write_with_encoder(encoder)?;

            return oxipng::optimize_from_memory(buf.get_ref(), &png_options(quality))
                .map_err(|e| ImgoodError::PngOptimization(e.to_string()));
        }
        ImageFormat::WebP => {
            // The bundled WebP encoder is lossless only, quality does not apply.
            let mut encoder = WebPEncoder::new_lossless(&mut buf);
            apply_icc_profile(&mut encoder, icc_profile);
            if img.color().has_alpha() {
                DynamicImage::ImageRgba8(img.to_rgba8()).write_with_encoder(encoder)?;
            } else {
                DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
            }
        }
        ImageFormat::Gif | ImageFormat::Bmp | ImageFormat::Tiff => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut buf, format)?;
        }
        other => {
            return Err(ImgoodError::UnsupportedFormat(format!("{:?}", other)));
        }
    }

    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::TargetFormat;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(width, height)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn request(format: TargetFormat, width: u32, height: u32) -> TransformRequest {
        TransformRequest {
            quality: 80,
            format,
            width,
            height,
            keep_metadata: false,
            no_rotate: false,
        }
    }

    #[test]
    fn test_target_dimensions() {
        assert_eq!(target_dimensions((2000, 1500), 0, 0), (2000, 1500));
        assert_eq!(target_dimensions((2000, 1500), 1000, 0), (1000, 750));
        assert_eq!(target_dimensions((2000, 1500), 0, 300), (400, 300));
        assert_eq!(target_dimensions((2000, 1500), 800, 600), (800, 600));
        assert_eq!(target_dimensions((1000, 1), 10, 0), (10, 1));
    }

    #[test]
    fn test_resize_image_width_only() {
        let mut img = DynamicImage::new_rgb8(2000, 1500);
        resize_image(&mut img, 1000, 0);
        assert_eq!((img.width(), img.height()), (1000, 750));
    }

    #[test]
    fn test_resize_image_no_dimensions() {
        let mut img = DynamicImage::new_rgb8(200, 150);
        resize_image(&mut img, 0, 0);
        assert_eq!((img.width(), img.height()), (200, 150));
    }

    #[test]
    fn test_transform_to_webp() {
        let engine = CodecEngine::new();
        let out = engine
            .transform(&png_bytes(40, 20), &request(TargetFormat::WebP, 0, 0))
            .unwrap();
        let info = engine.probe(&out).unwrap();
        assert_eq!(info.format, "webp");
        assert_eq!((info.width, info.height), (40, 20));
    }

    #[test]
    fn test_transform_original_keeps_format_and_resizes() {
        let engine = CodecEngine::new();
        let out = engine
            .transform(&png_bytes(40, 20), &request(TargetFormat::Original, 20, 0))
            .unwrap();
        let info = engine.probe(&out).unwrap();
        assert_eq!(info.format, "png");
        assert_eq!((info.width, info.height), (20, 10));
    }

    #[test]
    fn test_transform_to_jpeg() {
        let engine = CodecEngine::new();
        let out = engine
            .transform(&png_bytes(16, 16), &request(TargetFormat::Jpeg, 0, 0))
            .unwrap();
        assert_eq!(&out[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_transform_rejects_invalid_quality() {
        let engine = CodecEngine::new();
        let mut req = request(TargetFormat::Jpeg, 0, 0);
        req.quality = 0;
        let result = engine.transform(&png_bytes(8, 8), &req);
        assert!(matches!(result, Err(ImgoodError::InvalidQuality(0))));

        req.quality = 101;
        let result = engine.transform(&png_bytes(8, 8), &req);
        assert!(matches!(result, Err(ImgoodError::InvalidQuality(101))));

        req.quality = 300;
        let result = engine.transform(&png_bytes(8, 8), &req);
        assert!(matches!(result, Err(ImgoodError::InvalidQuality(300))));
    }

    #[test]
    fn test_transform_garbage_fails() {
        let engine = CodecEngine::new();
        let result = engine.transform(b"not an image", &request(TargetFormat::Png, 0, 0));
        assert!(matches!(result, Err(ImgoodError::ImageProcessing(_))));
    }

    #[test]
    fn test_png_options_by_quality() {
        assert!(matches!(png_options(95).deflate, Deflaters::Zopfli { .. }));
        assert!(matches!(
            png_options(75).deflate,
            Deflaters::Libdeflater { compression: 12 }
        ));
        assert!(matches!(
            png_options(50).deflate,
            Deflaters::Libdeflater { compression: 8 }
        ));
    }
}
