use crate::error::{ImgoodError, Result};
use crate::formats::format_name;
use crate::utils::format_bytes;
use image::{ImageFormat, ImageReader};
use std::fmt;
use std::io::Cursor;

/// Dimensions, size and encoded format of an image buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub size: u64,
    pub format: String,
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}, {} bytes ({}), format: {}",
            self.width,
            self.height,
            self.size,
            format_bytes(self.size as i64),
            self.format
        )
    }
}

/// Guesses the codec format of `bytes` from its magic number.
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat> {
    image::guess_format(bytes).map_err(ImgoodError::from)
}

/// Reads the header of `bytes` without decoding pixel data.
pub fn probe_image(bytes: &[u8]) -> Result<ImageInfo> {
    let format = detect_format(bytes)?;
    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format).into_dimensions()?;

    Ok(ImageInfo {
        width,
        height,
        size: bytes.len() as u64,
        format: format_name(format),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(width, height)
            .write_to(&mut buf, format)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_probe_png() {
        let bytes = encoded(64, 32, ImageFormat::Png);
        let info = probe_image(&bytes).unwrap();
        assert_eq!(info.width, 64);
        assert_eq!(info.height, 32);
        assert_eq!(info.size, bytes.len() as u64);
        assert_eq!(info.format, "png");
    }

    #[test]
    fn test_probe_jpeg() {
        let info = probe_image(&encoded(10, 20, ImageFormat::Jpeg)).unwrap();
        assert_eq!((info.width, info.height), (10, 20));
        assert_eq!(info.format, "jpeg");
    }

    #[test]
    fn test_probe_garbage_fails() {
        let result = probe_image(b"definitely not an image");
        assert!(matches!(result, Err(ImgoodError::ImageProcessing(_))));
    }

    #[test]
    fn test_display() {
        let info = ImageInfo {
            width: 800,
            height: 600,
            size: 1536,
            format: "png".to_string(),
        };
        assert_eq!(info.to_string(), "800x600, 1536 bytes (1.5 KB), format: png");
    }
}
