use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImgoodError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u16),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{0} is required")]
    MissingArgument(&'static str),

    #[error("Input file does not exist: {0}")]
    InputNotFound(PathBuf),

    #[error("Source and target keys cannot be the same: {0}")]
    SameSourceAndTarget(String),

    #[error("Source object does not exist: {0}")]
    SourceNotFound(String),

    #[error("Target object already exists: {0}")]
    TargetExists(String),

    #[error("S3 bucket name is required")]
    MissingBucket,

    #[error("error {op} '{key}': {message}")]
    Storage {
        op: &'static str,
        key: String,
        message: String,
    },
}

impl ImgoodError {
    pub fn storage(op: &'static str, key: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ImgoodError::Storage {
            op,
            key: key.into(),
            message: err.to_string(),
        }
    }

    /// True for failures detected locally, before touching storage or the codec.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ImgoodError::MissingArgument(_)
                | ImgoodError::InputNotFound(_)
                | ImgoodError::SameSourceAndTarget(_)
                | ImgoodError::SourceNotFound(_)
                | ImgoodError::TargetExists(_)
                | ImgoodError::MissingBucket
        )
    }
}

pub type Result<T> = std::result::Result<T, ImgoodError>;
